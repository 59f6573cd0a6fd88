//! Network topology module.
//!
//! This module contains the text format used to save and reload a
//! simulator's topology, and templates for generating synthetic ones.

pub mod format;
pub mod generators;

// Re-export key types and functions for easier access
pub use format::{load, parse, render, save, TopologyFormatError};
pub use generators::{generate, Shape};
