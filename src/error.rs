//! Error types for structural misuse of the simulator.
//!
//! Not-found conditions (unknown node, unreachable destination) are not
//! errors: they surface as empty paths or empty neighbor lists. The variants
//! below indicate a mistake in how the network was assembled or driven.

/// Errors raised when the network is assembled or driven incorrectly
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("Device name must not be empty")]
    EmptyDeviceName,
    #[error("Device name must not contain whitespace: {0:?}")]
    InvalidDeviceName(String),
    #[error("Management interface must be a single non-empty token: {0:?}")]
    InvalidInterfaceLabel(String),
    #[error("Device already registered: {0}")]
    DuplicateDevice(String),
    #[error("Unknown device: {0}")]
    UnknownDevice(String),
    #[error("Cannot forward a packet over an empty path")]
    EmptyPath,
    #[error("No link from {from} to {to}")]
    MissingLink { from: String, to: String },
}
