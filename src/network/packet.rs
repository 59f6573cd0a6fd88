//! Packets travelling through the simulated network.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TTL: i32 = 10;
pub const DEFAULT_SIZE_BYTES: u64 = 1024;

/// A packet with a hop budget and a log of visited devices.
///
/// Only the TTL and the hop log change once a packet exists; both are
/// updated by the forwarding step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    source: String,
    destination: String,
    ttl: i32,
    size_bytes: u64,
    hops: Vec<String>,
}

impl Packet {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        ttl: i32,
        size_bytes: u64,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ttl,
            size_bytes,
            hops: Vec::new(),
        }
    }

    /// Packet with the default TTL and payload size.
    pub fn with_defaults(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(source, destination, DEFAULT_TTL, DEFAULT_SIZE_BYTES)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn ttl(&self) -> i32 {
        self.ttl
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Devices visited so far, starting with the first hop of the path.
    pub fn hops(&self) -> &[String] {
        &self.hops
    }

    /// True when the last logged hop is the packet's destination.
    pub fn reached_destination(&self) -> bool {
        self.hops.last().map(String::as_str) == Some(self.destination.as_str())
    }

    pub(crate) fn record_hop(&mut self, node: &str) {
        self.hops.push(node.to_string());
    }

    pub(crate) fn decrement_ttl(&mut self) {
        self.ttl -= 1;
    }
}
