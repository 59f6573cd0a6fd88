//! Physical link parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameters of a physical link between two devices.
///
/// A link is *usable* when its reliability is above zero and it has some
/// bandwidth. Unusable links stay in the topology but routing never picks
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub latency_ms: f64,
    pub bandwidth_mbps: f64,
    /// Delivery probability in `[0, 1]`. Zero means the link is down.
    #[serde(default = "default_reliability")]
    pub reliability: f64,
}

fn default_reliability() -> f64 {
    1.0
}

impl Default for Link {
    fn default() -> Self {
        Self {
            latency_ms: 1.0,
            bandwidth_mbps: 100.0,
            reliability: 1.0,
        }
    }
}

impl Link {
    pub fn new(latency_ms: f64, bandwidth_mbps: f64) -> Self {
        Self {
            latency_ms,
            bandwidth_mbps,
            reliability: 1.0,
        }
    }

    pub fn with_reliability(mut self, reliability: f64) -> Self {
        self.reliability = reliability;
        self
    }

    /// Same parameters, marked down.
    pub fn down(self) -> Self {
        self.with_reliability(0.0)
    }

    pub fn is_up(&self) -> bool {
        self.reliability > 0.0
    }

    pub fn is_usable(&self) -> bool {
        self.is_up() && self.bandwidth_mbps > 0.0
    }

    /// Serialization delay of `payload_bytes` on this link, in milliseconds.
    ///
    /// Infinite when the link has no bandwidth.
    pub fn transmission_time_ms(&self, payload_bytes: u64) -> f64 {
        if self.bandwidth_mbps <= 0.0 {
            return f64::INFINITY;
        }
        let bits = payload_bytes as f64 * 8.0;
        bits / (self.bandwidth_mbps * 1_000_000.0) * 1_000.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{lat={}, bw={}, rel={}}}",
            self.latency_ms, self.bandwidth_mbps, self.reliability
        )
    }
}
