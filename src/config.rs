//! Scenario configuration.
//!
//! A scenario names a topology source and a list of delivery requests to run
//! against it:
//!
//! ```yaml
//! general:
//!   default_ttl: 10
//!   algorithm: dijkstra
//! topology:
//!   devices:
//!     - { name: R1, kind: Router, mgmt_interface: mgmt0 }
//!     - { name: H1, kind: Host, address: 10.0.0.1 }
//!   links:
//!     - { from: R1, to: H1, latency_ms: 0.5, bandwidth_mbps: 100 }
//! requests:
//!   - { source: R1, destination: H1, metric: transfer_time, payload_bytes: 1500 }
//! ```
//!
//! The topology may instead be `{ demo: true }`, `{ file: <path> }` or
//! `{ shape: ring, size: 6 }`.

use std::collections::HashSet;
use std::net::IpAddr;
use std::path::PathBuf;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::network::{DeviceClass, Link, DEFAULT_SIZE_BYTES, DEFAULT_TTL};
use crate::routing::{AlgorithmKind, Metric};
use crate::simulator::is_single_token;
use crate::topology::Shape;

/// Top-level scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    pub topology: TopologyConfig,
    #[serde(default)]
    pub requests: Vec<RouteRequest>,
}

/// Logging filter used when the scenario does not set one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Defaults shared by every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`; `RUST_LOG` still wins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default = "default_ttl")]
    pub default_ttl: i32,
    #[serde(default = "default_payload_bytes")]
    pub default_payload_bytes: u64,
    #[serde(default)]
    pub algorithm: AlgorithmKind,
}

fn default_ttl() -> i32 {
    DEFAULT_TTL
}

fn default_payload_bytes() -> u64 {
    DEFAULT_SIZE_BYTES
}

impl GeneralConfig {
    /// Default filter for the logger.
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            default_ttl: DEFAULT_TTL,
            default_payload_bytes: DEFAULT_SIZE_BYTES,
            algorithm: AlgorithmKind::default(),
        }
    }
}

/// Where the topology comes from, told apart by its fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopologyConfig {
    File {
        file: PathBuf,
    },
    Generated {
        shape: Shape,
        size: usize,
        #[serde(default)]
        link: Link,
    },
    Inline {
        devices: Vec<DeviceSpec>,
        #[serde(default)]
        links: Vec<LinkSpec>,
    },
    Demo {
        demo: bool,
    },
}

/// A device declared inline in the scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub name: String,
    pub kind: DeviceClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mgmt_interface: Option<String>,
}

/// A link declared inline in the scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSpec {
    pub from: String,
    pub to: String,
    pub latency_ms: f64,
    pub bandwidth_mbps: f64,
    #[serde(default = "default_reliability")]
    pub reliability: f64,
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}

fn default_reliability() -> f64 {
    1.0
}

fn default_bidirectional() -> bool {
    true
}

impl LinkSpec {
    pub fn link(&self) -> Link {
        Link::new(self.latency_ms, self.bandwidth_mbps).with_reliability(self.reliability)
    }
}

/// One packet to route and forward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<AlgorithmKind>,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
    #[error("Invalid request #{index}: {message}")]
    InvalidRequest { index: usize, message: String },
}

impl ScenarioConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.general.log_level {
            if level.parse::<LevelFilter>().is_err() {
                return Err(ValidationError::InvalidGeneral(format!(
                    "unknown log_level '{}'",
                    level
                )));
            }
        }
        if self.general.default_ttl < 0 {
            return Err(ValidationError::InvalidGeneral(
                "default_ttl cannot be negative".to_string(),
            ));
        }

        self.topology.validate()?;

        for (index, request) in self.requests.iter().enumerate() {
            if request.source.is_empty() || request.destination.is_empty() {
                return Err(ValidationError::InvalidRequest {
                    index,
                    message: "source and destination are required".to_string(),
                });
            }
            if matches!(request.ttl, Some(ttl) if ttl < 0) {
                return Err(ValidationError::InvalidRequest {
                    index,
                    message: "ttl cannot be negative".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl TopologyConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::File { file } => {
                if file.as_os_str().is_empty() {
                    return Err(ValidationError::InvalidTopology(
                        "topology file path cannot be empty".to_string(),
                    ));
                }
            }
            Self::Generated { size, link, .. } => {
                if *size == 0 {
                    return Err(ValidationError::InvalidTopology(
                        "generated topology needs at least one device".to_string(),
                    ));
                }
                validate_link_values(link.latency_ms, link.bandwidth_mbps, link.reliability)?;
            }
            Self::Inline { devices, links } => {
                let mut names = HashSet::new();
                for device in devices {
                    if !names.insert(device.name.as_str()) {
                        return Err(ValidationError::InvalidTopology(format!(
                            "duplicate device '{}'",
                            device.name
                        )));
                    }
                    if let Some(label) = &device.mgmt_interface {
                        if !is_single_token(label) {
                            return Err(ValidationError::InvalidTopology(format!(
                                "device '{}': mgmt_interface must be a single word (got {:?})",
                                device.name, label
                            )));
                        }
                    }
                }
                for link in links {
                    for end in [&link.from, &link.to] {
                        if !names.contains(end.as_str()) {
                            return Err(ValidationError::InvalidTopology(format!(
                                "link {} -> {} references undeclared device '{}'",
                                link.from, link.to, end
                            )));
                        }
                    }
                    validate_link_values(link.latency_ms, link.bandwidth_mbps, link.reliability)?;
                }
            }
            Self::Demo { demo } => {
                if !demo {
                    return Err(ValidationError::InvalidTopology(
                        "no topology source given (set demo, file, shape or devices)".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn validate_link_values(latency_ms: f64, bandwidth_mbps: f64, reliability: f64) -> Result<(), ValidationError> {
    let valid = |value: f64| value.is_finite() && value >= 0.0;
    if !valid(latency_ms) || !valid(bandwidth_mbps) {
        return Err(ValidationError::InvalidTopology(format!(
            "link latency and bandwidth must be finite and non-negative (got {} ms, {} Mbps)",
            latency_ms, bandwidth_mbps
        )));
    }
    if !(0.0..=1.0).contains(&reliability) {
        return Err(ValidationError::InvalidTopology(format!(
            "link reliability must be within [0, 1] (got {})",
            reliability
        )));
    }
    Ok(())
}
