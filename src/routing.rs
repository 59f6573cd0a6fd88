//! Route selection over the physical topology.
//!
//! A [`CostPolicy`] turns a [`Link`] into a scalar cost. Routing runs the
//! shortest-path engine straight over the physical graph with that cost as
//! the weight function, so the topology is never copied or mutated.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, ShortestPaths};
use crate::network::Link;

/// Cost assigned to links that must never be chosen (down, or without
/// bandwidth). Dijkstra cannot relax an infinite edge, so such links act as
/// absent.
pub const UNUSABLE_LINK_COST: f64 = f64::INFINITY;

/// How a link is priced when choosing a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum CostPolicy {
    /// Propagation latency only
    Latency,
    /// Latency plus serialization time of a payload of the given size
    TransferTime { payload_bytes: u64 },
}

impl CostPolicy {
    /// Cost of traversing `link` under this policy, in milliseconds.
    pub fn cost(&self, link: &Link) -> f64 {
        if !link.is_usable() {
            return UNUSABLE_LINK_COST;
        }
        match self {
            Self::Latency => link.latency_ms,
            Self::TransferTime { payload_bytes } => {
                link.latency_ms + link.transmission_time_ms(*payload_bytes)
            }
        }
    }

    /// Cost of a whole path under this policy, following the first link
    /// for each hop. `None` if some hop has no link.
    pub fn path_cost(&self, graph: &Graph<String, Link>, path: &[String]) -> Option<f64> {
        path.windows(2).try_fold(0.0, |total, hop| {
            graph
                .edge_between(&hop[0], &hop[1])
                .map(|link| total + self.cost(link))
        })
    }
}

impl fmt::Display for CostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latency => write!(f, "latency"),
            Self::TransferTime { payload_bytes } => write!(f, "transfer-time ({} B)", payload_bytes),
        }
    }
}

/// Policy choice without the payload size, as picked on the command line or
/// in a scenario file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Latency,
    TransferTime,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latency => write!(f, "latency"),
            Self::TransferTime => write!(f, "transfer-time"),
        }
    }
}

impl Metric {
    pub fn policy(self, payload_bytes: u64) -> CostPolicy {
        match self {
            Self::Latency => CostPolicy::Latency,
            Self::TransferTime => CostPolicy::TransferTime { payload_bytes },
        }
    }
}

/// A computed route: ordered device names plus its total cost.
///
/// An empty path means the destination is unreachable; the cost is then
/// infinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<String>,
    pub cost: f64,
}

impl Route {
    pub fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Strategy for picking a route between two devices
pub trait RoutingAlgorithm {
    fn name(&self) -> &'static str;

    fn find_route(
        &self,
        topology: &Graph<String, Link>,
        source: &str,
        destination: &str,
        policy: CostPolicy,
    ) -> Route;
}

/// Lowest total cost under the requested policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouting;

impl RoutingAlgorithm for DijkstraRouting {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn find_route(
        &self,
        topology: &Graph<String, Link>,
        source: &str,
        destination: &str,
        policy: CostPolicy,
    ) -> Route {
        let paths =
            ShortestPaths::compute_with(topology, &source.to_string(), |link| policy.cost(link));
        let target = destination.to_string();
        let path = paths.path_to(&target);
        if path.is_empty() {
            warn!("No route from {} to {} under {} policy", source, destination, policy);
            return Route::unreachable();
        }

        let cost = paths.distance_to(&target);
        debug!("Route {} -> {} ({}): {:?} cost {:.4}", source, destination, policy, path, cost);
        Route { path, cost }
    }
}

/// Fewest usable hops. The returned cost is still priced with the policy so
/// routes from both algorithms compare on the same scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinHopRouting;

impl RoutingAlgorithm for MinHopRouting {
    fn name(&self) -> &'static str {
        "min-hop"
    }

    fn find_route(
        &self,
        topology: &Graph<String, Link>,
        source: &str,
        destination: &str,
        policy: CostPolicy,
    ) -> Route {
        let paths = ShortestPaths::compute_with(topology, &source.to_string(), |link: &Link| {
            if link.is_usable() {
                1.0
            } else {
                UNUSABLE_LINK_COST
            }
        });
        let path = paths.path_to(&destination.to_string());
        if path.is_empty() {
            warn!("No route from {} to {} (min-hop)", source, destination);
            return Route::unreachable();
        }

        let cost = policy.path_cost(topology, &path).unwrap_or(f64::INFINITY);
        debug!("Min-hop route {} -> {}: {:?}", source, destination, path);
        Route { path, cost }
    }
}

/// Routing algorithm selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    #[default]
    Dijkstra,
    MinHop,
}

impl AlgorithmKind {
    pub fn build(self) -> Box<dyn RoutingAlgorithm> {
        match self {
            Self::Dijkstra => Box::new(DijkstraRouting),
            Self::MinHop => Box::new(MinHopRouting),
        }
    }
}
