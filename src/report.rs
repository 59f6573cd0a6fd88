//! Presentation of simulation results.
//!
//! Reports are plain data: they implement `Display` for the console and
//! `Serialize` for `--json` output. Nothing in the simulation core prints.

use std::fmt;

use serde::Serialize;

use crate::forwarding::ForwardOutcome;
use crate::routing::{Metric, Route};
use crate::simulator::NetworkSimulator;

/// Join a path as `A -> B -> C`.
pub fn format_path(path: &[String]) -> String {
    path.join(" -> ")
}

/// Outcome of one routed and forwarded packet
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub source: String,
    pub destination: String,
    pub metric: Metric,
    pub algorithm: String,
    pub payload_bytes: u64,
    pub initial_ttl: i32,
    pub route: Route,
    pub outcome: Option<ForwardOutcome>,
    pub hops: Vec<String>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> bool {
        self.outcome.as_ref().map_or(false, |outcome| outcome.delivered)
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} -> {} [{}, {}]",
            self.source, self.destination, self.metric, self.algorithm
        )?;
        if !self.route.is_found() {
            return writeln!(f, "  route: not found");
        }
        writeln!(
            f,
            "  route: {} (cost {:.4} ms)",
            format_path(&self.route.path),
            self.route.cost
        )?;
        writeln!(f, "  packet: ttl={} size={}B", self.initial_ttl, self.payload_bytes)?;

        if let Some(outcome) = &self.outcome {
            if outcome.delivered {
                writeln!(
                    f,
                    "  delivered to {} after {} hop(s) in {:.4} ms (ttl left {})",
                    self.destination, outcome.hops_taken, outcome.elapsed_ms, outcome.ttl_remaining
                )?;
            } else {
                writeln!(
                    f,
                    "  dropped: TTL exhausted after {} hop(s) at {} ({:.4} ms)",
                    outcome.hops_taken,
                    self.hops.last().map(String::as_str).unwrap_or("-"),
                    outcome.elapsed_ms
                )?;
            }
        }
        Ok(())
    }
}

/// BFS and DFS orders from one device
#[derive(Debug, Clone, Serialize)]
pub struct TraversalReport {
    pub start: String,
    pub bfs: Vec<String>,
    pub dfs: Vec<String>,
}

impl TraversalReport {
    pub fn explore(sim: &NetworkSimulator, start: &str) -> Self {
        let topology = sim.topology();
        Self {
            start: start.to_string(),
            bfs: topology.bfs(start.to_string()).collect(),
            dfs: topology.dfs(start.to_string()).collect(),
        }
    }
}

impl fmt::Display for TraversalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BFS from {}: {}", self.start, self.bfs.join(" "))?;
        writeln!(f, "DFS from {}: {}", self.start, self.dfs.join(" "))
    }
}

/// Devices and adjacency of a simulator, for `--print-topology`
#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub devices: Vec<String>,
    pub adjacency: Vec<String>,
}

impl TopologyReport {
    pub fn describe(sim: &NetworkSimulator) -> Self {
        Self {
            devices: sim.devices().map(ToString::to_string).collect(),
            adjacency: sim.topology().to_string().lines().map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Devices:")?;
        for device in &self.devices {
            writeln!(f, "  {}", device)?;
        }
        writeln!(f, "Topology:")?;
        for line in &self.adjacency {
            writeln!(f, "  {}", line)?;
        }
        Ok(())
    }
}

/// All deliveries of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub devices: usize,
    pub links: usize,
    pub deliveries: Vec<DeliveryReport>,
}

impl ScenarioReport {
    pub fn delivered_count(&self) -> usize {
        self.deliveries.iter().filter(|d| d.delivered()).count()
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network: {} devices, {} links", self.devices, self.links)?;
        for delivery in &self.deliveries {
            write!(f, "{}", delivery)?;
        }
        writeln!(
            f,
            "Delivered {}/{} packet(s)",
            self.delivered_count(),
            self.deliveries.len()
        )
    }
}
