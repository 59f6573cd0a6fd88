//! # Netsim - Routing and packet delivery over a simulated network
//!
//! This library models a small packet-switched network as a weighted graph,
//! computes routes between devices and emulates hop-by-hop delivery of
//! packets with a TTL.
//!
//! ## Overview
//!
//! A topology is a graph whose nodes are device names and whose edges carry
//! physical [`network::Link`] parameters (latency, bandwidth, reliability).
//! Routing prices every link with a [`routing::CostPolicy`] and runs
//! Dijkstra over the topology; forwarding then walks the chosen path,
//! spending one TTL per hop and accumulating time.
//!
//! ## Key Features
//!
//! - **Generic graph**: adjacency-list [`graph::Graph`] with lazy BFS/DFS
//! - **Pluggable weights**: one shortest-path engine, any weight function
//! - **Two cost metrics**: pure latency, or latency plus transmission time
//! - **TTL-limited forwarding**: per-hop telemetry, drops on exhaustion
//! - **Persistence**: a line-oriented text dump that round-trips
//! - **Scenarios**: YAML files with a topology and a batch of requests
//!
//! ## Architecture
//!
//! - `graph`: generic graph, traversals and shortest paths
//! - `network`: devices, links and packets
//! - `routing`: cost policies and routing algorithms
//! - `forwarding`: hop-by-hop packet delivery
//! - `simulator`: device registry plus topology
//! - `topology`: text format and synthetic topology templates
//! - `config`, `config_loader`: scenario files
//! - `scenario`: running scenario requests
//! - `report`: console and JSON presentation
//!
//! ## Example Usage
//!
//! ```rust
//! use netsim::network::{Link, Packet};
//! use netsim::routing::{CostPolicy, Metric};
//! use netsim::simulator::NetworkSimulator;
//!
//! let mut sim = NetworkSimulator::new();
//! sim.add_router("R1")?;
//! sim.add_host("H1")?;
//! sim.connect("R1", "H1", Link::new(0.5, 100.0))?;
//!
//! let route = sim.route("R1", "H1", CostPolicy::Latency);
//! assert_eq!(route.path, vec!["R1", "H1"]);
//!
//! let mut packet = Packet::new("R1", "H1", 4, 1500);
//! let delivery = sim.send(&mut packet, Metric::TransferTime)?;
//! assert!(delivery.delivered());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Unknown devices and unreachable destinations are not errors: they yield
//! empty paths. Structural mistakes (duplicate devices, links to devices
//! that were never registered) return [`error::NetworkError`]. File and
//! scenario handling uses `color_eyre` for error reports with context.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod forwarding;
pub mod graph;
pub mod network;
pub mod report;
pub mod routing;
pub mod scenario;
pub mod simulator;
pub mod topology;

pub use error::NetworkError;
pub use graph::{Graph, ShortestPaths};
pub use simulator::NetworkSimulator;
