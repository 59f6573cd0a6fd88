//! The network simulator: device registry plus physical topology.
//!
//! `NetworkSimulator` owns a graph of device names connected by [`Link`]s
//! and a registry mapping each name to its [`Device`]. It is the entry point
//! for assembling a network, asking for routes and emulating delivery.

use std::collections::BTreeMap;
use std::path::Path;

use color_eyre::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::forwarding::{self, ForwardOutcome};
use crate::graph::Graph;
use crate::network::{Device, Link, Packet};
use crate::routing::{CostPolicy, DijkstraRouting, Metric, Route, RoutingAlgorithm};
use crate::topology::format;

/// Result of routing and then forwarding a packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub route: Route,
    /// `None` when no route exists and nothing was sent
    pub outcome: Option<ForwardOutcome>,
}

impl Delivery {
    pub fn delivered(&self) -> bool {
        self.outcome.as_ref().map_or(false, |outcome| outcome.delivered)
    }
}

/// Registry of devices and the links between them
#[derive(Debug, Clone)]
pub struct NetworkSimulator {
    topology: Graph<String, Link>,
    devices: BTreeMap<String, Device>,
    next_id: u32,
}

impl Default for NetworkSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkSimulator {
    pub fn new() -> Self {
        Self {
            topology: Graph::new(),
            devices: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Register a device and create its node.
    pub fn add_device(&mut self, device: Device) -> Result<(), NetworkError> {
        validate_name(&device.name)?;
        if let Some(label) = device.mgmt_interface() {
            if !is_single_token(label) {
                return Err(NetworkError::InvalidInterfaceLabel(label.to_string()));
            }
        }
        if self.devices.contains_key(&device.name) {
            return Err(NetworkError::DuplicateDevice(device.name));
        }

        debug!("Registering {}", device);
        self.next_id = self.next_id.max(device.id.saturating_add(1));
        self.topology.add_node(device.name.clone());
        self.devices.insert(device.name.clone(), device);
        Ok(())
    }

    pub fn add_router(&mut self, name: &str) -> Result<(), NetworkError> {
        let device = Device::router(self.next_id, name);
        self.add_device(device)
    }

    pub fn add_switch(&mut self, name: &str) -> Result<(), NetworkError> {
        let device = Device::switch(self.next_id, name);
        self.add_device(device)
    }

    pub fn add_host(&mut self, name: &str) -> Result<(), NetworkError> {
        let device = Device::host(self.next_id, name, None);
        self.add_device(device)
    }

    /// Id the next convenience constructor will use.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Connect two registered devices in both directions.
    pub fn connect(&mut self, a: &str, b: &str, link: Link) -> Result<(), NetworkError> {
        self.connect_directed(a, b, link)?;
        self.connect_directed(b, a, link)
    }

    /// Add a single `from -> to` link between registered devices.
    pub fn connect_directed(&mut self, from: &str, to: &str, link: Link) -> Result<(), NetworkError> {
        self.require(from)?;
        self.require(to)?;
        self.topology.add_edge(from.to_string(), to.to_string(), link);
        Ok(())
    }

    /// Remove every link between `a` and `b`, both directions.
    pub fn disconnect(&mut self, a: &str, b: &str) {
        let (a, b) = (a.to_string(), b.to_string());
        self.topology.remove_edge(&a, &b);
        self.topology.remove_edge(&b, &a);
    }

    /// Unregister a device and drop all links touching it.
    pub fn remove_device(&mut self, name: &str) -> Option<Device> {
        let device = self.devices.remove(name)?;
        self.topology.remove_node(&name.to_string());
        Some(device)
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.get(name)
    }

    /// Registered devices ordered by name.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn topology(&self) -> &Graph<String, Link> {
        &self.topology
    }

    pub fn clear(&mut self) {
        self.topology.clear();
        self.devices.clear();
        self.next_id = 1;
    }

    /// Cheapest route under `policy`.
    pub fn route(&self, source: &str, destination: &str, policy: CostPolicy) -> Route {
        self.find_route(&DijkstraRouting, source, destination, policy)
    }

    /// Route with a caller-chosen algorithm.
    pub fn find_route<A>(
        &self,
        algorithm: &A,
        source: &str,
        destination: &str,
        policy: CostPolicy,
    ) -> Route
    where
        A: RoutingAlgorithm + ?Sized,
    {
        debug!("Routing {} -> {} with {}", source, destination, algorithm.name());
        algorithm.find_route(&self.topology, source, destination, policy)
    }

    /// Forward `packet` along an already computed path.
    pub fn send_packet(
        &self,
        path: &[String],
        packet: &mut Packet,
        policy: CostPolicy,
    ) -> Result<ForwardOutcome, NetworkError> {
        forwarding::forward(&self.topology, path, packet, policy)
    }

    /// Route `packet` from its source to its destination and forward it.
    ///
    /// The packet's own size feeds the transfer-time metric.
    pub fn send(&self, packet: &mut Packet, metric: Metric) -> Result<Delivery, NetworkError> {
        let policy = metric.policy(packet.size_bytes());
        let route = self.route(packet.source(), packet.destination(), policy);
        if !route.is_found() {
            return Ok(Delivery {
                route,
                outcome: None,
            });
        }

        let outcome = self.send_packet(&route.path, packet, policy)?;
        Ok(Delivery {
            route,
            outcome: Some(outcome),
        })
    }

    /// Write the topology to `path` in the text format.
    pub fn save_topology(&self, path: &Path) -> Result<()> {
        format::save(self, path)
    }

    /// Replace this simulator with the topology stored at `path`.
    ///
    /// The file is fully parsed before anything is replaced; on error the
    /// current topology is left as it was.
    pub fn load_topology(&mut self, path: &Path) -> Result<()> {
        let loaded = format::load(path)?;
        *self = loaded;
        Ok(())
    }

    /// Small four-device network: R1 and S1 both reach H2, R1 directly over
    /// a slower link.
    pub fn build_demo() -> Self {
        let mut sim = Self::new();
        let devices = [
            Device::router(1, "R1").with_mgmt_interface("mgmt0"),
            Device::switch(2, "S1").with_mgmt_interface("mgmt1"),
            Device::host(3, "H1", Some([10, 0, 0, 1].into())),
            Device::host(4, "H2", Some([10, 0, 0, 2].into())),
        ];
        let links = [
            ("R1", "S1", Link::new(1.0, 100.0)),
            ("S1", "H1", Link::new(2.0, 100.0)),
            ("S1", "H2", Link::new(5.0, 50.0)),
            ("R1", "H2", Link::new(10.0, 100.0)),
        ];

        for device in devices {
            sim.topology.add_node(device.name.clone());
            sim.devices.insert(device.name.clone(), device);
        }
        sim.next_id = 5;
        for (a, b, link) in links {
            sim.topology.add_edge(a.to_string(), b.to_string(), link);
            sim.topology.add_edge(b.to_string(), a.to_string(), link);
        }
        info!(
            "Built demo topology: {} devices, {} links",
            sim.device_count(),
            sim.topology.edge_count()
        );
        sim
    }

    fn require(&self, name: &str) -> Result<(), NetworkError> {
        if self.devices.contains_key(name) {
            Ok(())
        } else {
            Err(NetworkError::UnknownDevice(name.to_string()))
        }
    }
}

/// Device names double as tokens in the topology file.
/// Whether `text` fits in one whitespace-separated field of the text format.
pub(crate) fn is_single_token(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(char::is_whitespace)
}

fn validate_name(name: &str) -> Result<(), NetworkError> {
    if name.is_empty() {
        return Err(NetworkError::EmptyDeviceName);
    }
    if name.chars().any(char::is_whitespace) || name.starts_with('#') || name.ends_with(':') {
        return Err(NetworkError::InvalidDeviceName(name.to_string()));
    }
    Ok(())
}
