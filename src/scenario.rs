//! Scenario execution: build a topology and run delivery requests on it.

use std::path::Path;

use color_eyre::Result;
use log::{debug, info};

use crate::config::{GeneralConfig, RouteRequest, ScenarioConfig, TopologyConfig};
use crate::config_loader::resolve_relative;
use crate::network::{Device, Packet};
use crate::report::{DeliveryReport, ScenarioReport};
use crate::simulator::NetworkSimulator;
use crate::topology;

/// Build the simulator described by `config`.
///
/// Relative topology file paths are resolved against `base`, the scenario
/// file's location, when given.
pub fn build_topology(config: &TopologyConfig, base: Option<&Path>) -> Result<NetworkSimulator> {
    let sim = match config {
        TopologyConfig::Demo { .. } => NetworkSimulator::build_demo(),
        TopologyConfig::File { file } => {
            let path = match base {
                Some(base) => resolve_relative(base, file),
                None => file.clone(),
            };
            topology::load(&path)?
        }
        TopologyConfig::Generated { shape, size, link } => topology::generate(*shape, *size, *link)?,
        TopologyConfig::Inline { devices, links } => {
            let mut sim = NetworkSimulator::new();
            for (index, spec) in devices.iter().enumerate() {
                let mut device = Device::of_class(spec.kind, index as u32 + 1, spec.name.as_str());
                if let Some(address) = spec.address {
                    device = device.with_address(address);
                }
                if let Some(label) = &spec.mgmt_interface {
                    device = device.with_mgmt_interface(label.as_str());
                }
                sim.add_device(device)?;
            }
            for spec in links {
                if spec.bidirectional {
                    sim.connect(&spec.from, &spec.to, spec.link())?;
                } else {
                    sim.connect_directed(&spec.from, &spec.to, spec.link())?;
                }
            }
            sim
        }
    };

    debug!(
        "Topology ready: {} devices, {} links",
        sim.device_count(),
        sim.topology().edge_count()
    );
    Ok(sim)
}

/// Route and forward a single request, filling defaults from `general`.
pub fn execute_request(
    sim: &NetworkSimulator,
    request: &RouteRequest,
    general: &GeneralConfig,
) -> Result<DeliveryReport> {
    let payload_bytes = request.payload_bytes.unwrap_or(general.default_payload_bytes);
    let initial_ttl = request.ttl.unwrap_or(general.default_ttl);
    let algorithm = request.algorithm.unwrap_or(general.algorithm).build();
    let policy = request.metric.policy(payload_bytes);

    let route = sim.find_route(algorithm.as_ref(), &request.source, &request.destination, policy);
    let mut packet = Packet::new(
        request.source.as_str(),
        request.destination.as_str(),
        initial_ttl,
        payload_bytes,
    );
    let outcome = if route.is_found() {
        Some(sim.send_packet(&route.path, &mut packet, policy)?)
    } else {
        None
    };

    Ok(DeliveryReport {
        source: request.source.clone(),
        destination: request.destination.clone(),
        metric: request.metric,
        algorithm: algorithm.name().to_string(),
        payload_bytes,
        initial_ttl,
        route,
        outcome,
        hops: packet.hops().to_vec(),
    })
}

/// Run every request of `config` against `sim`.
pub fn run_requests(sim: &NetworkSimulator, config: &ScenarioConfig) -> Result<ScenarioReport> {
    info!("Running {} request(s)", config.requests.len());
    let deliveries = config
        .requests
        .iter()
        .map(|request| execute_request(sim, request, &config.general))
        .collect::<Result<Vec<_>>>()?;

    Ok(ScenarioReport {
        devices: sim.device_count(),
        links: sim.topology().edge_count(),
        deliveries,
    })
}

/// Build the scenario's topology and run its requests.
pub fn run_scenario(config: &ScenarioConfig, base: Option<&Path>) -> Result<(NetworkSimulator, ScenarioReport)> {
    let sim = build_topology(&config.topology, base)?;
    let report = run_requests(&sim, config)?;
    info!(
        "Scenario complete: {}/{} delivered",
        report.delivered_count(),
        report.deliveries.len()
    );
    Ok((sim, report))
}
