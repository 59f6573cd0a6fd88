//! Plain-text topology dump.
//!
//! ```text
//! # comment
//! NODES:
//!  R1 Router mgmt0
//!  H1 Host 10.0.0.1
//!  S1 Switch
//! EDGES:
//!  R1 S1 0.5 100 0.999
//! ```
//!
//! Node lines are `<name> <kind> [<detail>]`, where the optional detail is a
//! host address or a router/switch management interface. Edge lines are
//! `<from> <to> <latency_ms> <bandwidth_mbps> <reliability>` and always
//! describe a single direction; a bidirectional link is written as two
//! lines. Blank lines and lines starting with `#` are ignored.

use std::fs;
use std::net::IpAddr;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;

use crate::error::NetworkError;
use crate::network::{Device, DeviceClass, Link};
use crate::simulator::NetworkSimulator;

const NODES_HEADER: &str = "NODES:";
const EDGES_HEADER: &str = "EDGES:";

/// Errors found while parsing a topology dump. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyFormatError {
    #[error("line {line}: entry before any NODES: or EDGES: header")]
    MissingSection { line: usize },
    #[error("line {line}: expected {expected}, found {found:?}")]
    MalformedLine {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("line {line}: invalid {field} {value:?}")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: {source}")]
    Network {
        line: usize,
        #[source]
        source: NetworkError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Nodes,
    Edges,
}

/// Render the simulator's devices and links.
pub fn render(sim: &NetworkSimulator) -> String {
    let mut out = String::new();
    out.push_str(NODES_HEADER);
    out.push('\n');
    for device in sim.devices() {
        let line = match device.detail() {
            Some(detail) => format!(" {} {} {}\n", device.name, device.kind_name(), detail),
            None => format!(" {} {}\n", device.name, device.kind_name()),
        };
        out.push_str(&line);
    }

    out.push_str(EDGES_HEADER);
    out.push('\n');
    for (from, to, link) in sim.topology().iter_edges() {
        out.push_str(&format!(
            " {} {} {} {} {}\n",
            from, to, link.latency_ms, link.bandwidth_mbps, link.reliability
        ));
    }
    out
}

/// Parse a topology dump into a fresh simulator.
///
/// Device ids are assigned from 1 in file order.
pub fn parse(text: &str) -> Result<NetworkSimulator, TopologyFormatError> {
    let mut sim = NetworkSimulator::new();
    let mut section = Section::Preamble;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match trimmed {
            NODES_HEADER => {
                section = Section::Nodes;
                continue;
            }
            EDGES_HEADER => {
                section = Section::Edges;
                continue;
            }
            _ => {}
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match section {
            Section::Preamble => return Err(TopologyFormatError::MissingSection { line }),
            Section::Nodes => {
                let device = parse_device(line, &fields, sim.next_id())?;
                sim.add_device(device)
                    .map_err(|source| TopologyFormatError::Network { line, source })?;
            }
            Section::Edges => {
                let (from, to, link) = parse_edge(line, &fields)?;
                sim.connect_directed(from, to, link)
                    .map_err(|source| TopologyFormatError::Network { line, source })?;
            }
        }
    }

    Ok(sim)
}

fn parse_device(line: usize, fields: &[&str], id: u32) -> Result<Device, TopologyFormatError> {
    let (name, kind, detail) = match fields {
        [name, kind] => (*name, *kind, None),
        [name, kind, detail] => (*name, *kind, Some(*detail)),
        _ => {
            return Err(TopologyFormatError::MalformedLine {
                line,
                expected: "<name> <kind> [<detail>]",
                found: fields.join(" "),
            })
        }
    };

    let class: DeviceClass = kind.parse().map_err(|_| TopologyFormatError::InvalidValue {
        line,
        field: "device kind",
        value: kind.to_string(),
    })?;

    let device = Device::of_class(class, id, name);
    let device = match (class, detail) {
        (_, None) => device,
        (DeviceClass::Host, Some(address)) => {
            let ip: IpAddr = address.parse().map_err(|_| TopologyFormatError::InvalidValue {
                line,
                field: "host address",
                value: address.to_string(),
            })?;
            device.with_address(ip)
        }
        (DeviceClass::Router | DeviceClass::Switch, Some(label)) => device.with_mgmt_interface(label),
    };
    Ok(device)
}

fn parse_edge<'a>(line: usize, fields: &[&'a str]) -> Result<(&'a str, &'a str, Link), TopologyFormatError> {
    let [from, to, latency, bandwidth, reliability] = fields else {
        return Err(TopologyFormatError::MalformedLine {
            line,
            expected: "<from> <to> <latency_ms> <bandwidth_mbps> <reliability>",
            found: fields.join(" "),
        });
    };

    let link = Link {
        latency_ms: parse_non_negative(line, "latency", latency)?,
        bandwidth_mbps: parse_non_negative(line, "bandwidth", bandwidth)?,
        reliability: parse_non_negative(line, "reliability", reliability)?,
    };
    if link.reliability > 1.0 {
        return Err(TopologyFormatError::InvalidValue {
            line,
            field: "reliability",
            value: reliability.to_string(),
        });
    }
    Ok((*from, *to, link))
}

fn parse_non_negative(line: usize, field: &'static str, value: &str) -> Result<f64, TopologyFormatError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => Ok(number),
        _ => Err(TopologyFormatError::InvalidValue {
            line,
            field,
            value: value.to_string(),
        }),
    }
}

/// Write the simulator's topology to `path`.
pub fn save(sim: &NetworkSimulator, path: &Path) -> Result<()> {
    fs::write(path, render(sim))
        .wrap_err_with(|| format!("Failed to write topology file '{}'", path.display()))?;
    info!(
        "Saved topology to {:?}: {} devices, {} links",
        path,
        sim.device_count(),
        sim.topology().edge_count()
    );
    Ok(())
}

/// Read and parse the topology stored at `path`.
pub fn load(path: &Path) -> Result<NetworkSimulator> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read topology file '{}'", path.display()))?;
    let sim = parse(&content)
        .wrap_err_with(|| format!("Failed to parse topology file '{}'", path.display()))?;
    info!(
        "Loaded topology from {:?}: {} devices, {} links",
        path,
        sim.device_count(),
        sim.topology().edge_count()
    );
    Ok(sim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::CostPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_topology() {
        let text = r#"
# lab network
NODES:
 R1 Router mgmt0
 S1 Switch
 H1 Host 10.0.0.1

EDGES:
 R1 S1 0.5 100 0.999
 S1 H1 1.0 100 0.999
"#;
        let sim = parse(text).unwrap();

        assert_eq!(sim.device_count(), 3);
        assert_eq!(sim.device("R1").unwrap().mgmt_interface(), Some("mgmt0"));
        assert_eq!(sim.device("H1").unwrap().address(), Some("10.0.0.1".parse().unwrap()));
        assert_eq!(sim.device("S1").unwrap().id, 2);

        // edges are directed as written
        let route = sim.route("R1", "H1", CostPolicy::Latency);
        assert_eq!(route.path, vec!["R1", "S1", "H1"]);
        assert!(sim.route("H1", "R1", CostPolicy::Latency).path.is_empty());
    }

    #[test]
    fn test_render_then_parse() {
        let sim = NetworkSimulator::build_demo();
        let text = render(&sim);
        assert!(text.starts_with("NODES:\n"));
        assert!(text.contains(" H1 Host 10.0.0.1\n"));
        assert!(text.contains(" R1 S1 1 100 1\n"));

        let loaded = parse(&text).unwrap();
        assert_eq!(loaded.topology(), sim.topology());
        let kinds: Vec<_> = loaded.devices().map(|d| (d.name.clone(), d.kind.clone())).collect();
        let expected: Vec<_> = sim.devices().map(|d| (d.name.clone(), d.kind.clone())).collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_interface_labels_survive_round_trip() {
        let mut sim = NetworkSimulator::new();
        sim.add_device(Device::router(1, "R1").with_mgmt_interface("ge-0/0/0.100")).unwrap();
        sim.add_device(Device::switch(2, "S1")).unwrap();
        sim.connect("R1", "S1", Link::new(0.5, 1000.0)).unwrap();
        assert!(sim
            .add_device(Device::router(3, "R2").with_mgmt_interface("mgmt 0"))
            .is_err());

        let text = render(&sim);
        assert!(text.contains(" R1 Router ge-0/0/0.100\n"));
        assert!(text.contains(" S1 Switch\n"));

        let loaded = parse(&text).unwrap();
        assert_eq!(loaded.device("R1").unwrap().mgmt_interface(), Some("ge-0/0/0.100"));
        assert_eq!(loaded.topology(), sim.topology());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse(" R1 Router").unwrap_err(),
            TopologyFormatError::MissingSection { line: 1 }
        );
        assert!(matches!(
            parse("NODES:\n R1 Hub").unwrap_err(),
            TopologyFormatError::InvalidValue { line: 2, field: "device kind", .. }
        ));
        assert!(matches!(
            parse("NODES:\n H1 Host not-an-ip").unwrap_err(),
            TopologyFormatError::InvalidValue { field: "host address", .. }
        ));
        assert!(matches!(
            parse("NODES:\n R1 Router\nEDGES:\n R1 R2 1 1 1").unwrap_err(),
            TopologyFormatError::Network { line: 4, source: NetworkError::UnknownDevice(_) }
        ));
        assert!(matches!(
            parse("NODES:\n A Router\n B Router\nEDGES:\n A B 1 -5 1").unwrap_err(),
            TopologyFormatError::InvalidValue { field: "bandwidth", .. }
        ));
        assert!(matches!(
            parse("NODES:\n A Router\n B Router\nEDGES:\n A B 1 5").unwrap_err(),
            TopologyFormatError::MalformedLine { line: 5, .. }
        ));
        assert!(matches!(
            parse("NODES:\n A Router\n A Switch").unwrap_err(),
            TopologyFormatError::Network { source: NetworkError::DuplicateDevice(_), .. }
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let sim = NetworkSimulator::build_demo();
        let file = NamedTempFile::new().unwrap();

        save(&sim, file.path()).unwrap();
        let loaded = load(file.path()).unwrap();

        assert_eq!(loaded.topology(), sim.topology());
        assert_eq!(loaded.device_count(), 4);
    }

    #[test]
    fn test_failed_load_keeps_current_topology() {
        let mut sim = NetworkSimulator::build_demo();
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "NODES:\n X1 Router\nEDGES:\n X1 nowhere 1 1 1\n").unwrap();

        assert!(sim.load_topology(file.path()).is_err());
        assert_eq!(sim.device_count(), 4);
        assert!(sim.device("X1").is_none());

        let missing = file.path().with_extension("missing");
        assert!(sim.load_topology(&missing).is_err());
        assert_eq!(sim.device_count(), 4);
    }

    #[test]
    fn test_load_replaces_topology() {
        let mut sim = NetworkSimulator::build_demo();
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "NODES:\n A Host\n B Host\nEDGES:\n A B 2 10 1\n").unwrap();

        sim.load_topology(file.path()).unwrap();
        assert_eq!(sim.device_count(), 2);
        assert!(sim.device("R1").is_none());
        assert_eq!(sim.route("A", "B", CostPolicy::Latency).cost, 2.0);
    }
}
