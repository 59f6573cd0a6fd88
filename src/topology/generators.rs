//! Synthetic topology templates.
//!
//! Each template builds a simulator of `size` devices joined by identical
//! links. Device names are stable (`S0`, `H1`.. for a star, `R0`, `R1`..
//! otherwise) so generated networks can be queried by name.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::network::{Device, Link};
use crate::simulator::NetworkSimulator;

/// Shape of a generated topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A central switch with every other device a host attached to it
    Star,
    /// Every router linked to every other router
    Mesh,
    /// Routers linked to their predecessor and successor, wrapping around
    Ring,
    /// Directed links from every router to all routers with a higher index
    Dag,
}

/// Build a `shape` topology of `size` devices using `link` everywhere.
pub fn generate(shape: Shape, size: usize, link: Link) -> Result<NetworkSimulator, NetworkError> {
    let mut sim = NetworkSimulator::new();
    let names = device_names(shape, size);

    for (index, name) in names.iter().enumerate() {
        let id = index as u32 + 1;
        let device = match shape {
            Shape::Star if index == 0 => Device::switch(id, name.as_str()),
            Shape::Star => Device::host(id, name.as_str(), None),
            _ => Device::router(id, name.as_str()),
        };
        sim.add_device(device)?;
    }

    match shape {
        Shape::Star => {
            if let Some((hub, leaves)) = names.split_first() {
                for leaf in leaves {
                    sim.connect(hub, leaf, link)?;
                }
            }
        }
        Shape::Mesh => {
            for (i, a) in names.iter().enumerate() {
                for b in &names[i + 1..] {
                    sim.connect(a, b, link)?;
                }
            }
        }
        Shape::Ring => match names.len() {
            0 | 1 => {}
            2 => sim.connect(&names[0], &names[1], link)?,
            n => {
                for i in 0..n {
                    sim.connect(&names[i], &names[(i + 1) % n], link)?;
                }
            }
        },
        Shape::Dag => {
            for (i, from) in names.iter().enumerate() {
                for to in &names[i + 1..] {
                    sim.connect_directed(from, to, link)?;
                }
            }
        }
    }

    info!(
        "Generated {:?} topology: {} devices, {} links",
        shape,
        sim.device_count(),
        sim.topology().edge_count()
    );
    Ok(sim)
}

fn device_names(shape: Shape, size: usize) -> Vec<String> {
    (0..size)
        .map(|i| match shape {
            Shape::Star if i == 0 => "S0".to_string(),
            Shape::Star => format!("H{}", i),
            _ => format!("R{}", i),
        })
        .collect()
}
