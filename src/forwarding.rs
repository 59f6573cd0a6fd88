//! Hop-by-hop packet forwarding along a precomputed path.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::graph::Graph;
use crate::network::{Link, Packet};
use crate::routing::CostPolicy;

/// Telemetry of one forwarding attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardOutcome {
    /// Time spent on the hops actually completed, in milliseconds
    pub elapsed_ms: f64,
    /// Number of links traversed
    pub hops_taken: usize,
    /// TTL left on the packet when forwarding stopped
    pub ttl_remaining: i32,
    /// Whether the packet reached the last device of the path
    pub delivered: bool,
}

/// Walk `path` with `packet`, charging each hop with `policy`.
///
/// The first device of the path is logged unconditionally. Each hop then
/// costs one TTL and is priced by the first `u -> v` link in the topology.
/// When the TTL runs out before the end of the path the packet is dropped:
/// the hop log and elapsed time only cover the hops actually taken.
pub fn forward(
    topology: &Graph<String, Link>,
    path: &[String],
    packet: &mut Packet,
    policy: CostPolicy,
) -> Result<ForwardOutcome, NetworkError> {
    let first = path.first().ok_or(NetworkError::EmptyPath)?;

    // resolve every hop up front so a bad path leaves the packet untouched
    let links = path
        .windows(2)
        .map(|hop| {
            topology
                .edge_between(&hop[0], &hop[1])
                .ok_or_else(|| NetworkError::MissingLink {
                    from: hop[0].clone(),
                    to: hop[1].clone(),
                })
        })
        .collect::<Result<Vec<&Link>, _>>()?;

    packet.record_hop(first);

    let mut elapsed_ms = 0.0;
    let mut hops_taken = 0;
    for (hop, link) in path.windows(2).zip(links) {
        if packet.ttl() <= 0 {
            break;
        }
        let (from, to) = (&hop[0], &hop[1]);
        let cost = policy.cost(link);
        elapsed_ms += cost;
        packet.decrement_ttl();
        packet.record_hop(to);
        hops_taken += 1;
        debug!("  {} -> {} ({:.4} ms, ttl {})", from, to, cost, packet.ttl());
    }

    let delivered = packet.hops().last() == path.last();
    if !delivered {
        warn!(
            "TTL exhausted after {} hops, packet {} -> {} dropped",
            hops_taken,
            packet.source(),
            packet.destination()
        );
    }

    Ok(ForwardOutcome {
        elapsed_ms,
        hops_taken,
        ttl_remaining: packet.ttl(),
        delivered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(len: usize) -> (Graph<String, Link>, Vec<String>) {
        let names: Vec<String> = (0..len).map(|i| format!("N{}", i)).collect();
        let mut graph = Graph::new();
        for pair in names.windows(2) {
            graph.add_edge(pair[0].clone(), pair[1].clone(), Link::new(1.0, 100.0));
        }
        (graph, names)
    }

    #[test]
    fn test_delivers_within_ttl() {
        let (graph, path) = chain(4);
        let mut packet = Packet::new("N0", "N3", 8, 1500);

        let outcome = forward(&graph, &path, &mut packet, CostPolicy::Latency).unwrap();

        assert!(outcome.delivered);
        assert_eq!(outcome.hops_taken, 3);
        assert_eq!(outcome.ttl_remaining, 5);
        assert_eq!(packet.ttl(), 5);
        assert_eq!(packet.hops(), path.as_slice());
        assert!((outcome.elapsed_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_drops_when_ttl_runs_out() {
        let (graph, path) = chain(6);
        let initial_ttl = 3;
        let mut packet = Packet::new("N0", "N5", initial_ttl, 64);

        let outcome = forward(&graph, &path, &mut packet, CostPolicy::Latency).unwrap();

        assert!(!outcome.delivered);
        assert_eq!(packet.ttl(), 0);
        assert_eq!(packet.hops().len(), initial_ttl as usize + 1);
        assert_eq!(packet.hops().last().map(String::as_str), Some("N3"));
        assert!((outcome.elapsed_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_ttl_still_delivers() {
        let (graph, path) = chain(3);
        let mut packet = Packet::new("N0", "N2", 2, 64);

        let outcome = forward(&graph, &path, &mut packet, CostPolicy::Latency).unwrap();
        assert!(outcome.delivered);
        assert_eq!(outcome.ttl_remaining, 0);
    }

    #[test]
    fn test_single_node_path() {
        let (graph, _) = chain(2);
        let path = vec!["N0".to_string()];
        let mut packet = Packet::new("N0", "N0", 0, 64);

        let outcome = forward(&graph, &path, &mut packet, CostPolicy::Latency).unwrap();
        assert!(outcome.delivered);
        assert_eq!(outcome.hops_taken, 0);
        assert_eq!(outcome.elapsed_ms, 0.0);
        assert_eq!(packet.hops(), ["N0".to_string()]);
    }

    #[test]
    fn test_transfer_time_is_charged() {
        let (graph, path) = chain(2);
        let mut packet = Packet::new("N0", "N1", 4, 1500);

        let policy = CostPolicy::TransferTime { payload_bytes: packet.size_bytes() };
        let outcome = forward(&graph, &path, &mut packet, policy).unwrap();
        assert!((outcome.elapsed_ms - 1.12).abs() < 1e-9);
    }

    #[test]
    fn test_first_parallel_link_is_used() {
        let mut graph: Graph<String, Link> = Graph::new();
        graph.add_edge("A".into(), "B".into(), Link::new(9.0, 100.0));
        graph.add_edge("A".into(), "B".into(), Link::new(1.0, 100.0));
        let path = vec!["A".to_string(), "B".to_string()];
        let mut packet = Packet::new("A", "B", 4, 64);

        let outcome = forward(&graph, &path, &mut packet, CostPolicy::Latency).unwrap();
        assert_eq!(outcome.elapsed_ms, 9.0);
    }

    #[test]
    fn test_errors() {
        let (graph, _) = chain(2);
        let mut packet = Packet::new("N0", "N1", 4, 64);

        assert_eq!(
            forward(&graph, &[], &mut packet, CostPolicy::Latency),
            Err(NetworkError::EmptyPath)
        );

        let bogus = vec!["N1".to_string(), "N0".to_string()];
        assert!(matches!(
            forward(&graph, &bogus, &mut packet, CostPolicy::Latency),
            Err(NetworkError::MissingLink { .. })
        ));
        assert!(packet.hops().is_empty());
        assert_eq!(packet.ttl(), 4);
    }
}
