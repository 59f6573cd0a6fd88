#[cfg(test)]
mod simulation_tests {
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    use netsim::config_loader::load_config;
    use netsim::graph::{Graph, ShortestPaths, WeightedEdge};
    use netsim::network::{Device, Link, Packet};
    use netsim::routing::{CostPolicy, Metric};
    use netsim::scenario::run_scenario;
    use netsim::simulator::NetworkSimulator;
    use netsim::topology;

    fn names(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    /// A->B 5, B->C 2, A->C 9 picks the two-hop path
    #[test]
    fn test_weighted_shortest_path() {
        let mut graph: Graph<String, WeightedEdge> = Graph::new();
        graph.add_edge("A".into(), "B".into(), WeightedEdge::new(5.0));
        graph.add_edge("B".into(), "C".into(), WeightedEdge::new(2.0));
        graph.add_edge("A".into(), "C".into(), WeightedEdge::new(9.0));

        let paths = ShortestPaths::compute(&graph, &"A".to_string());
        assert_eq!(paths.path_to(&"C".to_string()), names(&["A", "B", "C"]));
        assert!((paths.distance_to(&"C".to_string()) - 7.0).abs() < 1e-9);
        assert_eq!(paths.distance_to(&"A".to_string()), 0.0);
    }

    /// A link without bandwidth cannot carry traffic under either metric
    #[test]
    fn test_zero_bandwidth_link_blocks_route() {
        let mut sim = NetworkSimulator::new();
        sim.add_router("R1").unwrap();
        sim.add_host("H1").unwrap();
        sim.connect("R1", "H1", Link::new(1.0, 0.0)).unwrap();

        assert!(sim.route("R1", "H1", CostPolicy::Latency).path.is_empty());
        assert!(sim
            .route("R1", "H1", CostPolicy::TransferTime { payload_bytes: 100 })
            .path
            .is_empty());

        let mut packet = Packet::new("R1", "H1", 5, 100);
        let delivery = sim.send(&mut packet, Metric::Latency).unwrap();
        assert!(delivery.outcome.is_none());
    }

    /// R1 reaches H2 over its direct 3 ms link, not through S1
    #[test]
    fn test_direct_link_preferred_by_latency() {
        let mut sim = NetworkSimulator::new();
        sim.add_device(Device::router(1, "R1")).unwrap();
        sim.add_device(Device::switch(2, "S1")).unwrap();
        sim.add_device(Device::host(3, "H1", Some("10.0.0.1".parse().unwrap()))).unwrap();
        sim.add_device(Device::host(4, "H2", Some("10.0.0.2".parse().unwrap()))).unwrap();
        sim.connect("R1", "S1", Link::new(0.5, 100.0)).unwrap();
        sim.connect("S1", "H1", Link::new(1.0, 100.0)).unwrap();
        sim.connect("R1", "H2", Link::new(3.0, 100.0)).unwrap();

        let route = sim.route("R1", "H2", CostPolicy::Latency);
        assert_eq!(route.path, names(&["R1", "H2"]));
        assert!((route.cost - 3.0).abs() < 1e-9);
    }

    /// Saving and reloading keeps every edge and device kind
    #[test]
    fn test_topology_file_round_trip() {
        let mut sim = NetworkSimulator::build_demo();
        sim.add_host("H3").unwrap();
        sim.connect_directed("H2", "H3", Link::new(0.25, 10.0).with_reliability(0.9)).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.topo");
        sim.save_topology(&path).unwrap();

        let mut loaded = NetworkSimulator::new();
        loaded.load_topology(&path).unwrap();

        let edges = |s: &NetworkSimulator| -> Vec<(String, String, Link)> {
            s.topology()
                .iter_edges()
                .map(|(from, to, link)| (from.clone(), to.clone(), *link))
                .collect()
        };
        assert_eq!(edges(&loaded), edges(&sim));

        for device in sim.devices() {
            let other = loaded.device(&device.name).unwrap();
            assert_eq!(other.kind, device.kind);
        }
        // the one-way link stays one-way
        assert!(loaded.route("H3", "H2", CostPolicy::Latency).path.is_empty());
    }

    /// TTL drops by one per hop and a short TTL truncates the hop log
    #[test]
    fn test_ttl_exhaustion_on_long_path() {
        let sim = topology::generate(topology::Shape::Dag, 2, Link::default()).unwrap();
        let route = sim.route("R0", "R1", CostPolicy::Latency);
        let mut packet = Packet::new("R0", "R1", 1, 64);
        let outcome = sim.send_packet(&route.path, &mut packet, CostPolicy::Latency).unwrap();
        assert!(outcome.delivered);
        assert_eq!(packet.ttl(), 0);

        let mut line = NetworkSimulator::new();
        let hops: Vec<String> = (0..8).map(|i| format!("N{}", i)).collect();
        for name in &hops {
            line.add_router(name).unwrap();
        }
        for pair in hops.windows(2) {
            line.connect(&pair[0], &pair[1], Link::new(1.0, 100.0)).unwrap();
        }

        let route = line.route("N0", "N7", CostPolicy::Latency);
        assert_eq!(route.path.len(), 8);

        for initial_ttl in 0..10 {
            let mut packet = Packet::new("N0", "N7", initial_ttl, 64);
            let outcome = line
                .send_packet(&route.path, &mut packet, CostPolicy::Latency)
                .unwrap();
            let hops_taken = outcome.hops_taken as i32;

            assert_eq!(packet.ttl(), initial_ttl - hops_taken);
            if route.path.len() as i32 - 1 > initial_ttl {
                assert!(!outcome.delivered);
                assert_eq!(packet.hops().len(), initial_ttl as usize + 1);
            } else {
                assert!(outcome.delivered);
                assert_eq!(packet.hops(), route.path.as_slice());
            }
            assert!((outcome.elapsed_ms - hops_taken as f64).abs() < 1e-9);
        }
    }

    /// Removing a device leaves no links pointing at it
    #[test]
    fn test_remove_device_is_total() {
        let mut sim = topology::generate(topology::Shape::Mesh, 5, Link::default()).unwrap();
        sim.remove_device("R2").unwrap();

        let graph = sim.topology();
        assert!(!graph.has_node(&"R2".to_string()));
        for node in graph.nodes() {
            assert!(!graph.neighbors(&node).contains(&"R2".to_string()));
        }
        assert_eq!(graph.edge_count(), 4 * 3);
    }

    /// A scenario file pointing at a topology file next to it
    #[test]
    fn test_scenario_with_topology_file() {
        let dir = tempdir().unwrap();
        topology::save(&NetworkSimulator::build_demo(), &dir.path().join("lab.topo")).unwrap();

        let scenario_path = dir.path().join("scenario.yaml");
        std::fs::write(
            &scenario_path,
            r#"
general:
  default_ttl: 1
topology:
  file: lab.topo
requests:
  - source: R1
    destination: H2
  - source: R1
    destination: H2
    metric: transfer_time
    payload_bytes: 2000000
  - source: H1
    destination: H2
    ttl: 5
"#,
        )
        .unwrap();

        let config = load_config(&scenario_path).unwrap();
        let (sim, report) = run_scenario(&config, Some(&scenario_path)).unwrap();

        assert_eq!(sim.device_count(), 4);
        assert_eq!(report.deliveries.len(), 3);

        // latency route R1 -> S1 -> H2 needs 2 hops but ttl is 1
        assert_eq!(report.deliveries[0].route.path, names(&["R1", "S1", "H2"]));
        assert!(!report.deliveries[0].delivered());

        // large payload goes over the direct link and fits in one hop
        assert_eq!(report.deliveries[1].route.path, names(&["R1", "H2"]));
        assert!(report.deliveries[1].delivered());

        assert!(report.deliveries[2].delivered());
        assert_eq!(report.delivered_count(), 2);
    }

    #[test]
    fn test_broken_scenario_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "topology:\n  file: does-not-exist.topo\n").unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(run_scenario(&config, Some(file.path())).is_err());
    }
}
