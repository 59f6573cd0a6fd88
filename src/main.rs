use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

use netsim::config::{GeneralConfig, RouteRequest, ScenarioConfig, DEFAULT_LOG_LEVEL};
use netsim::network::{DEFAULT_SIZE_BYTES, DEFAULT_TTL};
use netsim::report::{TopologyReport, TraversalReport};
use netsim::routing::{AlgorithmKind, Metric};
use netsim::simulator::NetworkSimulator;
use netsim::{config_loader, scenario};

/// Route and deliver packets through a simulated network topology
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario YAML file describing a topology and delivery requests
    #[arg(short, long, conflicts_with_all = ["topology", "demo", "source"])]
    config: Option<PathBuf>,

    /// Topology file to load (NODES:/EDGES: text format)
    #[arg(short, long)]
    topology: Option<PathBuf>,

    /// Use the built-in four-device demo topology
    #[arg(long, conflicts_with = "topology")]
    demo: bool,

    /// Source device of the packet
    #[arg(short, long, requires = "destination")]
    source: Option<String>,

    /// Destination device of the packet
    #[arg(short, long, requires = "source")]
    destination: Option<String>,

    /// Payload size in bytes
    #[arg(long, default_value_t = DEFAULT_SIZE_BYTES)]
    payload_bytes: u64,

    /// Cost metric used to pick the route
    #[arg(long, value_enum, default_value_t = Metric::Latency)]
    metric: Metric,

    /// Routing algorithm
    #[arg(long, value_enum, default_value_t = AlgorithmKind::Dijkstra)]
    algorithm: AlgorithmKind,

    /// Initial TTL of the packet
    #[arg(long, default_value_t = DEFAULT_TTL)]
    ttl: i32,

    /// Print BFS and DFS orders starting from the source device
    #[arg(long, requires = "source")]
    explore: bool,

    /// Print the devices and adjacency lists
    #[arg(long)]
    print_topology: bool,

    /// Save the topology to this file after running
    #[arg(long)]
    save: Option<PathBuf>,

    /// Emit results as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Load the scenario first so its log_level can seed the logger
    let config = args.config.as_deref().map(config_loader::load_config).transpose()?;

    // Initialize logging; RUST_LOG overrides the scenario or "info" default
    env_logger::Builder::from_env(Env::default().default_filter_or(log_filter(config.as_ref()))).init();

    let sim = match (&config, &args.config) {
        (Some(config), Some(config_path)) => run_config(config, config_path, args.json)?,
        _ => run_adhoc(&args)?,
    };

    if let Some(path) = &args.save {
        sim.save_topology(path)?;
    }

    info!("Simulation completed successfully");
    Ok(())
}

/// Default logging filter: the scenario's `log_level`, else "info"
fn log_filter(config: Option<&ScenarioConfig>) -> &str {
    config.map_or(DEFAULT_LOG_LEVEL, |config| config.general.log_filter())
}

/// Run a loaded scenario and print its report
fn run_config(config: &ScenarioConfig, config_path: &Path, json: bool) -> Result<NetworkSimulator> {
    info!("Running scenario {:?}", config_path);
    let (sim, report) = scenario::run_scenario(config, Some(config_path))?;
    emit(&report, json)?;
    Ok(sim)
}

/// Run a single request described by command-line flags
fn run_adhoc(args: &Args) -> Result<NetworkSimulator> {
    let sim = match &args.topology {
        Some(path) => {
            let mut sim = NetworkSimulator::new();
            sim.load_topology(path)?;
            sim
        }
        None => {
            if !args.demo {
                info!("No topology given, using the demo network");
            }
            NetworkSimulator::build_demo()
        }
    };

    if args.print_topology {
        emit(&TopologyReport::describe(&sim), args.json)?;
    }

    if let (Some(source), Some(destination)) = (&args.source, &args.destination) {
        if sim.device(source).is_none() {
            return Err(eyre!("Unknown source device '{}'", source));
        }
        if args.explore {
            emit(&TraversalReport::explore(&sim, source), args.json)?;
        }

        let request = RouteRequest {
            source: source.clone(),
            destination: destination.clone(),
            metric: args.metric,
            payload_bytes: Some(args.payload_bytes),
            ttl: Some(args.ttl),
            algorithm: Some(args.algorithm),
        };
        let report = scenario::execute_request(&sim, &request, &GeneralConfig::default())?;
        emit(&report, args.json)?;
    }

    Ok(sim)
}

fn emit<T: Serialize + std::fmt::Display>(value: &T, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(value).wrap_err("Failed to serialize report")?;
        println!("{}", text);
    } else {
        print!("{}", value);
    }
    Ok(())
}
