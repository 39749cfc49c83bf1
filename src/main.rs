use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use metro_net::loader;
use metro_net::metro::{Metric, Network, RobustnessSimulator, StationId, Weighting};

#[derive(Parser)]
#[command(name = "metro_net")]
#[command(about = "Route finding and robustness analysis for metro networks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the K best routes between two stations
    Paths {
        /// Directory holding stations.csv, lines.csv and services.csv
        #[arg(long)]
        data: PathBuf,

        /// Origin station id
        #[arg(long)]
        from: u32,

        /// Destination station id
        #[arg(long)]
        to: u32,

        /// Number of routes
        #[arg(short, default_value = "3")]
        k: usize,

        /// Edge weighting: time or distance
        #[arg(long, default_value = "time")]
        weighting: String,

        /// Route on the station graph, ignoring transfers
        #[arg(long)]
        no_transfers: bool,
    },

    /// Print how connectivity decays under random station failures
    Robustness {
        /// Directory holding stations.csv, lines.csv and services.csv
        #[arg(long)]
        data: PathBuf,

        /// Number of independent runs to average
        #[arg(long, default_value = "10")]
        runs: usize,

        #[arg(long, value_enum, default_value = "cluster")]
        metric: MetricArg,

        /// Edge weighting: time or distance
        #[arg(long, default_value = "time")]
        weighting: String,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Cluster,
    Efficiency,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Cluster => Metric::LargestCluster,
            MetricArg::Efficiency => Metric::GlobalEfficiency,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Paths {
            data,
            from,
            to,
            k,
            weighting,
            no_transfers,
        } => run_paths(load(&data)?, from, to, k, weighting.parse()?, !no_transfers),
        Command::Robustness {
            data,
            runs,
            metric,
            weighting,
            seed,
        } => run_robustness(load(&data)?, runs, metric.into(), weighting.parse()?, seed),
    }
}

fn load(data: &Path) -> Result<Network> {
    let records = loader::read_dir(data)?;
    let name = data
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "metro".to_string());
    Network::from_records(name, &records).context("Failed to build network")
}

fn run_paths(
    network: Network,
    from: u32,
    to: u32,
    k: usize,
    weighting: Weighting,
    transfers: bool,
) -> Result<()> {
    let paths = network.shortest_paths(StationId(from), StationId(to), k, weighting, transfers)?;

    let name = |id: &StationId| {
        network
            .station(*id)
            .map(|station| station.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    println!("=== {} routes from {} to {} ===", k, name(&StationId(from)), name(&StationId(to)));
    for (rank, path) in paths.iter().enumerate() {
        if path.is_placeholder() {
            println!("  {}. no route", rank + 1);
            continue;
        }
        let stops: Vec<String> = path.stations.iter().map(&name).collect();
        println!(
            "  {}. {:.1} ({} nodes): {}",
            rank + 1,
            path.weight,
            path.vertices.len(),
            stops.join(" -> ")
        );
    }
    Ok(())
}

fn run_robustness(
    network: Network,
    runs: usize,
    metric: Metric,
    weighting: Weighting,
    seed: Option<u64>,
) -> Result<()> {
    let graph = network.station_graph(weighting);
    let mut simulator = RobustnessSimulator::new(runs, metric);
    if let Some(seed) = seed {
        simulator = simulator.with_seed(seed);
    }
    let curve = simulator.simulate(&graph)?;

    println!("=== {:?} over {} runs ===", metric, runs);
    println!("removed_fraction,value");
    for (fraction, value) in curve.removed_fraction.iter().zip(&curve.values) {
        println!("{:.4},{:.4}", fraction, value);
    }
    Ok(())
}
