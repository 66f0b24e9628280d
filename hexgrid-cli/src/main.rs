//! HexGrid CLI
//!
//! Commands:
//! - show: Render the scenario board
//! - los: Trace a line of sight
//! - moves: List cells reachable this turn
//! - path: Find the cheapest route
//! - influence: Map the unit's volume of fire
//! - locate: Find the cell under a plane point
//! - generate: Write a random scenario

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexgrid_cli::commands::{
    self, EndpointArgs, GenerateArgs, InfluenceArgs, LocateArgs, MovesArgs,
};
use hexgrid_cli::{Scenario, Session};

#[derive(Parser)]
#[command(name = "hexgrid")]
#[command(about = "Hex board line of sight, movement and pathfinding")]
struct Cli {
    /// Scenario JSON file (default: built-in demo board)
    #[arg(long, global = true, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log search details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the scenario board
    Show,
    /// Trace a line of sight
    Los(EndpointArgs),
    /// List cells reachable this turn
    Moves(MovesArgs),
    /// Find the cheapest route
    Path(EndpointArgs),
    /// Map the unit's volume of fire
    Influence(InfluenceArgs),
    /// Find the cell under a plane point
    Locate(LocateArgs),
    /// Write a random scenario
    Generate(GenerateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let scenario = cli.scenario.as_deref();
    let report = match &cli.command {
        Commands::Show => open(scenario)?.show(),
        Commands::Los(args) => open(scenario)?.line_of_sight(args)?,
        Commands::Moves(args) => open(scenario)?.moves(args)?,
        Commands::Path(args) => open(scenario)?.path(args)?,
        Commands::Influence(args) => open(scenario)?.influence(args)?,
        Commands::Locate(args) => open(scenario)?.locate(args)?,
        Commands::Generate(args) => commands::run_generate(args, cli.seed)?,
    };
    print!("{}", report);
    Ok(())
}

/// Load the scenario file, or the demo board if none was given
fn open(path: Option<&Path>) -> Result<Session> {
    let scenario = match path {
        Some(path) => Scenario::load(path)?,
        None => Scenario::demo(),
    };
    tracing::info!("Scenario: {}", scenario.name);
    Session::new(scenario)
}
