//! gridmind CLI - Search, game-tree, MDP and Q-learning agents on grid worlds
//!
//! This CLI provides a unified interface for:
//! - Finding paths through maze layouts
//! - Solving gridworld MDPs with value iteration
//! - Training Q-learning agents
//! - Choosing moves in a pursuit game with tree search

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gridmind::cli::{commands, config::load_config};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "gridmind")]
#[command(version, about = "Search and learning agents for grid worlds", long_about = None)]
struct Cli {
    /// TOML config whose values act as defaults for the flags
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a path through a maze layout
    Search(commands::search::SearchArgs),

    /// Solve a gridworld with value iteration
    Solve(commands::solve::SolveArgs),

    /// Train a Q-learning agent on a gridworld
    Learn(Box<commands::learn::LearnArgs>),

    /// Choose moves in a pursuit game with tree search
    Play(commands::play::PlayArgs),
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridmind=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Search(args) => commands::search::execute(args, &config),
        Commands::Solve(args) => commands::solve::execute(args, &config),
        Commands::Learn(args) => commands::learn::execute(*args, &config),
        Commands::Play(args) => commands::play::execute(args, &config),
    }
}
