//! tdttt CLI - train Tic-Tac-Toe agents with temporal-difference learning
//!
//! Set `RUST_LOG=debug` (or `trace`) for per-episode logging.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tdttt")]
#[command(version, about = "Self-play TD learning for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent by self-play or as a duel, evaluating after each round
    Train(Box<tdttt::cli::commands::train::TrainArgs>),

    /// Play against an agent in the terminal
    Play(tdttt::cli::commands::play::PlayArgs),

    /// Show what a saved agent has learned
    Inspect(tdttt::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tdttt::cli::commands::train::execute(*args),
        Commands::Play(args) => tdttt::cli::commands::play::execute(args),
        Commands::Inspect(args) => tdttt::cli::commands::inspect::execute(args),
    }
}
