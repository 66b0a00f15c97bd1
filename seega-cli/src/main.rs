//! SEEGA CLI - Command-line interface
//!
//! Commands:
//! - serve: Host a two-player session over HTTP
//! - selfplay: Play random games through an in-process session

mod selfplay;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seega")]
#[command(about = "Seega game server and tools")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a game session over HTTP
    Serve(server::ServerArgs),
    /// Play games between two random bots
    Selfplay(selfplay::SelfPlayArgs),
}

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Selfplay(args) => selfplay::run(args, cli.seed),
    }
}
