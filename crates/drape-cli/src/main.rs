//! Drape CLI — run, validate, and inspect mass-spring cloth simulations.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "drape")]
#[command(version, about = "Drape — mass-spring cloth simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a hanging sheet built from a procedural quad grid.
    Simulate(commands::SimulateArgs),

    /// Validate a config (.toml) or mesh (.json) file.
    Validate {
        /// Path to config or mesh file.
        path: String,
    },

    /// Inspect a state snapshot file.
    Inspect {
        /// Path to snapshot file.
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate(args) => commands::simulate(&args),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Inspect { path } => commands::inspect(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
