//! Pursuit CLI - Train and analyse cooperating Q-learning hunters
//!
//! This CLI provides a unified interface for:
//! - Training hunter pairs under the different learning schemes
//! - Evaluating saved experiments with frozen tables
//! - Inspecting saved experiments
//! - Exporting learning curves for plotting

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pursuit")]
#[command(version, about = "Multi-agent pursuit with opponent-modelling Q-learners", long_about = None)]
struct Cli {
    /// Log per-batch progress
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a pair of hunters and record the learning curve
    Train(Box<pursuit::cli::commands::train::TrainArgs>),

    /// Evaluate a saved experiment without learning
    Evaluate(pursuit::cli::commands::evaluate::EvaluateArgs),

    /// Print configuration and table sizes of a saved experiment
    Inspect(pursuit::cli::commands::inspect::InspectArgs),

    /// Export learning curves of saved experiments
    Export(pursuit::cli::commands::export::ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Train(args) => pursuit::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => pursuit::cli::commands::evaluate::execute(args),
        Commands::Inspect(args) => pursuit::cli::commands::inspect::execute(args),
        Commands::Export(args) => pursuit::cli::commands::export::execute(args),
    }
}
