//! Evaluate command - Run frozen episodes with a saved experiment

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::output::{print_kv, print_point, print_section},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate trained hunters without learning")]
pub struct EvaluateArgs {
    /// Path to the experiment record
    pub record: PathBuf,

    /// Number of evaluation episodes
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Random seed (defaults to the seed stored in the record)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Step cap (defaults to the one stored in the record)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Export the statistics as JSON
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let app = App::new();
    let mut record = app
        .load_record(&args.record)
        .with_context(|| format!("failed to load {}", args.record.display()))?;

    if let Some(seed) = args.seed {
        record.config.seed = Some(seed);
    }
    if let Some(max_steps) = args.max_steps {
        record.config.simulation.max_steps_per_episode = max_steps;
    }

    print_section(&format!("Evaluating: {}", record.label()));
    print_kv("Agent", &record.config.agent_kind.description());
    print_kv("Trained episodes", &record.total_train_episodes.to_string());
    if let Some(saved_at) = &record.saved_at {
        print_kv("Saved at (unix)", saved_at);
    }

    let point = app
        .evaluate_record(&record, args.episodes)
        .context("evaluation failed")?;

    print_section("Results");
    print_point(&point);

    if let Some(path) = &args.export {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &point).context("failed to write JSON")?;
        println!("\nExported statistics to {}", path.display());
    }

    Ok(())
}
