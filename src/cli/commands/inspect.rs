//! Inspect command - Print metadata of a saved experiment

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::output::{print_curve_tail, print_kv, print_section, print_subsection},
};

#[derive(Parser, Debug)]
#[command(about = "Show configuration and table sizes of an experiment record")]
pub struct InspectArgs {
    /// Path to the experiment record
    pub record: PathBuf,

    /// Checkpoints to list from the end of the curve
    #[arg(long, default_value_t = 10)]
    pub tail: usize,

    /// Print the full configuration as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let record = App::new()
        .load_record(&args.record)
        .with_context(|| format!("failed to load {}", args.record.display()))?;
    let config = &record.config;

    print_section(&format!("Experiment: {}", record.label()));
    print_kv("Format version", &record.version.to_string());
    if let Some(saved_at) = &record.saved_at {
        print_kv("Saved at (unix)", saved_at);
    }
    print_kv("Agent", &config.agent_kind.description());
    print_kv("Grid", &config.game.grid.to_string());
    print_kv("Capture", &config.game.capture.to_string());
    for (idx, reward) in config.game.rewards.iter().enumerate() {
        print_kv(
            &format!("Hunter {} reward", idx + 1),
            &format!("{} / penalty {}", reward.reward, reward.penalty),
        );
    }
    print_kv(
        "alpha / gamma",
        &format!("{} / {}", config.learning.alpha, config.learning.gamma),
    );
    print_kv(
        "tau0 / theta0",
        &format!(
            "{} / {}",
            config.learning.initial_temperature, config.learning.theta
        ),
    );
    print_kv("Trained episodes", &record.total_train_episodes.to_string());
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    print_subsection("Tables");
    for (table, size) in record.team.table_sizes() {
        print_kv(&table, &format!("{size} entries"));
    }

    print_curve_tail(&record.series, args.tail);

    if args.json {
        println!(
            "\n{}",
            serde_json::to_string_pretty(config).context("failed to format configuration")?
        );
    }
    Ok(())
}
