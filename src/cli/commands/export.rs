//! Export command - Combine the learning curves of saved experiments
//!
//! Each record contributes one labeled series, so curves of different agent
//! kinds can be plotted against each other.

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use crate::{analysis::LearningCurve, app::App, export::write_learning_curves};

#[derive(Parser, Debug)]
#[command(about = "Export learning curves of saved experiments")]
pub struct ExportArgs {
    /// Experiment records to export
    #[arg(required = true)]
    pub records: Vec<PathBuf>,

    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Export format
    #[arg(long, short = 'f', value_enum, default_value = "csv")]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One row per (label, episode)
    Csv,
    /// Array of labeled curves
    Json,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let curves = load_curves(&args.records)?;

    match args.format {
        ExportFormat::Csv => write_learning_curves(&args.output, &curves)
            .with_context(|| format!("failed to write {}", args.output.display()))?,
        ExportFormat::Json => {
            let file = File::create(&args.output)
                .with_context(|| format!("failed to create {}", args.output.display()))?;
            serde_json::to_writer_pretty(file, &curves).context("failed to write JSON")?;
        }
    }

    println!(
        "Exported {} curve(s) to {}",
        curves.len(),
        args.output.display()
    );
    Ok(())
}

fn load_curves(paths: &[PathBuf]) -> Result<Vec<LearningCurve>> {
    if paths.is_empty() {
        bail!("no experiment records given");
    }
    let app = App::new();
    paths
        .iter()
        .map(|path| {
            app.load_record(path)
                .map(|record| record.series)
                .with_context(|| format!("failed to load {}", path.display()))
        })
        .collect()
}
