//! Train command - Run a pursuit experiment and save the trained hunters

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{AgentKind, App, ExperimentConfig, ScenarioPreset},
    cli::output::{print_curve_tail, print_kv, print_section},
    export::write_learning_curves,
    experiment::ExperimentRecord,
    pipeline::{JsonlObserver, MetricsObserver, Observer, ProgressObserver},
    pursuit::{CapturePolicy, GridSize, HunterReward},
    q_learning::RenormalizationPolicy,
};

#[derive(Parser, Debug)]
#[command(about = "Train a pair of hunters", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// JSON experiment configuration; flags below override its fields
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Reward layout (cooperative, unequal-rewards, heterogeneous)
    #[arg(long, short = 'p')]
    pub preset: Option<ScenarioPreset>,

    /// Learner driving the hunters (independent, proposed, random, self-model, centralized)
    #[arg(long, short = 'a')]
    pub agent: Option<AgentKind>,

    /// Label of the learning curve
    #[arg(long)]
    pub name: Option<String>,

    /// Grid width
    #[arg(long)]
    pub width: Option<i32>,

    /// Grid height
    #[arg(long)]
    pub height: Option<i32>,

    /// Capture policy (homogeneous, heterogeneous)
    #[arg(long)]
    pub capture: Option<CapturePolicy>,

    /// Reward and penalty of hunter 1, as `reward,penalty`
    #[arg(long, value_parser = parse_reward)]
    pub reward_1: Option<HunterReward>,

    /// Reward and penalty of hunter 2, as `reward,penalty`
    #[arg(long, value_parser = parse_reward)]
    pub reward_2: Option<HunterReward>,

    /// Learning rate
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Initial Boltzmann temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Initial opponent-model learning rate base
    #[arg(long)]
    pub theta: Option<f64>,

    /// Initial value of unvisited Q-table entries
    #[arg(long)]
    pub initial_q: Option<f64>,

    /// Renormalize opponent-model estimates after every update
    #[arg(long)]
    pub renormalize: bool,

    /// Learning episodes between evaluations
    #[arg(long)]
    pub batch: Option<u64>,

    /// Frozen episodes per evaluation
    #[arg(long)]
    pub eval_episodes: Option<usize>,

    /// Learning episodes over the whole run
    #[arg(long, short = 'e')]
    pub episodes: Option<u64>,

    /// Step cap after which an episode is abandoned
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the experiment record (MessagePack)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional CSV file for the learning curve
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Optional JSONL file with one line per evaluation checkpoint
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

fn parse_reward(value: &str) -> std::result::Result<HunterReward, String> {
    let (reward, penalty) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `reward,penalty`, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{part}': {e}"))
    };
    Ok(HunterReward::new(parse(reward)?, parse(penalty)?))
}

impl TrainArgs {
    /// Merge the configuration file, preset and flags into one configuration.
    pub fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config = match (&self.config, self.preset) {
            (Some(path), _) => ExperimentConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            (None, Some(preset)) => ExperimentConfig::from_preset(preset),
            (None, None) => ExperimentConfig::default(),
        };
        if let (Some(_), Some(preset)) = (&self.config, self.preset) {
            let rules = preset.game_config();
            config.game.capture = rules.capture;
            config.game.rewards = rules.rewards;
        }

        if let Some(name) = &self.name {
            config.name = Some(name.clone());
        }
        if let Some(kind) = self.agent {
            config.agent_kind = kind;
        }
        if self.width.is_some() || self.height.is_some() {
            config.game.grid = GridSize::new(
                self.width.unwrap_or(config.game.grid.width()),
                self.height.unwrap_or(config.game.grid.height()),
            )?;
        }
        if let Some(capture) = self.capture {
            config.game.capture = capture;
        }
        if let Some(reward) = self.reward_1 {
            config.game.rewards[0] = reward;
        }
        if let Some(reward) = self.reward_2 {
            config.game.rewards[1] = reward;
        }

        let learning = &mut config.learning;
        learning.alpha = self.alpha.unwrap_or(learning.alpha);
        learning.gamma = self.gamma.unwrap_or(learning.gamma);
        learning.initial_temperature = self.temperature.unwrap_or(learning.initial_temperature);
        learning.theta = self.theta.unwrap_or(learning.theta);
        learning.initial_q = self.initial_q.unwrap_or(learning.initial_q);
        if self.renormalize {
            config.renormalization = RenormalizationPolicy::Renormalize;
        }

        let simulation = &mut config.simulation;
        simulation.train_episodes_batch = self.batch.unwrap_or(simulation.train_episodes_batch);
        simulation.eval_episodes = self.eval_episodes.unwrap_or(simulation.eval_episodes);
        simulation.total_train_episodes = self.episodes.unwrap_or(simulation.total_train_episodes);
        simulation.max_steps_per_episode =
            self.max_steps.unwrap_or(simulation.max_steps_per_episode);

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate().context("invalid experiment configuration")?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.experiment_config()?;

    print_section(&format!("Training: {}", config.label()));
    print_kv("Agent", &config.agent_kind.description());
    print_kv("Grid", &config.game.grid.to_string());
    print_kv("Capture", &config.game.capture.to_string());
    print_kv(
        "Episodes",
        &format!(
            "{} (batch {}, {} evaluation episodes)",
            config.simulation.total_train_episodes,
            config.simulation.train_episodes_batch,
            config.simulation.eval_episodes
        ),
    );
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut observers: Vec<Box<dyn Observer>> = Vec::new();
    if args.progress {
        observers.push(Box::new(ProgressObserver::new(
            config.simulation.train_episodes_batch,
        )));
    }
    if let Some(path) = &args.observations {
        observers.push(Box::new(JsonlObserver::new(path).with_context(|| {
            format!("failed to create observation file {}", path.display())
        })?));
    }
    observers.push(Box::new(MetricsObserver::new()));

    let app = App::new();
    let record = app
        .run_experiment(&config, observers)
        .context("training failed")?;

    print_summary(&record);

    if let Some(path) = &args.output {
        app.save_record(&record, path)
            .with_context(|| format!("failed to save record to {}", path.display()))?;
        println!("\nSaved experiment record to {}", path.display());
    }
    if let Some(path) = &args.csv {
        write_learning_curves(path, std::slice::from_ref(&record.series))
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote learning curve to {}", path.display());
    }

    Ok(())
}

fn print_summary(record: &ExperimentRecord) {
    print_section("Results");
    print_kv("Checkpoints", &record.series.len().to_string());
    print_kv(
        "Best mean length",
        &record
            .series
            .best_mean_length()
            .map_or_else(|| "-".to_string(), |mean| format!("{mean:.2}")),
    );
    print_kv(
        "Uncaptured",
        &record.series.total_uncaptured().to_string(),
    );
    for (table, size) in record.team.table_sizes() {
        print_kv(&table, &format!("{size} entries"));
    }
    print_curve_tail(&record.series, 5);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> TrainArgs {
        let mut argv = vec!["train"];
        argv.extend_from_slice(extra);
        TrainArgs::parse_from(argv)
    }

    #[test]
    fn test_flags_override_preset() {
        let config = args(&[
            "--preset",
            "unequal-rewards",
            "--agent",
            "centralized",
            "--alpha",
            "0.5",
            "--episodes",
            "100",
            "--seed",
            "7",
        ])
        .experiment_config()
        .unwrap();

        assert_eq!(config.agent_kind, AgentKind::Centralized);
        assert_eq!(config.game.rewards[1], HunterReward::new(0.5, 0.0));
        assert_eq!(config.learning.alpha, 0.5);
        assert_eq!(config.simulation.total_train_episodes, 100);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_reward_flag_accepts_negative_penalty() {
        let config = args(&["--reward-1", "1,-0.01"]).experiment_config().unwrap();
        assert_eq!(config.game.rewards[0], HunterReward::new(1.0, -0.01));
        assert!(parse_reward("1").is_err());
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        assert!(args(&["--gamma", "1.5"]).experiment_config().is_err());
        assert!(args(&["--width", "0"]).experiment_config().is_err());
    }
}
