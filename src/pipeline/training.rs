//! Training loop alternating learning batches and frozen evaluations

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    analysis::{LearningCurve, SeriesPoint},
    app::SimulationConfig,
    ports::{HunterTeam, Observer},
    pursuit::Game,
};

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeOutcome {
    /// The prey was captured
    Captured,
    /// The step cap was reached before capture
    Abandoned,
}

/// Length and outcome of one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeReport {
    pub steps: usize,
    pub outcome: EpisodeOutcome,
}

impl EpisodeReport {
    pub fn is_captured(&self) -> bool {
        self.outcome == EpisodeOutcome::Captured
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Label of the learning curve
    pub label: String,

    /// Learning episodes played over the whole run
    pub total_train_episodes: u64,

    /// One point per evaluated batch
    pub curve: LearningCurve,

    /// Learning episodes that hit the step cap
    pub abandoned_learning_episodes: u64,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives a hunter team through learning and evaluation episodes.
///
/// Each batch plays `train_episodes_batch` learning episodes and then
/// `eval_episodes` frozen episodes, whose lengths become one [`SeriesPoint`].
pub struct TrainingLoop {
    config: SimulationConfig,
    label: String,
    observers: Vec<Box<dyn Observer>>,
    episodes_trained: u64,
}

impl TrainingLoop {
    /// Create a new training loop
    pub fn new(config: SimulationConfig, label: impl Into<String>) -> Self {
        Self {
            config,
            label: label.into(),
            observers: Vec::new(),
            episodes_trained: 0,
        }
    }

    /// Add an observer to the loop
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Continue the episode count of a previous run.
    pub fn starting_at(mut self, episodes_trained: u64) -> Self {
        self.episodes_trained = episodes_trained;
        self
    }

    pub fn episodes_trained(&self) -> u64 {
        self.episodes_trained
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the full schedule and collect the learning curve.
    pub fn run(&mut self, game: &mut Game, team: &mut dyn HunterTeam) -> Result<TrainingResult> {
        self.config.validate()?;

        let batches = self.config.checkpoints();
        let total = batches * self.config.train_episodes_batch;
        info!(
            label = %self.label,
            team = %team.name(),
            batches,
            total_train_episodes = total,
            "starting training"
        );

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let mut curve = LearningCurve::new(self.label.clone());
        let mut abandoned_learning_episodes = 0;
        for _ in 0..batches {
            for _ in 0..self.config.train_episodes_batch {
                let report = self.learning_episode(game, team)?;
                if !report.is_captured() {
                    abandoned_learning_episodes += 1;
                }
            }

            let point = self.evaluate(game, team, self.config.eval_episodes)?;
            debug!(
                episode = point.episode,
                mean_length = ?point.mean_length(),
                uncaptured = point.uncaptured,
                "batch evaluated"
            );
            for observer in &mut self.observers {
                observer.on_batch_end(&point)?;
            }
            curve.push(point);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        info!(
            label = %self.label,
            best_mean_length = ?curve.best_mean_length(),
            abandoned_learning_episodes,
            "training finished"
        );

        Ok(TrainingResult {
            label: self.label.clone(),
            total_train_episodes: total,
            curve,
            abandoned_learning_episodes,
        })
    }

    /// Play `episodes` frozen episodes and summarize their lengths.
    pub fn evaluate(
        &mut self,
        game: &mut Game,
        team: &mut dyn HunterTeam,
        episodes: usize,
    ) -> Result<SeriesPoint> {
        if episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "evaluation needs at least one episode".to_string(),
            });
        }

        let mut lengths = Vec::with_capacity(episodes);
        let mut uncaptured = 0;
        for _ in 0..episodes {
            let report = self.evaluation_episode(game, team)?;
            for observer in &mut self.observers {
                observer.on_evaluation_episode(report.steps, report.outcome)?;
            }
            match report.outcome {
                EpisodeOutcome::Captured => lengths.push(report.steps),
                EpisodeOutcome::Abandoned => uncaptured += 1,
            }
        }

        Ok(SeriesPoint::new(self.episodes_trained, &lengths, uncaptured))
    }

    /// One episode in which both hunters learn after every step.
    pub fn learning_episode(
        &mut self,
        game: &mut Game,
        team: &mut dyn HunterTeam,
    ) -> Result<EpisodeReport> {
        let episode = self.episodes_trained;
        let report = self.play(game, team, Some(episode))?;
        self.episodes_trained += 1;
        Ok(report)
    }

    /// One episode with frozen tables; hunters only follow the game state.
    pub fn evaluation_episode(
        &mut self,
        game: &mut Game,
        team: &mut dyn HunterTeam,
    ) -> Result<EpisodeReport> {
        self.play(game, team, None)
    }

    fn play(
        &self,
        game: &mut Game,
        team: &mut dyn HunterTeam,
        learning_episode: Option<u64>,
    ) -> Result<EpisodeReport> {
        game.reset();
        team.set_states(game.states());

        let cap = self.config.max_steps_per_episode;
        for step in 1..=cap {
            let actions = team.choose_actions()?;
            let outcome = game.step(actions.0, actions.1);
            match learning_episode {
                Some(episode) => team.update(game.states(), actions, &outcome, episode)?,
                None => team.set_states(game.states()),
            }
            if outcome.is_terminal() {
                return Ok(EpisodeReport {
                    steps: step,
                    outcome: EpisodeOutcome::Captured,
                });
            }
        }

        warn!(
            team = %team.name(),
            learning = learning_episode.is_some(),
            max_steps = cap,
            "episode abandoned without capture"
        );
        Ok(EpisodeReport {
            steps: cap,
            outcome: EpisodeOutcome::Abandoned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::IndependentPair,
        pursuit::GameConfig,
        q_learning::{EstimationKind, HunterAgent, LearningParams},
    };

    fn setup(seed: u64) -> (Game, IndependentPair) {
        let game = Game::seeded(GameConfig::default(), seed).unwrap();
        let [s1, s2] = game.states();
        let params = LearningParams::default();
        let team = IndependentPair::new([
            HunterAgent::new(EstimationKind::Proposed, &params, s1)
                .unwrap()
                .with_seed(seed + 1),
            HunterAgent::new(EstimationKind::Proposed, &params, s2)
                .unwrap()
                .with_seed(seed + 2),
        ]);
        (game, team)
    }

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            train_episodes_batch: 3,
            eval_episodes: 2,
            total_train_episodes: 10,
            max_steps_per_episode: 10_000,
        }
    }

    #[test]
    fn test_curve_has_one_point_per_batch() {
        let (mut game, mut team) = setup(7);
        let mut training = TrainingLoop::new(small_config(), "test");

        let result = training.run(&mut game, &mut team).unwrap();

        assert_eq!(result.curve.len(), 3);
        assert_eq!(result.total_train_episodes, 9);
        let episodes: Vec<u64> = result.curve.points.iter().map(|p| p.episode).collect();
        assert_eq!(episodes, vec![3, 6, 9]);
        assert!(result.curve.points.iter().all(|p| p.evaluated == 2));
        assert_eq!(training.episodes_trained(), 9);
    }

    #[test]
    fn test_step_cap_abandons_episode() {
        let (mut game, mut team) = setup(3);
        let config = SimulationConfig {
            max_steps_per_episode: 1,
            ..small_config()
        };
        let mut training = TrainingLoop::new(config, "capped");

        let point = training.evaluate(&mut game, &mut team, 20).unwrap();

        assert_eq!(point.evaluated, 20);
        let captured = point.stats.map_or(0, |stats| stats.count);
        assert_eq!(captured + point.uncaptured, 20);
        if let Some(stats) = point.stats {
            assert_eq!(stats.max, 1.0);
        }
    }

    #[test]
    fn test_evaluation_does_not_count_as_training() {
        let (mut game, mut team) = setup(11);
        let mut training = TrainingLoop::new(small_config(), "eval").starting_at(40);

        training.evaluation_episode(&mut game, &mut team).unwrap();
        assert_eq!(training.episodes_trained(), 40);
        assert_eq!(team.hunter(crate::types::HunterId::First).episode(), 0);

        training.learning_episode(&mut game, &mut team).unwrap();
        assert_eq!(training.episodes_trained(), 41);
        assert_eq!(team.hunter(crate::types::HunterId::First).episode(), 40);
    }

    #[test]
    fn test_zero_evaluation_episodes_rejected() {
        let (mut game, mut team) = setup(1);
        let mut training = TrainingLoop::new(small_config(), "empty");
        assert!(matches!(
            training.evaluate(&mut game, &mut team, 0),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_result_json_roundtrip() {
        let (mut game, mut team) = setup(5);
        let mut training = TrainingLoop::new(small_config(), "saved");
        let result = training.run(&mut game, &mut team).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        result.save(&path).unwrap();
        let loaded = TrainingResult::load(&path).unwrap();

        assert_eq!(loaded.label, result.label);
        assert_eq!(loaded.curve.len(), result.curve.len());
        assert_eq!(loaded.total_train_episodes, result.total_train_episodes);
    }
}
