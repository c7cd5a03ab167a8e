//! Dependency injection container for pursuit experiments.
//!
//! The container owns infrastructure dependencies and provides factory methods
//! for creating games, hunter teams and complete experiment runs.

use std::{path::Path, sync::Arc};

use tracing::info;

use super::config::{AgentKind, ExperimentConfig};
use crate::{
    Result,
    adapters::{CentralizedPair, IndependentPair, MsgPackRepository},
    analysis::SeriesPoint,
    experiment::ExperimentRecord,
    pipeline::TrainingLoop,
    ports::{ExperimentRepository, HunterTeam, Observer},
    pursuit::Game,
    q_learning::{CentralizedController, HunterAgent},
    utils::build_rng,
};

/// Application with dependency injection.
///
/// Seeds are derived from one experiment seed: the game uses `seed`, the
/// hunters use `seed + 1` and `seed + 2`, a centralized controller `seed + 1`.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use pursuit::app::{AgentKind, App, ExperimentConfig};
///
/// let app = App::new();
/// let config = ExperimentConfig::new(AgentKind::Proposed).with_seed(42);
/// let game = app.create_game(&config)?;
/// let team = app.create_team(&config, &game)?;
/// assert_eq!(team.name(), "Q-learning with proposed action estimation");
/// # Ok::<(), pursuit::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use pursuit::app::App;
/// use pursuit::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for experiment persistence
    repository: Arc<dyn ExperimentRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for experiment persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the experiment repository.
    pub fn repository(&self) -> Arc<dyn ExperimentRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Seed used for `config`: its own seed, falling back to the app default.
    pub fn seed_for(&self, config: &ExperimentConfig) -> Option<u64> {
        config.seed.or(self.default_seed)
    }

    /// Create the environment described by `config`.
    pub fn create_game(&self, config: &ExperimentConfig) -> Result<Game> {
        Game::new(config.game, build_rng(self.seed_for(config)))
    }

    /// Create the hunter pair described by `config`, starting from `game`'s
    /// current positions.
    pub fn create_team(&self, config: &ExperimentConfig, game: &Game) -> Result<Box<dyn HunterTeam>> {
        config.learning.validate()?;
        let seed = self.seed_for(config);
        let offset_seed = |offset: u64| seed.map(|s| s.wrapping_add(offset));
        let [first_state, second_state] = game.states();

        let team: Box<dyn HunterTeam> = match config.agent_kind.estimation() {
            Some(kind) => {
                let build = |state, offset| -> Result<HunterAgent> {
                    let hunter = HunterAgent::new(kind, &config.learning, state)?
                        .with_renormalization(config.renormalization);
                    Ok(match offset_seed(offset) {
                        Some(seed) => hunter.with_seed(seed),
                        None => hunter,
                    })
                };
                Box::new(IndependentPair::new([
                    build(first_state, 1)?,
                    build(second_state, 2)?,
                ]))
            }
            None => {
                debug_assert_eq!(config.agent_kind, AgentKind::Centralized);
                let mut controller = CentralizedController::new(&config.learning, first_state)?;
                if let Some(seed) = offset_seed(1) {
                    controller = controller.with_seed(seed);
                }
                Box::new(CentralizedPair::new(controller))
            }
        };
        Ok(team)
    }

    /// Train a fresh team and package the outcome as a record.
    ///
    /// # Arguments
    ///
    /// * `config` - Experiment to run
    /// * `observers` - Observers notified by the training loop
    pub fn run_experiment(
        &self,
        config: &ExperimentConfig,
        observers: Vec<Box<dyn Observer>>,
    ) -> Result<ExperimentRecord> {
        config.validate()?;
        info!(
            label = %config.label(),
            agent = %config.agent_kind,
            seed = ?self.seed_for(config),
            "running experiment"
        );

        let mut game = self.create_game(config)?;
        let mut team = self.create_team(config, &game)?;

        let mut training = observers.into_iter().fold(
            TrainingLoop::new(config.simulation, config.label()),
            TrainingLoop::with_observer,
        );
        let result = training.run(&mut game, team.as_mut())?;

        let mut recorded = config.clone();
        recorded.seed = self.seed_for(config);
        Ok(ExperimentRecord::new(
            recorded,
            result.total_train_episodes,
            result.curve,
            team.snapshot(),
        ))
    }

    /// Run frozen evaluation episodes with the tables stored in `record`.
    pub fn evaluate_record(&self, record: &ExperimentRecord, episodes: usize) -> Result<SeriesPoint> {
        let mut game = self.create_game(&record.config)?;
        let mut team = record.team.clone().restore();
        let mut training = TrainingLoop::new(record.config.simulation, record.label())
            .starting_at(record.total_train_episodes);
        training.evaluate(&mut game, team.as_mut(), episodes)
    }

    /// Save a record through the configured repository.
    pub fn save_record(&self, record: &ExperimentRecord, path: &Path) -> Result<()> {
        self.repository.save(record, path)
    }

    /// Load a record through the configured repository.
    ///
    /// ```no_run
    /// use pursuit::app::App;
    /// use std::path::Path;
    ///
    /// let app = App::new();
    /// let record = app.load_record(Path::new("cooperative.msgpack"))?;
    /// println!("{}", record.label());
    /// # Ok::<(), pursuit::Error>(())
    /// ```
    pub fn load_record(&self, path: &Path) -> Result<ExperimentRecord> {
        self.repository.load(path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control randomness.
pub struct AppBuilder {
    repository: Option<Arc<dyn ExperimentRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Set a custom experiment repository.
    pub fn with_repository<R: ExperimentRepository + Send + Sync + 'static>(
        mut self,
        repo: R,
    ) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for configurations without one.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryRepository, app::SimulationConfig, experiment::TeamSnapshot};

    fn quick(kind: AgentKind) -> ExperimentConfig {
        ExperimentConfig::new(kind).with_simulation(SimulationConfig {
            train_episodes_batch: 2,
            eval_episodes: 2,
            total_train_episodes: 4,
            max_steps_per_episode: 5_000,
        })
    }

    #[test]
    fn test_create_team_for_every_kind() {
        let app = App::for_testing().with_default_seed(42).build();
        for kind in AgentKind::ALL {
            let config = ExperimentConfig::new(kind);
            let game = app.create_game(&config).unwrap();
            let team = app.create_team(&config, &game).unwrap();
            assert_eq!(team.name(), kind.description());
        }
    }

    #[test]
    fn test_config_seed_overrides_app_default() {
        let app = App::for_testing().with_default_seed(42).build();
        assert_eq!(app.seed_for(&ExperimentConfig::default()), Some(42));
        assert_eq!(
            app.seed_for(&ExperimentConfig::default().with_seed(123)),
            Some(123)
        );
    }

    #[test]
    fn test_run_experiment_records_seed_and_tables() {
        let app = App::for_testing()
            .with_repository(InMemoryRepository::new())
            .with_default_seed(9)
            .build();
        let record = app
            .run_experiment(&quick(AgentKind::Centralized), Vec::new())
            .unwrap();

        assert_eq!(record.config.seed, Some(9));
        assert_eq!(record.total_train_episodes, 4);
        assert_eq!(record.series.len(), 2);
        assert!(matches!(record.team, TeamSnapshot::Centralized(_)));

        let path = Path::new("centralized.msgpack");
        app.save_record(&record, path).unwrap();
        assert_eq!(app.load_record(path).unwrap(), record);
    }

    #[test]
    fn test_evaluate_record_uses_stored_tables() {
        let app = App::for_testing().with_default_seed(3).build();
        let record = app
            .run_experiment(&quick(AgentKind::Independent), Vec::new())
            .unwrap();

        let point = app.evaluate_record(&record, 3).unwrap();
        assert_eq!(point.episode, 4);
        assert_eq!(point.evaluated, 3);
    }
}
