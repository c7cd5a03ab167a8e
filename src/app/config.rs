//! Configuration types for experiment creation.

use std::{fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pursuit::{CapturePolicy, GameConfig, GridSize, HunterReward},
    q_learning::{EstimationKind, LearningParams, RenormalizationPolicy},
};

/// Which learner controls the hunters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Independent,
    #[default]
    Proposed,
    Random,
    SelfModel,
    Centralized,
}

impl AgentKind {
    pub const VARIANTS: &'static str = "independent, proposed, random, self-model, centralized";

    pub const ALL: [AgentKind; 5] = [
        AgentKind::Independent,
        AgentKind::Proposed,
        AgentKind::Random,
        AgentKind::SelfModel,
        AgentKind::Centralized,
    ];

    /// Estimation strategy of each hunter; `None` for the centralized controller.
    pub fn estimation(self) -> Option<EstimationKind> {
        match self {
            AgentKind::Independent => Some(EstimationKind::Independent),
            AgentKind::Proposed => Some(EstimationKind::Proposed),
            AgentKind::Random => Some(EstimationKind::Random),
            AgentKind::SelfModel => Some(EstimationKind::SelfModel),
            AgentKind::Centralized => None,
        }
    }

    /// Human readable name used to label learning curves.
    pub fn description(self) -> String {
        match self.estimation() {
            Some(kind) => kind.to_string(),
            None => "Centralized Q-learning".to_string(),
        }
    }
}

impl FromStr for AgentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" | "q-learning" | "qlearning" => Ok(AgentKind::Independent),
            "proposed" | "qwpae" => Ok(AgentKind::Proposed),
            "random" | "qwrae" => Ok(AgentKind::Random),
            "self-model" | "self_model" | "selfmodel" | "qwsae" => Ok(AgentKind::SelfModel),
            "centralized" | "central" => Ok(AgentKind::Centralized),
            other => Err(Error::ParseAgentKind {
                input: other.to_string(),
                expected: Self::VARIANTS.to_string(),
            }),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentKind::Independent => "independent",
            AgentKind::Proposed => "proposed",
            AgentKind::Random => "random",
            AgentKind::SelfModel => "self-model",
            AgentKind::Centralized => "centralized",
        };
        f.write_str(name)
    }
}

/// Reward layouts used in the published experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioPreset {
    /// Homogeneous capture, reward 1 and penalty 0 for both hunters.
    Cooperative,
    /// Homogeneous capture; hunter 1 earns 1 / -0.01, hunter 2 earns 0.5 / 0.
    UnequalRewards,
    /// Heterogeneous capture, reward 1 and penalty 0 for both hunters.
    Heterogeneous,
}

impl ScenarioPreset {
    pub const VARIANTS: &'static str = "cooperative, unequal-rewards, heterogeneous";

    pub fn game_config(self) -> GameConfig {
        let grid = GridSize::default();
        match self {
            ScenarioPreset::Cooperative => GameConfig::new(grid, CapturePolicy::Homogeneous),
            ScenarioPreset::UnequalRewards => GameConfig::new(grid, CapturePolicy::Homogeneous)
                .with_rewards(HunterReward::new(1.0, -0.01), HunterReward::new(0.5, 0.0)),
            ScenarioPreset::Heterogeneous => GameConfig::new(grid, CapturePolicy::Heterogeneous),
        }
    }
}

impl FromStr for ScenarioPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cooperative" | "homogeneous" => Ok(ScenarioPreset::Cooperative),
            "unequal-rewards" | "unequal" => Ok(ScenarioPreset::UnequalRewards),
            "heterogeneous" => Ok(ScenarioPreset::Heterogeneous),
            other => Err(Error::ParsePreset {
                input: other.to_string(),
                expected: Self::VARIANTS.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScenarioPreset::Cooperative => "cooperative",
            ScenarioPreset::UnequalRewards => "unequal-rewards",
            ScenarioPreset::Heterogeneous => "heterogeneous",
        };
        f.write_str(name)
    }
}

/// Episode budget of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Learning episodes between two evaluations
    pub train_episodes_batch: u64,
    /// Frozen episodes per evaluation
    pub eval_episodes: usize,
    /// Learning episodes over the whole run
    pub total_train_episodes: u64,
    /// Steps after which an episode is abandoned
    pub max_steps_per_episode: usize,
}

impl SimulationConfig {
    /// Number of evaluation checkpoints a run produces.
    pub fn checkpoints(&self) -> u64 {
        self.total_train_episodes / self.train_episodes_batch.max(1)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.train_episodes_batch == 0, "train_episodes_batch must be at least 1"),
            (self.eval_episodes == 0, "eval_episodes must be at least 1"),
            (
                self.max_steps_per_episode == 0,
                "max_steps_per_episode must be at least 1",
            ),
            (
                self.total_train_episodes < self.train_episodes_batch,
                "total_train_episodes must cover at least one batch",
            ),
        ];
        for (failed, message) in checks {
            if failed {
                return Err(Error::InvalidConfiguration {
                    message: message.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            train_episodes_batch: 10,
            eval_episodes: 100,
            total_train_episodes: 2000,
            max_steps_per_episode: 10_000,
        }
    }
}

/// Complete description of one experiment.
///
/// This type provides a builder-style API and can be loaded from JSON.
///
/// # Examples
///
/// ```
/// use pursuit::app::{AgentKind, ExperimentConfig, ScenarioPreset};
///
/// let config = ExperimentConfig::from_preset(ScenarioPreset::UnequalRewards)
///     .with_agent_kind(AgentKind::Centralized)
///     .with_total_train_episodes(200)
///     .with_seed(42);
/// config.validate()?;
/// # Ok::<(), pursuit::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Label of the resulting learning curve (defaults to the agent description)
    pub name: Option<String>,
    pub agent_kind: AgentKind,
    pub game: GameConfig,
    pub learning: LearningParams,
    pub renormalization: RenormalizationPolicy,
    pub simulation: SimulationConfig,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl ExperimentConfig {
    pub fn new(agent_kind: AgentKind) -> Self {
        Self {
            agent_kind,
            ..Self::default()
        }
    }

    pub fn from_preset(preset: ScenarioPreset) -> Self {
        Self {
            game: preset.game_config(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file; missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.agent_kind.description())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_agent_kind(mut self, kind: AgentKind) -> Self {
        self.agent_kind = kind;
        self
    }

    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    pub fn with_learning(mut self, learning: LearningParams) -> Self {
        self.learning = learning;
        self
    }

    pub fn with_renormalization(mut self, policy: RenormalizationPolicy) -> Self {
        self.renormalization = policy;
        self
    }

    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn with_total_train_episodes(mut self, total: u64) -> Self {
        self.simulation.total_train_episodes = total;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every section of the configuration.
    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.learning.validate()?;
        self.simulation.validate()
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: None,
            agent_kind: AgentKind::default(),
            game: ScenarioPreset::Cooperative.game_config(),
            learning: LearningParams::default(),
            renormalization: RenormalizationPolicy::default(),
            simulation: SimulationConfig::default(),
            seed: None,
        }
    }
}
