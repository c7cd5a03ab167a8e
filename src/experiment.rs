//! Persisted record of a trained experiment

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    adapters::{CentralizedPair, IndependentPair},
    analysis::LearningCurve,
    app::ExperimentConfig,
    ports::HunterTeam,
    q_learning::{AgentSnapshot, CentralizedController, ControllerSnapshot, HunterAgent},
};

/// Learned state of the hunters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TeamSnapshot {
    Independent([AgentSnapshot; 2]),
    Centralized(ControllerSnapshot),
}

impl TeamSnapshot {
    /// Rebuild a team with identical tables.
    pub fn restore(self) -> Box<dyn HunterTeam> {
        match self {
            TeamSnapshot::Independent([first, second]) => Box::new(IndependentPair::new([
                HunterAgent::from_snapshot(first),
                HunterAgent::from_snapshot(second),
            ])),
            TeamSnapshot::Centralized(controller) => Box::new(CentralizedPair::new(
                CentralizedController::from_snapshot(controller),
            )),
        }
    }

    /// `(table name, entries)` for every table held by the team.
    pub fn table_sizes(&self) -> Vec<(String, usize)> {
        match self {
            TeamSnapshot::Independent(agents) => agents
                .iter()
                .enumerate()
                .flat_map(|(idx, agent)| {
                    let mut sizes = vec![(format!("hunter {} Q-table", idx + 1), agent.q_table().size())];
                    if let Some(model) = agent.internal_model() {
                        sizes.push((format!("hunter {} internal model", idx + 1), model.size()));
                    }
                    sizes
                })
                .collect(),
            TeamSnapshot::Centralized(controller) => {
                vec![("joint Q-table".to_string(), controller.q_table().size())]
            }
        }
    }
}

/// Everything needed to analyse or resume a trained experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub version: u32,
    pub config: ExperimentConfig,
    pub total_train_episodes: u64,
    pub series: LearningCurve,
    pub team: TeamSnapshot,
    /// Seconds since the Unix epoch when the record was created
    pub saved_at: Option<String>,
}

impl ExperimentRecord {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn new(
        config: ExperimentConfig,
        total_train_episodes: u64,
        series: LearningCurve,
        team: TeamSnapshot,
    ) -> Self {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs().to_string());
        Self {
            version: Self::VERSION,
            config,
            total_train_episodes,
            series,
            team,
            saved_at,
        }
    }

    pub fn label(&self) -> &str {
        &self.series.label
    }

    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for records written by another format version.
    pub fn check_version(&self) -> Result<()> {
        if self.version == Self::VERSION {
            Ok(())
        } else {
            Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            })
        }
    }
}
