//! Common helpers for the pursuit integration tests.
#![allow(dead_code)]

use pursuit::app::{AgentKind, ExperimentConfig, SimulationConfig};

/// Small schedule that keeps runs fast: 3 batches of 4 episodes.
pub fn quick_simulation() -> SimulationConfig {
    SimulationConfig {
        train_episodes_batch: 4,
        eval_episodes: 3,
        total_train_episodes: 12,
        max_steps_per_episode: 10_000,
    }
}

/// Seeded experiment of `kind` on the default cooperative game.
pub fn quick_config(kind: AgentKind, seed: u64) -> ExperimentConfig {
    ExperimentConfig::new(kind)
        .with_simulation(quick_simulation())
        .with_seed(seed)
}
