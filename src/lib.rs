//! Multi-agent pursuit with Q-learning hunters
//!
//! Two hunters chase a randomly moving prey on a wrap-around grid. This crate
//! provides:
//! - The pursuit environment with homogeneous and heterogeneous capture rules
//! - Q-learning hunters that keep an internal model of their partner's actions
//! - A centralized controller learning over joint actions
//! - A training loop producing learning curves of episode lengths
//! - Persistence, CSV export and a command line interface
//!
//! # Example
//!
//! ```
//! use pursuit::app::{AgentKind, App, ExperimentConfig, SimulationConfig};
//!
//! let config = ExperimentConfig::new(AgentKind::Proposed)
//!     .with_simulation(SimulationConfig {
//!         train_episodes_batch: 5,
//!         eval_episodes: 3,
//!         total_train_episodes: 10,
//!         max_steps_per_episode: 10_000,
//!     })
//!     .with_seed(1);
//! let record = App::new().run_experiment(&config, Vec::new())?;
//! assert_eq!(record.series.len(), 2);
//! # Ok::<(), pursuit::Error>(())
//! ```

pub mod adapters;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod error;
pub mod experiment;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod pursuit;
pub mod q_learning;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use experiment::{ExperimentRecord, TeamSnapshot};
pub use pursuit::{Action, Game, GameConfig, State};
pub use q_learning::{CentralizedController, EstimationKind, HunterAgent};
pub use types::{HunterId, Temperature};
