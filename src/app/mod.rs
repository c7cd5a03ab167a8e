//! Application layer with dependency injection container.
//!
//! This module provides experiment configuration and the container that wires
//! games, hunter teams, the training loop and persistence together.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  App (DI Container)                  │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ owns                       │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Infrastructure (adapters)           │   │
//! │  │  - MsgPackRepository                 │   │
//! │  │  - InMemoryRepository (testing)      │   │
//! │  │  - IndependentPair / CentralizedPair │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implements                 │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Ports (ports)                │   │
//! │  │  - ExperimentRepository, HunterTeam  │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ used by                    │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - Game, HunterAgent                 │   │
//! │  │  - CentralizedController             │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use pursuit::app::{AgentKind, App, ExperimentConfig, ScenarioPreset, SimulationConfig};
//!
//! let app = App::new();
//! let config = ExperimentConfig::from_preset(ScenarioPreset::Cooperative)
//!     .with_agent_kind(AgentKind::Independent)
//!     .with_simulation(SimulationConfig {
//!         train_episodes_batch: 5,
//!         eval_episodes: 2,
//!         total_train_episodes: 10,
//!         max_steps_per_episode: 10_000,
//!     })
//!     .with_seed(42);
//! let record = app.run_experiment(&config, Vec::new())?;
//! assert_eq!(record.series.len(), 2);
//! # Ok::<(), pursuit::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{AgentKind, ExperimentConfig, ScenarioPreset, SimulationConfig};
pub use container::{App, AppBuilder};
