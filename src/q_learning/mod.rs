//! Tabular Q-learning for the pursuit hunters
//!
//! This module implements the learners that drive the hunters. All of them
//! share the same temporal difference backup
//!
//! `Q(s,a) ← (1-α)·Q(s,a) + α·(r + γ·maxEV(s'))`
//!
//! and Boltzmann action selection, and differ in how they treat the partner.
//!
//! ## Learners
//!
//! | Learner | Table key | Selection value | Bootstrap value |
//! |---------|-----------|-----------------|-----------------|
//! | Independent | `(s, a)` | `Q(s,a)` | `Q(s',a)` |
//! | Proposed estimation | `(s, a, b)` | `Σ_b P(b)·Q(s,a,b)` | best `Q(s',a,b)` over modes of `P` |
//! | Random estimation | `(s, a, b)` | `Σ_b Q(s,a,b) / 5` | `Q(s',a,b)` for a random `b` |
//! | Self-model estimation | `(s, a, b)` | as proposed, `P` learned from own actions | as proposed |
//! | Centralized | `(s, (a₁, a₂))` | `Q(s,a₁,a₂)` | `max Q(s',·,·)` |
//!
//! ## Usage Example
//!
//! ```
//! use pursuit::pursuit::{Action, RelativeLocation, State};
//! use pursuit::q_learning::{EstimationKind, HunterAgent, LearningParams};
//!
//! let start = State::new(RelativeLocation::new(2, 1), RelativeLocation::new(-1, 0));
//! let mut hunter = HunterAgent::new(EstimationKind::Proposed, &LearningParams::default(), start)?
//!     .with_seed(42);
//!
//! let action = hunter.choose_action()?;
//! let next = State::new(start.own.shifted(action), start.other);
//! hunter.update(next, action, 0.0, Action::Stay, 0)?;
//! # Ok::<(), pursuit::Error>(())
//! ```

pub mod agent;
pub mod centralized;
pub mod internal_model;
pub mod params;
pub mod q_table;
pub mod schedule;

// Public re-exports
pub use agent::{AgentSnapshot, EstimationKind, HunterAgent};
pub use centralized::{CentralizedController, CentralizedHunter, ControllerSnapshot};
pub use internal_model::{InternalModel, RenormalizationPolicy};
pub use params::LearningParams;
pub use q_table::{AgentKey, JointKey, QTable};
pub use schedule::ThetaSchedule;
