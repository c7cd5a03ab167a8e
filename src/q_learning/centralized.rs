//! Centralized controller choosing joint actions for both hunters
//!
//! One controller owns a single Q-table over joint actions. Each tick runs in
//! two phases: [`CentralizedController::begin_tick`] draws a joint action from
//! the Boltzmann distribution, then [`CentralizedController::action_for`] hands
//! each hunter its component. [`CentralizedHunter`] wraps this so a centralized
//! pair can be driven exactly like two independent hunters.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    params::LearningParams,
    q_table::{JointKey, QTable},
    schedule::ThetaSchedule,
};
use crate::{
    Error, Result,
    pursuit::{Action, JointAction, State},
    types::{HunterId, Temperature},
    utils::{boltzmann_probabilities, build_rng, weighted_sample},
};

/// Serializable state of a [`CentralizedController`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    q_table: QTable<JointKey>,
    learning_rate: f64,
    discount_factor: f64,
    temperature: Temperature,
    schedule: ThetaSchedule,
    state: State,
    episode: u64,
    rng_seed: Option<u64>,
}

impl ControllerSnapshot {
    pub fn q_table(&self) -> &QTable<JointKey> {
        &self.q_table
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }
}

/// Joint-action Q-learner driving both hunters.
///
/// The controller's state is always the first hunter's view.
#[derive(Debug, Clone)]
pub struct CentralizedController {
    q_table: QTable<JointKey>,
    learning_rate: f64,
    discount_factor: f64,
    temperature: Temperature,
    schedule: ThetaSchedule,
    state: State,
    episode: u64,
    pending: Option<JointAction>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl CentralizedController {
    /// # Errors
    ///
    /// Returns an error if any hyperparameter is invalid.
    pub fn new(params: &LearningParams, initial_state: State) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            q_table: QTable::new(params.initial_q),
            learning_rate: params.alpha,
            discount_factor: params.gamma,
            temperature: params.temperature()?,
            schedule: params.schedule()?,
            state: initial_state,
            episode: 0,
            pending: None,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn q_table(&self) -> &QTable<JointKey> {
        &self.q_table
    }

    /// The joint action drawn for the current tick, if any.
    pub fn pending(&self) -> Option<JointAction> {
        self.pending
    }

    /// Move to `state` without learning; discards any pending joint action.
    pub fn set_state(&mut self, state: State) {
        self.state = state;
        self.pending = None;
    }

    /// Boltzmann distribution over the 25 joint actions, in [`JointAction::all`] order.
    pub fn joint_probabilities(&mut self) -> Result<Vec<f64>> {
        let state = self.state;
        let values: Vec<f64> = JointAction::all()
            .map(|joint| self.q_table.get(&(state, joint)))
            .collect();
        boltzmann_probabilities(&values, self.temperature, "joint action values")
    }

    /// Draw the joint action for this tick.
    pub fn begin_tick(&mut self) -> Result<JointAction> {
        let probabilities = self.joint_probabilities()?;
        let weighted: Vec<(JointAction, f64)> = JointAction::all().zip(probabilities).collect();
        let joint = weighted_sample(&mut self.rng, &weighted).ok_or_else(|| {
            Error::DegenerateDistribution {
                context: "joint action sampling".to_string(),
            }
        })?;
        self.pending = Some(joint);
        Ok(joint)
    }

    /// The given hunter's component of the pending joint action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TickNotStarted`] if no joint action has been drawn
    /// since the last update or state change.
    pub fn action_for(&self, hunter: HunterId) -> Result<Action> {
        let joint = self.pending.ok_or(Error::TickNotStarted {
            hunter: hunter.index(),
        })?;
        Ok(match hunter {
            HunterId::First => joint.first,
            HunterId::Second => joint.second,
        })
    }

    /// Best joint Q-value in `new_state`.
    pub fn max_ev_next(&mut self, new_state: State) -> f64 {
        JointAction::all()
            .map(|joint| self.q_table.get(&(new_state, joint)))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// One TD(0) backup on the joint action, then advance to `new_state`.
    pub fn update(
        &mut self,
        new_state: State,
        joint: JointAction,
        reward: f64,
        episode: u64,
    ) -> Result<()> {
        self.temperature = self.schedule.temperature(episode)?;
        self.episode = episode;

        let key = (self.state, joint);
        let current_q = self.q_table.get(&key);
        let target = reward + self.discount_factor * self.max_ev_next(new_state);
        let new_q = (1.0 - self.learning_rate) * current_q + self.learning_rate * target;
        self.q_table.set(key, new_q);

        self.set_state(new_state);
        Ok(())
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            q_table: self.q_table.clone(),
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
            temperature: self.temperature,
            schedule: self.schedule,
            state: self.state,
            episode: self.episode,
            rng_seed: self.rng_seed,
        }
    }

    pub fn from_snapshot(snapshot: ControllerSnapshot) -> Self {
        Self {
            q_table: snapshot.q_table,
            learning_rate: snapshot.learning_rate,
            discount_factor: snapshot.discount_factor,
            temperature: snapshot.temperature,
            schedule: snapshot.schedule,
            state: snapshot.state,
            episode: snapshot.episode,
            pending: None,
            rng: build_rng(snapshot.rng_seed),
            rng_seed: snapshot.rng_seed,
        }
    }
}

/// Per-hunter handle onto a shared [`CentralizedController`].
///
/// Only the first hunter drives the controller: it starts each tick and
/// forwards state changes and updates. The second hunter's calls read the
/// pending action or do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralizedHunter {
    id: HunterId,
}

impl CentralizedHunter {
    pub const fn new(id: HunterId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> HunterId {
        self.id
    }

    pub fn choose_action(&self, controller: &mut CentralizedController) -> Result<Action> {
        if self.id == HunterId::First {
            controller.begin_tick()?;
        }
        controller.action_for(self.id)
    }

    pub fn set_state(&self, controller: &mut CentralizedController, state: State) {
        if self.id == HunterId::First {
            controller.set_state(state);
        }
    }

    pub fn update(
        &self,
        controller: &mut CentralizedController,
        new_state: State,
        action: Action,
        reward: f64,
        partner_action: Action,
        episode: u64,
    ) -> Result<()> {
        if self.id == HunterId::First {
            controller.update(
                new_state,
                JointAction::new(action, partner_action),
                reward,
                episode,
            )?;
        }
        Ok(())
    }
}
