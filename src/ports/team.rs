//! Team port - what the training loop needs from a pair of hunters
//!
//! Independent learners and the centralized controller look the same from
//! the environment's side: both hunters receive their states, both pick an
//! action, and both learn from the step.

use crate::{
    Result,
    experiment::TeamSnapshot,
    pursuit::{Action, State, StepOutcome},
};

/// A pair of hunters driven in lockstep.
///
/// # Call Order
///
/// Each tick is `choose_actions`, then a game step, then either `update`
/// (learning) or `set_states` (frozen evaluation). Implementations may rely
/// on this order; the centralized adapter draws its joint action inside
/// `choose_actions` and discards it on `update`/`set_states`.
pub trait HunterTeam {
    /// Label used for logging and learning curves.
    fn name(&self) -> String;

    /// Overwrite both hunters' states without learning.
    fn set_states(&mut self, states: [State; 2]);

    /// Actions for hunter 1 and hunter 2 in the current tick.
    fn choose_actions(&mut self) -> Result<(Action, Action)>;

    /// Learn from one step and advance to `states`.
    ///
    /// # Parameters
    ///
    /// * `states` - Post-step states, indexed by hunter
    /// * `actions` - Actions played this tick
    /// * `outcome` - Scores and capture flags of the step
    /// * `episode` - Index of the learning episode, drives the theta schedule
    fn update(
        &mut self,
        states: [State; 2],
        actions: (Action, Action),
        outcome: &StepOutcome,
        episode: u64,
    ) -> Result<()>;

    /// Serializable copy of every learned table.
    fn snapshot(&self) -> TeamSnapshot;
}
