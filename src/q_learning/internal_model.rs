//! Internal model of a partner's next action
//!
//! Each `(state, action)` entry is a leaky integrator of how often the action
//! was observed in that state. Entries start at the uniform prior `1/5` and are
//! created on first read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::schedule::ThetaSchedule;
use crate::{
    pursuit::{Action, State},
    utils::normalize_weights,
};

/// Uniform prior over the five actions.
pub const UNIFORM_ESTIMATE: f64 = 1.0 / Action::COUNT as f64;

/// Whether estimates are renormalized to sum to one after each update.
///
/// The leaky update keeps the sum at one only up to rounding; `Preserve`
/// leaves that drift in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenormalizationPolicy {
    #[default]
    Preserve,
    Renormalize,
}

/// Recency-weighted estimate of a partner's action distribution per state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalModel {
    #[serde(with = "entries")]
    estimates: HashMap<(State, Action), f64>,
    schedule: ThetaSchedule,
    renormalization: RenormalizationPolicy,
}

impl InternalModel {
    pub fn new(schedule: ThetaSchedule) -> Self {
        Self {
            estimates: HashMap::new(),
            schedule,
            renormalization: RenormalizationPolicy::default(),
        }
    }

    pub fn with_renormalization(mut self, policy: RenormalizationPolicy) -> Self {
        self.renormalization = policy;
        self
    }

    pub fn schedule(&self) -> ThetaSchedule {
        self.schedule
    }

    pub fn renormalization(&self) -> RenormalizationPolicy {
        self.renormalization
    }

    /// Estimated probability of `action` in `state`, creating the entry on first read.
    pub fn estimate(&mut self, state: State, action: Action) -> f64 {
        *self
            .estimates
            .entry((state, action))
            .or_insert(UNIFORM_ESTIMATE)
    }

    /// Estimated distribution in `state`, indexed by [`Action::index`].
    pub fn probabilities(&mut self, state: State) -> [f64; Action::COUNT] {
        Action::ALL.map(|action| self.estimate(state, action))
    }

    /// All actions sharing the highest estimate in `state`, in canonical order.
    ///
    /// Ties are exact: estimates must compare equal to be considered modes.
    pub fn modes(&mut self, state: State) -> Vec<Action> {
        let probabilities = self.probabilities(state);
        let max = probabilities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        Action::ALL
            .into_iter()
            .filter(|action| probabilities[action.index()] == max)
            .collect()
    }

    /// Pull the observed action's estimate toward one and all others toward zero.
    ///
    /// `estimate ← (1 - θ)·estimate + θ·[action == observed]` with `θ` taken
    /// from the schedule at `episode`.
    pub fn update(&mut self, state: State, observed: Action, episode: u64) {
        let theta = self.schedule.theta(episode);
        for action in Action::ALL {
            let target = if action == observed { theta } else { 0.0 };
            let updated = (1.0 - theta) * self.estimate(state, action) + target;
            self.estimates.insert((state, action), updated);
        }

        if self.renormalization == RenormalizationPolicy::Renormalize {
            let current = self.probabilities(state);
            if let Some(normalized) = normalize_weights(current) {
                for (action, value) in Action::ALL.into_iter().zip(normalized) {
                    self.estimates.insert((state, action), value);
                }
            }
        }
    }

    /// Number of `(state, action)` entries created so far.
    pub fn size(&self) -> usize {
        self.estimates.len()
    }
}

/// Map <-> entry list, for formats that only accept string map keys.
mod entries {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::pursuit::{Action, State};

    type Key = (State, Action);

    pub fn serialize<S: Serializer>(
        map: &HashMap<Key, f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<(&Key, &f64)> = map.iter().collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Key, f64>, D::Error> {
        let entries = Vec::<(Key, f64)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pursuit::RelativeLocation;

    fn model() -> InternalModel {
        InternalModel::new(ThetaSchedule::new(0.998849).unwrap())
    }

    fn state() -> State {
        State::new(RelativeLocation::new(-1, 2), RelativeLocation::new(2, 2))
    }

    #[test]
    fn test_prior_is_uniform_and_lazy() {
        let mut model = model();
        assert_eq!(model.size(), 0);
        let probabilities = model.probabilities(state());
        assert_eq!(probabilities, [UNIFORM_ESTIMATE; Action::COUNT]);
        assert_eq!(model.size(), Action::COUNT);
        assert_eq!(model.modes(state()), Action::ALL.to_vec());
    }

    #[test]
    fn test_single_update_matches_leaky_integrator() {
        let mut model = model();
        model.update(state(), Action::Up, 0);
        // θ(0) = 0.2
        assert!((model.estimate(state(), Action::Up) - (0.8 * 0.2 + 0.2)).abs() < 1e-12);
        assert!((model.estimate(state(), Action::Left) - 0.8 * 0.2).abs() < 1e-12);
        assert_eq!(model.modes(state()), vec![Action::Up]);
    }

    #[test]
    fn test_repeated_observation_converges_monotonically() {
        let mut model = model();
        let mut previous = model.probabilities(state());
        for _ in 0..200 {
            model.update(state(), Action::Right, 1);
            let current = model.probabilities(state());
            for action in Action::ALL {
                if action == Action::Right {
                    assert!(current[action.index()] >= previous[action.index()] - 1e-15);
                } else {
                    assert!(current[action.index()] <= previous[action.index()] + 1e-15);
                }
            }
            previous = current;
        }
        assert!((previous[Action::Right.index()] - 1.0).abs() < 1e-9);
        assert!(previous[Action::Stay.index()] < 1e-9);
    }

    #[test]
    fn test_updates_leave_other_states_untouched() {
        let mut model = model();
        let other = state().swapped();
        model.update(state(), Action::Down, 3);
        assert_eq!(model.estimate(other, Action::Down), UNIFORM_ESTIMATE);
    }

    #[test]
    fn test_preserve_keeps_raw_leaky_values() {
        let mut model = model();
        assert_eq!(model.renormalization(), RenormalizationPolicy::Preserve);
        model.update(state(), Action::Up, 0);
        model.update(state(), Action::Right, 1);

        let t0 = 0.2;
        let t1 = 0.2 * 0.998849;
        let up = (1.0 - t1) * ((1.0 - t0) * 0.2 + t0);
        let right = (1.0 - t1) * ((1.0 - t0) * 0.2) + t1;
        let rest = (1.0 - t1) * ((1.0 - t0) * 0.2);
        let expected = [up, right, rest, rest, rest];
        for (actual, expected) in model.probabilities(state()).into_iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn test_preserve_carries_existing_drift() {
        let mut preserved = model();
        let mut renormalized = model().with_renormalization(RenormalizationPolicy::Renormalize);
        for model in [&mut preserved, &mut renormalized] {
            // estimates summing to 1.3
            model.probabilities(state());
            model.estimates.insert((state(), Action::Up), 0.5);
            model.update(state(), Action::Down, 0);
        }

        // (1 - θ) · 1.3 + θ with θ = 0.2
        let sum: f64 = preserved.probabilities(state()).iter().sum();
        assert!((sum - 1.24).abs() < 1e-12);
        assert!((preserved.estimate(state(), Action::Up) - 0.4).abs() < 1e-12);

        let sum: f64 = renormalized.probabilities(state()).iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_renormalize_keeps_unit_sum() {
        let mut model = model().with_renormalization(RenormalizationPolicy::Renormalize);
        for (i, action) in Action::ALL.into_iter().cycle().take(500).enumerate() {
            model.update(state(), action, i as u64);
        }
        let sum: f64 = model.probabilities(state()).iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let mut model = model();
        model.update(state(), Action::Stay, 5);
        let bytes = rmp_serde::to_vec(&model).unwrap();
        let restored: InternalModel = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(restored, model);
    }
}
