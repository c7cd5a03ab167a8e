//! Q-learning hunters
//!
//! A hunter keeps a Q-table keyed by its state, its own action and (for the
//! estimating variants) its partner's action. How the partner action enters
//! action selection and bootstrapping is fixed at construction by
//! [`EstimationKind`].

use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    internal_model::{InternalModel, RenormalizationPolicy, UNIFORM_ESTIMATE},
    params::LearningParams,
    q_table::{AgentKey, QTable},
    schedule::ThetaSchedule,
};
use crate::{
    Error, Result,
    pursuit::{Action, State},
    types::Temperature,
    utils::{boltzmann_probabilities, build_rng, weighted_sample},
};

/// How a hunter accounts for its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimationKind {
    /// Plain Q-learning; the partner is part of the environment.
    Independent,
    /// Learned model of the partner's next action.
    Proposed,
    /// Fixed uniform belief about the partner.
    Random,
    /// Learned model fed with the hunter's own actions.
    SelfModel,
}

impl EstimationKind {
    pub fn uses_partner_action(self) -> bool {
        !matches!(self, EstimationKind::Independent)
    }
}

impl fmt::Display for EstimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EstimationKind::Independent => "Q-learning",
            EstimationKind::Proposed => "Q-learning with proposed action estimation",
            EstimationKind::Random => "Q-learning with random action estimation",
            EstimationKind::SelfModel => "Q-learning with self-model action estimation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) enum Estimation {
    Independent,
    Proposed(InternalModel),
    Random,
    SelfModel(InternalModel),
}

impl Estimation {
    fn new(kind: EstimationKind, schedule: ThetaSchedule) -> Self {
        match kind {
            EstimationKind::Independent => Estimation::Independent,
            EstimationKind::Proposed => Estimation::Proposed(InternalModel::new(schedule)),
            EstimationKind::Random => Estimation::Random,
            EstimationKind::SelfModel => Estimation::SelfModel(InternalModel::new(schedule)),
        }
    }

    fn kind(&self) -> EstimationKind {
        match self {
            Estimation::Independent => EstimationKind::Independent,
            Estimation::Proposed(_) => EstimationKind::Proposed,
            Estimation::Random => EstimationKind::Random,
            Estimation::SelfModel(_) => EstimationKind::SelfModel,
        }
    }

    fn model(&self) -> Option<&InternalModel> {
        match self {
            Estimation::Proposed(model) | Estimation::SelfModel(model) => Some(model),
            Estimation::Independent | Estimation::Random => None,
        }
    }
}

/// Serializable state of a [`HunterAgent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    estimation: Estimation,
    q_table: QTable<AgentKey>,
    learning_rate: f64,
    discount_factor: f64,
    temperature: Temperature,
    schedule: ThetaSchedule,
    state: State,
    episode: u64,
    rng_seed: Option<u64>,
}

impl AgentSnapshot {
    pub fn kind(&self) -> EstimationKind {
        self.estimation.kind()
    }

    pub fn q_table(&self) -> &QTable<AgentKey> {
        &self.q_table
    }

    pub fn internal_model(&self) -> Option<&InternalModel> {
        self.estimation.model()
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }
}

/// Tabular Q-learning hunter with Boltzmann action selection
#[derive(Debug, Clone)]
pub struct HunterAgent {
    q_table: QTable<AgentKey>,
    estimation: Estimation,
    learning_rate: f64,
    discount_factor: f64,
    temperature: Temperature,
    schedule: ThetaSchedule,
    state: State,
    episode: u64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl HunterAgent {
    /// Create a hunter
    ///
    /// # Errors
    ///
    /// Returns an error if any hyperparameter is invalid.
    pub fn new(kind: EstimationKind, params: &LearningParams, initial_state: State) -> Result<Self> {
        params.validate()?;
        let schedule = params.schedule()?;
        Ok(Self {
            q_table: QTable::new(params.initial_q),
            estimation: Estimation::new(kind, schedule),
            learning_rate: params.alpha,
            discount_factor: params.gamma,
            temperature: params.temperature()?,
            schedule,
            state: initial_state,
            episode: 0,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Select how the internal model handles drift; ignored by variants without one.
    pub fn with_renormalization(mut self, policy: RenormalizationPolicy) -> Self {
        self.estimation = match self.estimation {
            Estimation::Proposed(model) => {
                Estimation::Proposed(model.with_renormalization(policy))
            }
            Estimation::SelfModel(model) => {
                Estimation::SelfModel(model.with_renormalization(policy))
            }
            other => other,
        };
        self
    }

    pub fn kind(&self) -> EstimationKind {
        self.estimation.kind()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Episode index passed to the most recent update.
    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn q_table(&self) -> &QTable<AgentKey> {
        &self.q_table
    }

    pub fn internal_model(&self) -> Option<&InternalModel> {
        self.estimation.model()
    }

    /// Move to `state` without learning (frozen evaluation).
    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    fn key(&self, state: State, action: Action, partner: Action) -> AgentKey {
        let partner = self.kind().uses_partner_action().then_some(partner);
        (state, action, partner)
    }

    /// Expected value of `action` in the current state, used for selection.
    ///
    /// Estimating variants marginalize the Q-value over their belief about
    /// the partner's action; the plain learner reads its table directly.
    pub fn expected_value(&mut self, action: Action) -> f64 {
        let state = self.state;
        match &mut self.estimation {
            Estimation::Independent => self.q_table.get(&(state, action, None)),
            Estimation::Random => Action::ALL
                .into_iter()
                .map(|partner| {
                    UNIFORM_ESTIMATE * self.q_table.get(&(state, action, Some(partner)))
                })
                .sum(),
            Estimation::Proposed(model) | Estimation::SelfModel(model) => {
                let mut total = 0.0;
                for partner in Action::ALL {
                    let estimate = model.estimate(state, partner);
                    total += estimate * self.q_table.get(&(state, action, Some(partner)));
                }
                total
            }
        }
    }

    /// Value of reaching `future` by playing `action`, used for bootstrapping.
    ///
    /// Estimating variants assume the partner plays its most likely action
    /// (the best Q-value among tied modes); the random variant samples the
    /// partner action uniformly.
    pub fn predict_reward(&mut self, future: State, action: Action) -> f64 {
        match &mut self.estimation {
            Estimation::Independent => self.q_table.get(&(future, action, None)),
            Estimation::Random => {
                let partner = Action::ALL[self.rng.random_range(0..Action::COUNT)];
                self.q_table.get(&(future, action, Some(partner)))
            }
            Estimation::Proposed(model) | Estimation::SelfModel(model) => model
                .modes(future)
                .into_iter()
                .map(|partner| self.q_table.get(&(future, action, Some(partner))))
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Best predicted reward one step beyond `new_state`.
    ///
    /// Every own/partner action pair shifts the relative displacements
    /// directly (no wrapping); the prey's reply is not modelled.
    pub fn max_ev_next(&mut self, new_state: State) -> f64 {
        let mut best = f64::NEG_INFINITY;
        for action in Action::ALL {
            let own = new_state.own.shifted(action);
            for partner in Action::ALL {
                let lookahead = State::new(own, new_state.other.shifted(partner));
                best = best.max(self.predict_reward(lookahead, action));
            }
        }
        best
    }

    /// Boltzmann distribution over actions, indexed by [`Action::index`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateDistribution`] if the expected values are
    /// not finite.
    pub fn action_probabilities(&mut self) -> Result<Vec<f64>> {
        let values: Vec<f64> = Action::ALL
            .into_iter()
            .map(|action| self.expected_value(action))
            .collect();
        boltzmann_probabilities(&values, self.temperature, "hunter action values")
    }

    /// Sample an action from the Boltzmann distribution.
    pub fn choose_action(&mut self) -> Result<Action> {
        let probabilities = self.action_probabilities()?;
        let weighted: Vec<(Action, f64)> = Action::ALL.into_iter().zip(probabilities).collect();
        weighted_sample(&mut self.rng, &weighted).ok_or_else(|| Error::DegenerateDistribution {
            context: "hunter action sampling".to_string(),
        })
    }

    /// One TD(0) backup, then advance to `new_state`.
    ///
    /// `Q(s,a,b) ← (1-α)·Q(s,a,b) + α·(reward + γ·maxEV(new_state))`. Before
    /// the backup the temperature follows the theta schedule and the internal
    /// model (if any) learns from the pre-transition state.
    ///
    /// # Errors
    ///
    /// Fails if the schedule no longer yields a valid temperature.
    pub fn update(
        &mut self,
        new_state: State,
        action: Action,
        reward: f64,
        partner_action: Action,
        episode: u64,
    ) -> Result<()> {
        self.temperature = self.schedule.temperature(episode)?;
        self.episode = episode;

        let state = self.state;
        match &mut self.estimation {
            Estimation::Proposed(model) => model.update(state, partner_action, episode),
            Estimation::SelfModel(model) => model.update(state, action, episode),
            Estimation::Independent | Estimation::Random => {}
        }

        let key = self.key(state, action, partner_action);
        let current_q = self.q_table.get(&key);
        let target = reward + self.discount_factor * self.max_ev_next(new_state);
        let new_q = (1.0 - self.learning_rate) * current_q + self.learning_rate * target;
        self.q_table.set(key, new_q);

        self.state = new_state;
        Ok(())
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            estimation: self.estimation.clone(),
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

    pub fn from_snapshot(snapshot: AgentSnapshot) -> Self {
        Self {
            q_table: snapshot.q_table,
            estimation: snapshot.estimation,
            learning_rate: snapshot.learning_rate,
            discount_factor: snapshot.discount_factor,
            temperature: snapshot.temperature,
            schedule: snapshot.schedule,
            state: snapshot.state,
            episode: snapshot.episode,
            rng: build_rng(snapshot.rng_seed),
            rng_seed: snapshot.rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pursuit::RelativeLocation;

    fn state(a: (i32, i32), b: (i32, i32)) -> State {
        State::new(RelativeLocation::from(a), RelativeLocation::from(b))
    }

    fn params() -> LearningParams {
        LearningParams::default().with_alpha(0.5).with_gamma(0.5)
    }

    fn agent(kind: EstimationKind) -> HunterAgent {
        HunterAgent::new(kind, &params(), state((2, 1), (-1, 3)))
            .unwrap()
            .with_seed(7)
    }

    #[test]
    fn test_uniform_values_give_uniform_policy() {
        let mut hunter = agent(EstimationKind::Proposed);
        let probabilities = hunter.action_probabilities().unwrap();
        for p in probabilities {
            assert!((p - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_independent_update_matches_td_rule() {
        let mut hunter = agent(EstimationKind::Independent);
        let start = hunter.state();
        let next = state((1, 1), (-1, 2));

        hunter
            .update(next, Action::Left, 1.0, Action::Down, 0)
            .unwrap();

        // all lookahead values are 0, so Q = 0.5 * 0 + 0.5 * (1 + 0.5 * 0)
        assert_eq!(hunter.q_table().peek(&(start, Action::Left, None)), 0.5);
        assert!(!hunter.q_table().contains(&(start, Action::Left, Some(Action::Down))));
        assert_eq!(hunter.state(), next);
    }

    #[test]
    fn test_update_bootstraps_from_lookahead() {
        let mut hunter = agent(EstimationKind::Independent);
        let start = hunter.state();
        let next = state((0, 2), (1, 0));
        // reachable from `next` by moving Up: own (0, 1)
        let lookahead = state((0, 1), (1, 0));
        hunter.q_table.set((lookahead, Action::Up, None), 2.0);

        hunter.update(next, Action::Stay, 0.0, Action::Stay, 0).unwrap();
        // 0.5 * 0 + 0.5 * (0 + 0.5 * 2.0)
        assert_eq!(hunter.q_table().peek(&(start, Action::Stay, None)), 0.5);
    }

    #[test]
    fn test_update_applies_theta_schedule_to_temperature() {
        for kind in [
            EstimationKind::Independent,
            EstimationKind::Proposed,
            EstimationKind::Random,
            EstimationKind::SelfModel,
        ] {
            let mut hunter = agent(kind);
            let next = hunter.state();
            hunter.update(next, Action::Up, 0.0, Action::Up, 10).unwrap();
            let expected = 0.2 * LearningParams::DEFAULT_THETA.powf(10.0);
            assert!((hunter.temperature().value() - expected).abs() < 1e-15);
            assert_eq!(hunter.episode(), 10);
        }
    }

    #[test]
    fn test_proposed_model_learns_partner_action_in_previous_state() {
        let mut hunter = agent(EstimationKind::Proposed);
        let start = hunter.state();
        let next = state((1, 1), (0, 3));
        hunter.update(next, Action::Left, 0.0, Action::Up, 0).unwrap();

        let mut model = hunter.internal_model().unwrap().clone();
        assert_eq!(model.modes(start), vec![Action::Up]);
        assert!(
            hunter
                .q_table()
                .contains(&(start, Action::Left, Some(Action::Up)))
        );
    }

    #[test]
    fn test_self_model_learns_own_action() {
        let mut hunter = agent(EstimationKind::SelfModel);
        let start = hunter.state();
        hunter
            .update(state((0, 0), (0, 0)), Action::Right, 0.0, Action::Down, 0)
            .unwrap();

        let mut model = hunter.internal_model().unwrap().clone();
        assert_eq!(model.modes(start), vec![Action::Right]);
        // the table is still keyed by the partner's action
        assert!(
            hunter
                .q_table()
                .contains(&(start, Action::Right, Some(Action::Down)))
        );
    }

    #[test]
    fn test_expected_value_marginalizes_over_belief() {
        let mut hunter = agent(EstimationKind::Proposed);
        let start = hunter.state();
        hunter.q_table.set((start, Action::Up, Some(Action::Left)), 1.0);
        // uniform prior: 0.2 * 1.0
        assert!((hunter.expected_value(Action::Up) - 0.2).abs() < 1e-12);

        if let Estimation::Proposed(model) = &mut hunter.estimation {
            model.update(start, Action::Left, 0);
        }
        // estimate(Left) = 0.8 * 0.2 + 0.2
        assert!((hunter.expected_value(Action::Up) - 0.36).abs() < 1e-12);
    }

    #[test]
    fn test_predict_reward_takes_best_tied_mode() {
        let mut hunter = agent(EstimationKind::Proposed);
        let future = state((3, 0), (0, -2));
        hunter.q_table.set((future, Action::Down, Some(Action::Stay)), 0.7);
        hunter.q_table.set((future, Action::Down, Some(Action::Up)), 0.3);
        // all five actions tie under the prior
        assert_eq!(hunter.predict_reward(future, Action::Down), 0.7);

        if let Estimation::Proposed(model) = &mut hunter.estimation {
            model.update(future, Action::Up, 0);
        }
        // Up is now the only mode
        assert_eq!(hunter.predict_reward(future, Action::Down), 0.3);
    }

    #[test]
    fn test_random_estimation_keeps_no_model() {
        let mut hunter = agent(EstimationKind::Random);
        assert!(hunter.internal_model().is_none());
        let next = hunter.state();
        hunter.update(next, Action::Up, 1.0, Action::Left, 0).unwrap();
        let probabilities = hunter.action_probabilities().unwrap();
        assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_random_expected_value_is_uniform_marginal() {
        let mut hunter = agent(EstimationKind::Random);
        let start = hunter.state();
        for (i, partner) in Action::ALL.into_iter().enumerate() {
            hunter.q_table.set((start, Action::Right, Some(partner)), i as f64 + 1.0);
        }
        // 0.2 * (1 + 2 + 3 + 4 + 5)
        assert!((hunter.expected_value(Action::Right) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_random_predict_reward_samples_partner_uniformly() {
        let mut hunter = agent(EstimationKind::Random);
        let future = state((1, -1), (2, 0));
        for (i, partner) in Action::ALL.into_iter().enumerate() {
            hunter.q_table.set((future, Action::Left, Some(partner)), 10.0 * i as f64);
        }

        let mut seen = [0usize; Action::COUNT];
        for _ in 0..500 {
            let value = hunter.predict_reward(future, Action::Left);
            let i = (value / 10.0) as usize;
            assert_eq!(value, 10.0 * i as f64);
            seen[i] += 1;
        }
        // every partner action is drawn, none dominates
        assert!(seen.iter().all(|&count| (50..=150).contains(&count)), "{seen:?}");
    }

    #[test]
    fn test_random_updates_never_shift_belief() {
        let mut hunter = agent(EstimationKind::Random);
        let start = hunter.state();
        for (i, partner) in Action::ALL.into_iter().enumerate() {
            hunter.q_table.set((start, Action::Right, Some(partner)), i as f64);
        }
        let before = hunter.expected_value(Action::Right);

        for episode in 0..10 {
            hunter.update(start, Action::Up, 1.0, Action::Left, episode).unwrap();
        }

        assert!(hunter.internal_model().is_none());
        assert_eq!(hunter.expected_value(Action::Right), before);
        assert!((before - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_choice_turns_greedy_once_temperature_is_subnormal() {
        let params = params().with_theta(0.5);
        let mut hunter =
            HunterAgent::new(EstimationKind::Independent, &params, state((2, 1), (-1, 3)))
                .unwrap()
                .with_seed(7);
        let start = hunter.state();
        // θ(1030) = 0.2 · 2^-1030
        hunter.update(start, Action::Stay, 0.0, Action::Stay, 1030).unwrap();
        assert!(hunter.temperature().value() < f64::MIN_POSITIVE);

        hunter.q_table.set((start, Action::Down, None), 1.0);
        let probabilities = hunter.action_probabilities().unwrap();
        assert_eq!(probabilities[Action::Down.index()], 1.0);
        for _ in 0..20 {
            assert_eq!(hunter.choose_action().unwrap(), Action::Down);
        }
    }

    #[test]
    fn test_seeded_agents_choose_identically() {
        let mut a = agent(EstimationKind::Proposed);
        let mut b = agent(EstimationKind::Proposed);
        for _ in 0..20 {
            assert_eq!(a.choose_action().unwrap(), b.choose_action().unwrap());
        }
    }

    #[test]
    fn test_snapshot_restores_tables() {
        let mut hunter = agent(EstimationKind::SelfModel);
        let next = state((1, 0), (0, 1));
        hunter.update(next, Action::Up, 1.0, Action::Down, 4).unwrap();

        let restored = HunterAgent::from_snapshot(hunter.snapshot());
        assert_eq!(restored.q_table(), hunter.q_table());
        assert_eq!(restored.internal_model(), hunter.internal_model());
        assert_eq!(restored.state(), next);
        assert_eq!(restored.kind(), EstimationKind::SelfModel);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let bad = params().with_initial_temperature(-1.0);
        assert!(HunterAgent::new(EstimationKind::Independent, &bad, state((0, 0), (0, 0))).is_err());
    }
}
