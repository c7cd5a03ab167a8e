//! Pursuit environment: one prey and two hunters on a torus

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::{
    action::Action,
    capture::{CapturePolicy, HunterReward},
    geometry::{GridSize, Position, RelativeLocation},
    state::State,
};
use crate::{Error, Result, types::HunterId};

/// Static rules of a game: grid, capture policy and reward tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub grid: GridSize,
    pub capture: CapturePolicy,
    /// Reward tables for hunter 1 and hunter 2.
    pub rewards: [HunterReward; 2],
}

impl GameConfig {
    pub fn new(grid: GridSize, capture: CapturePolicy) -> Self {
        Self {
            grid,
            capture,
            rewards: [HunterReward::default(); 2],
        }
    }

    /// Use the same reward table for both hunters.
    pub fn with_shared_reward(mut self, reward: HunterReward) -> Self {
        self.rewards = [reward; 2];
        self
    }

    pub fn with_rewards(mut self, hunter_1: HunterReward, hunter_2: HunterReward) -> Self {
        self.rewards = [hunter_1, hunter_2];
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        for (idx, table) in self.rewards.iter().enumerate() {
            for (name, value) in [("reward", table.reward), ("penalty", table.penalty)] {
                if !value.is_finite() {
                    return Err(Error::InvalidHyperparameter {
                        name: format!("hunter_{}.{name}", idx + 1),
                        value,
                        reason: "must be finite".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(GridSize::default(), CapturePolicy::default())
    }
}

/// Result of a single environment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Scores for hunter 1 and hunter 2.
    pub scores: (f64, f64),
    /// Capture credit for hunter 1 and hunter 2.
    pub captured: (bool, bool),
}

impl StepOutcome {
    /// The episode ends as soon as either hunter is credited.
    pub fn is_terminal(&self) -> bool {
        self.captured.0 || self.captured.1
    }

    pub fn score_for(&self, hunter: HunterId) -> f64 {
        match hunter {
            HunterId::First => self.scores.0,
            HunterId::Second => self.scores.1,
        }
    }
}

/// The pursuit environment.
///
/// Owns the absolute positions of all three entities. Hunters only ever see
/// the relative encoding returned by [`Game::state_for_hunter`].
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    prey: Position,
    hunters: [Position; 2],
    rng: StdRng,
}

impl Game {
    /// Create a game and place all entities at random.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid or reward tables are invalid.
    pub fn new(config: GameConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let mut game = Self {
            config,
            prey: Position::new(0, 0),
            hunters: [Position::new(0, 0); 2],
            rng,
        };
        game.reset();
        Ok(game)
    }

    /// Create a game with a deterministic random stream.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> GridSize {
        self.config.grid
    }

    pub fn prey_position(&self) -> Position {
        self.prey
    }

    pub fn hunter_position(&self, hunter: HunterId) -> Position {
        self.hunters[hunter.index()]
    }

    /// Scatter prey and hunters uniformly, then let the prey make its first move.
    ///
    /// Entities may share a cell right after placement; the prey's move
    /// guarantees it ends up away from both hunters whenever that is possible.
    pub fn reset(&mut self) {
        self.prey = self.random_position();
        self.hunters = [self.random_position(), self.random_position()];
        self.move_prey();
    }

    /// Move both hunters, then the prey, and score the resulting configuration.
    pub fn step(&mut self, hunter_1: Action, hunter_2: Action) -> StepOutcome {
        let grid = self.config.grid;
        self.hunters[0] = grid.step(self.hunters[0], hunter_1);
        self.hunters[1] = grid.step(self.hunters[1], hunter_2);
        self.move_prey();
        self.outcome()
    }

    /// Displacements `(prey - hunter_1, prey - hunter_2)`.
    pub fn relative_locations(&self) -> (RelativeLocation, RelativeLocation) {
        let grid = self.config.grid;
        (
            grid.relative_location(self.prey, self.hunters[0]),
            grid.relative_location(self.prey, self.hunters[1]),
        )
    }

    /// State as observed by the given hunter (own displacement first).
    pub fn state_for_hunter(&self, hunter: HunterId) -> State {
        let (first, second) = self.relative_locations();
        let state = State::new(first, second);
        match hunter {
            HunterId::First => state,
            HunterId::Second => state.swapped(),
        }
    }

    /// Both hunters' states, indexed by [`HunterId::index`].
    pub fn states(&self) -> [State; 2] {
        HunterId::BOTH.map(|hunter| self.state_for_hunter(hunter))
    }

    /// Capture flags for the current positions.
    pub fn capture_flags(&self) -> (bool, bool) {
        let (first, second) = self.relative_locations();
        self.config.capture.is_prey_caught(first, second)
    }

    /// Scores for the current positions, without moving anything.
    pub fn compute_score(&self) -> (f64, f64) {
        self.outcome().scores
    }

    /// Place all three entities explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfBounds`] if any position is off the grid.
    pub fn set_positions(
        &mut self,
        prey: Position,
        hunter_1: Position,
        hunter_2: Position,
    ) -> Result<()> {
        let grid = self.config.grid;
        for position in [prey, hunter_1, hunter_2] {
            if !grid.contains(position) {
                return Err(Error::PositionOutOfBounds {
                    x: position.x,
                    y: position.y,
                    width: grid.width(),
                    height: grid.height(),
                });
            }
        }
        self.prey = prey;
        self.hunters = [hunter_1, hunter_2];
        Ok(())
    }

    fn outcome(&self) -> StepOutcome {
        let captured = self.capture_flags();
        let [first, second] = self.config.rewards;
        StepOutcome {
            scores: (first.score(captured.0), second.score(captured.1)),
            captured,
        }
    }

    fn random_position(&mut self) -> Position {
        let grid = self.config.grid;
        Position::new(
            self.rng.random_range(0..grid.width()),
            self.rng.random_range(0..grid.height()),
        )
    }

    /// Uniform over the cardinal moves that do not land on a hunter.
    ///
    /// Equivalent to resampling until a free cell comes up. When every move is
    /// blocked the prey stays put.
    fn move_prey(&mut self) {
        let grid = self.config.grid;
        let free: Vec<Position> = Action::CARDINAL
            .iter()
            .map(|&action| grid.step(self.prey, action))
            .filter(|target| !self.hunters.contains(target))
            .collect();

        match free.choose(&mut self.rng) {
            Some(&target) => self.prey = target,
            None => tracing::trace!(prey = %self.prey, "prey is boxed in, staying put"),
        }
    }
}
