//! Team adapters: independent learners and the centralized controller.

use crate::{
    Result,
    experiment::TeamSnapshot,
    ports::HunterTeam,
    pursuit::{Action, State, StepOutcome},
    q_learning::{CentralizedController, CentralizedHunter, HunterAgent},
    types::HunterId,
};

/// Two hunters that each learn on their own.
#[derive(Debug, Clone)]
pub struct IndependentPair {
    hunters: [HunterAgent; 2],
}

impl IndependentPair {
    pub fn new(hunters: [HunterAgent; 2]) -> Self {
        Self { hunters }
    }

    pub fn hunter(&self, id: HunterId) -> &HunterAgent {
        &self.hunters[id.index()]
    }
}

impl HunterTeam for IndependentPair {
    fn name(&self) -> String {
        self.hunters[0].kind().to_string()
    }

    fn set_states(&mut self, states: [State; 2]) {
        for (hunter, state) in self.hunters.iter_mut().zip(states) {
            hunter.set_state(state);
        }
    }

    fn choose_actions(&mut self) -> Result<(Action, Action)> {
        let first = self.hunters[0].choose_action()?;
        let second = self.hunters[1].choose_action()?;
        Ok((first, second))
    }

    fn update(
        &mut self,
        states: [State; 2],
        actions: (Action, Action),
        outcome: &StepOutcome,
        episode: u64,
    ) -> Result<()> {
        let played = [actions.0, actions.1];
        for id in HunterId::BOTH {
            let own = played[id.index()];
            let partner = played[id.partner().index()];
            self.hunters[id.index()].update(
                states[id.index()],
                own,
                outcome.score_for(id),
                partner,
                episode,
            )?;
        }
        Ok(())
    }

    fn snapshot(&self) -> TeamSnapshot {
        TeamSnapshot::Independent([self.hunters[0].snapshot(), self.hunters[1].snapshot()])
    }
}

/// Both hunters driven by one joint-action controller.
///
/// Every call goes through the per-hunter facades in hunter order, so the
/// first hunter always starts the tick before the second reads its action.
#[derive(Debug, Clone)]
pub struct CentralizedPair {
    controller: CentralizedController,
    facades: [CentralizedHunter; 2],
}

impl CentralizedPair {
    pub fn new(controller: CentralizedController) -> Self {
        Self {
            controller,
            facades: HunterId::BOTH.map(CentralizedHunter::new),
        }
    }

    pub fn controller(&self) -> &CentralizedController {
        &self.controller
    }
}

impl HunterTeam for CentralizedPair {
    fn name(&self) -> String {
        "Centralized Q-learning".to_string()
    }

    fn set_states(&mut self, states: [State; 2]) {
        for (facade, state) in self.facades.iter().zip(states) {
            facade.set_state(&mut self.controller, state);
        }
    }

    fn choose_actions(&mut self) -> Result<(Action, Action)> {
        let [first, second] = self.facades;
        let a1 = first.choose_action(&mut self.controller)?;
        let a2 = second.choose_action(&mut self.controller)?;
        Ok((a1, a2))
    }

    fn update(
        &mut self,
        states: [State; 2],
        actions: (Action, Action),
        outcome: &StepOutcome,
        episode: u64,
    ) -> Result<()> {
        let played = [actions.0, actions.1];
        for facade in self.facades {
            let id = facade.id();
            facade.update(
                &mut self.controller,
                states[id.index()],
                played[id.index()],
                outcome.score_for(id),
                played[id.partner().index()],
                episode,
            )?;
        }
        Ok(())
    }

    fn snapshot(&self) -> TeamSnapshot {
        TeamSnapshot::Centralized(self.controller.snapshot())
    }
}
