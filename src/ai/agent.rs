use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game::{GameState, MoveError};

use super::learner::QLearner;
use super::table::ValueTable;

/// Universal interface for game-playing agents.
pub trait Agent {
    /// Select an action (column) given the current game state.
    /// When `training` is true, the agent may explore; otherwise it exploits.
    fn select_action(&mut self, state: &GameState, training: bool) -> Result<usize, MoveError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// Agent backed by a learned value table. Never writes to the table.
pub struct QAgent<'a> {
    table: &'a ValueTable,
    learner: QLearner,
    rng: StdRng,
}

impl<'a> QAgent<'a> {
    pub fn new(table: &'a ValueTable, learner: QLearner) -> Self {
        QAgent {
            table,
            learner,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(table: &'a ValueTable, learner: QLearner, seed: u64) -> Self {
        QAgent {
            table,
            learner,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for QAgent<'_> {
    fn select_action(&mut self, state: &GameState, training: bool) -> Result<usize, MoveError> {
        if training {
            self.learner.explore(self.table, state, &mut self.rng)
        } else {
            self.learner.exploit(self.table, state)
        }
    }

    fn name(&self) -> &str {
        "Q-table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::LearnerConfig;
    use crate::game::legal_moves;

    #[test]
    fn test_q_agent_plays_legal_moves() {
        let table = ValueTable::new();
        let learner = QLearner::new(LearnerConfig {
            lookahead_depth: 1,
            ..Default::default()
        });
        let mut agent = QAgent::with_seed(&table, learner, 5);
        let mut state = GameState::initial();
        let mut training = false;
        while !state.is_terminal() {
            let action = agent.select_action(&state, training).unwrap();
            assert!(legal_moves(&state).contains(&action));
            state.apply(action).unwrap();
            training = !training;
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_q_agent_name() {
        let table = ValueTable::new();
        let agent = QAgent::new(&table, QLearner::default());
        assert_eq!(agent.name(), "Q-table");
    }
}
