use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{legal_moves, GameState, MoveError};

use super::lookahead::{best_future, DEFAULT_DEPTH};
use super::table::{ScratchTable, ValueStore, ValueTable};

/// Tabular learner hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// TD step size.
    pub alpha: f64,
    /// Half-moves searched by the bootstrapped lookahead.
    pub lookahead_depth: u32,
    /// Reward credited to every non-terminal move.
    pub midgame_reward: f64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        LearnerConfig {
            alpha: 0.1,
            lookahead_depth: DEFAULT_DEPTH,
            midgame_reward: 1.0,
        }
    }
}

/// Action selection and value updates over a [`ValueTable`] owned by the
/// caller.
#[derive(Debug, Clone)]
pub struct QLearner {
    config: LearnerConfig,
}

impl QLearner {
    pub fn new(config: LearnerConfig) -> Self {
        QLearner { config }
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Training-mode choice: uniform among candidates whose value is still
    /// zero, or among all candidates once every one has been valued.
    pub fn explore<R: Rng + ?Sized>(
        &self,
        table: &ValueTable,
        state: &GameState,
        rng: &mut R,
    ) -> Result<usize, MoveError> {
        let candidates = legal_moves(state);
        if candidates.is_empty() {
            return Err(MoveError::GameOver);
        }
        let key = state.key();
        let unvisited: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&col| table.get(&key, col) == 0.0)
            .collect();
        let pool = if unvisited.is_empty() {
            &candidates
        } else {
            &unvisited
        };
        Ok(pool[rng.random_range(0..pool.len())])
    }

    /// Play-mode scores for each candidate. Unvisited candidates are scored
    /// by lookahead; the table itself is left untouched.
    pub fn action_values(
        &self,
        table: &ValueTable,
        state: &GameState,
    ) -> Result<Vec<(usize, f64)>, MoveError> {
        let candidates = legal_moves(state);
        if candidates.is_empty() {
            return Err(MoveError::GameOver);
        }
        let key = state.key();
        let mut scratch = ScratchTable::new(table);
        let mut scored = Vec::with_capacity(candidates.len());
        for col in candidates {
            let mut value = scratch.value(&key, col);
            if value == 0.0 {
                value = best_future(
                    &mut scratch,
                    state,
                    col,
                    self.config.lookahead_depth,
                    self.config.alpha,
                )?;
            }
            scored.push((col, value));
        }
        Ok(scored)
    }

    /// Play-mode choice: the candidate with the strictly greatest value,
    /// first candidate on ties.
    pub fn exploit(&self, table: &ValueTable, state: &GameState) -> Result<usize, MoveError> {
        let scored = self.action_values(table, state)?;
        let mut best = scored[0];
        for &(col, value) in &scored[1..] {
            if value > best.1 {
                best = (col, value);
            }
        }
        Ok(best.0)
    }

    /// TD update of `(state, action)` toward `reward` plus the bootstrapped
    /// lookahead estimate. Returns the change in the stored value.
    pub fn reinforce(
        &self,
        table: &mut ValueTable,
        state: &GameState,
        action: usize,
        reward: f64,
    ) -> Result<f64, MoveError> {
        let future = best_future(
            table,
            state,
            action,
            self.config.lookahead_depth,
            self.config.alpha,
        )?;
        Ok(table.update(&state.key(), action, reward, future, self.config.alpha))
    }
}

impl Default for QLearner {
    fn default() -> Self {
        Self::new(LearnerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player::{Red as R, Yellow as Y};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shallow(depth: u32) -> QLearner {
        QLearner::new(LearnerConfig {
            alpha: 0.5,
            lookahead_depth: depth,
            midgame_reward: 1.0,
        })
    }

    #[test]
    fn test_explore_prefers_unvisited() {
        let learner = shallow(1);
        let state = GameState::initial();
        let mut table = ValueTable::new();
        for col in [0, 1, 2, 4, 5, 6] {
            table.update(&state.key(), col, 1.0, 0.0, 0.5);
        }
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(learner.explore(&table, &state, &mut rng).unwrap(), 3);
        }
    }

    #[test]
    fn test_explore_falls_back_when_all_visited() {
        let learner = shallow(1);
        let state = GameState::initial();
        let mut table = ValueTable::new();
        for col in 0..7 {
            table.update(&state.key(), col, -1.0, 0.0, 0.5);
        }
        let mut rng = StdRng::seed_from_u64(2);
        let mut seen = [false; 7];
        for _ in 0..200 {
            seen[learner.explore(&table, &state, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_explore_respects_filter() {
        let learner = shallow(1);
        let state = GameState::from_position(&[&[], &[R], &[R], &[R], &[], &[Y, Y], &[Y]], R)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(learner.explore(&ValueTable::new(), &state, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_exploit_picks_greatest() {
        let learner = shallow(0);
        let state = GameState::initial();
        let mut table = ValueTable::new();
        table.update(&state.key(), 2, 1.0, 0.0, 0.5); // 0.5
        table.update(&state.key(), 5, 1.0, 0.5, 0.5); // 0.75
        table.update(&state.key(), 0, -1.0, 0.0, 0.5); // -0.5
        assert_eq!(learner.exploit(&table, &state).unwrap(), 5);
    }

    #[test]
    fn test_exploit_ties_take_first() {
        let learner = shallow(0);
        let state = GameState::initial();
        let mut table = ValueTable::new();
        for col in 0..7 {
            table.update(&state.key(), col, -1.0, 0.0, 0.5);
        }
        assert_eq!(learner.exploit(&table, &state).unwrap(), 0);
    }

    #[test]
    fn test_exploit_uses_lookahead_for_unvisited() {
        let learner = shallow(1);
        let state = GameState::initial();
        let mut table = ValueTable::new();
        // Every candidate but column 4 looks bad
        for col in [0, 1, 2, 3, 5, 6] {
            table.update(&state.key(), col, -1.0, 0.0, 0.5);
        }
        // Yellow's best reply after column 4 is worth -0.5 to Yellow
        let after = state.after(4).unwrap();
        for col in 0..7 {
            table.update(&after.key(), col, -1.0, 0.0, 0.5);
        }
        let scored = learner.action_values(&table, &state).unwrap();
        let four = scored.iter().find(|(c, _)| *c == 4).unwrap().1;
        assert!((four - 0.5).abs() < 1e-12);
        assert_eq!(learner.exploit(&table, &state).unwrap(), 4);
        assert_eq!(table.len(), 13);
    }

    #[test]
    fn test_terminal_state_is_rejected() {
        let learner = shallow(1);
        let mut state = GameState::initial();
        for col in [3, 0, 3, 0, 3, 0, 3] {
            state.apply(col).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(4);
        let table = ValueTable::new();
        assert_eq!(
            learner.explore(&table, &state, &mut rng),
            Err(MoveError::GameOver)
        );
        assert_eq!(learner.exploit(&table, &state), Err(MoveError::GameOver));
    }

    #[test]
    fn test_reinforce_adds_future() {
        let learner = shallow(1);
        let state = GameState::initial();
        let after = state.after(3).unwrap();
        let mut table = ValueTable::new();
        table.update(&after.key(), 3, 1.0, 0.0, 0.5); // opponent's best reply: 0.5

        // 0 + 0.5 * (1.0 - 0.5 - 0)
        let delta = learner.reinforce(&mut table, &state, 3, 1.0).unwrap();
        assert!((table.get(&state.key(), 3) - 0.25).abs() < 1e-12);
        assert!((delta - 0.25).abs() < 1e-12);
    }
}
