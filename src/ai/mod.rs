//! Learning agent: value table, bootstrapped lookahead, explore/exploit
//! policy, and the agents used for play and evaluation.

mod agent;
mod learner;
pub mod lookahead;
mod random;
pub mod table;

pub use agent::{Agent, QAgent};
pub use learner::{LearnerConfig, QLearner};
pub use lookahead::{best_future, DEFAULT_DEPTH};
pub use random::RandomAgent;
pub use table::{ActionKey, ScratchTable, ValueStore, ValueTable};
