//! # Tabular Connect Four
//!
//! A self-play Connect Four learner that stores action values in a sparse
//! table keyed by a perspective-relative board encoding, so positions that
//! look the same to whoever is about to move share one entry.
//!
//! ## Modules
//!
//! - [`game`]: board encoding, move engine, win detection, action filter
//! - [`ai`]: value table, bootstrapped lookahead, explore/exploit policy, agents
//! - [`training`]: self-play episodes, evaluation against a random agent, metrics
//! - [`checkpoint`]: table persistence and versioning
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: structured error types

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
