//! Self-play training loop, evaluation, and rolling metrics.

pub mod episode;
pub mod metrics;
pub mod trainer;

pub use episode::{evaluate, play_eval_game, play_self_play_episode, EpisodeTrace};
pub use metrics::{EpisodeResult, TrainingMetrics};
pub use trainer::{Trainer, TrainerConfig, TrainingSummary};
