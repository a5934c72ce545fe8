use serde::{Deserialize, Serialize};

use crate::ai::LearnerConfig;

/// Metrics snapshot at checkpoint time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetrics {
    /// Greedy win rate against the random agent.
    pub win_rate: f32,
    pub draw_rate: f32,
    pub average_game_length: f32,
    pub average_td_error: f64,
    pub table_updates: u64,
}

/// Top-level checkpoint metadata written to metadata.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub episode: usize,
    pub timestamp: u64,
    pub table_entries: usize,
    pub learner: LearnerConfig,
    pub metrics: CheckpointMetrics,
}
