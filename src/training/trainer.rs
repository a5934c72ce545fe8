use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ai::{QLearner, ValueTable};
use crate::checkpoint::{CheckpointData, CheckpointManager, CheckpointMetrics};
use crate::error::{CheckpointError, TrainingError};
use crate::training::episode::{evaluate, play_self_play_episode};
use crate::training::metrics::TrainingMetrics;

/// Trainer configuration.
///
/// An `eval_interval` or `checkpoint_interval` of zero disables that step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_episodes: usize,
    pub log_interval: usize,
    pub eval_interval: usize,
    pub eval_games: usize,
    pub checkpoint_interval: usize,
    /// Fixed seed for reproducible runs; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_episodes: 10_000,
            log_interval: 100,
            eval_interval: 1000,
            eval_games: 100,
            checkpoint_interval: 5000,
            seed: None,
        }
    }
}

/// What a finished training run looked like.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    /// Episode counter after the run, including any resumed episodes.
    pub last_episode: usize,
    pub table_entries: usize,
    pub first_player_win_rate: f32,
    pub draw_rate: f32,
    /// Greedy win rate against the random agent, if evaluation is enabled.
    pub final_win_rate: Option<f32>,
}

/// Self-play trainer for the tabular learner.
pub struct Trainer {
    config: TrainerConfig,
    learner: QLearner,
    rng: StdRng,
    checkpoints: Option<CheckpointManager>,
    start_episode: usize,
}

impl Trainer {
    pub fn new(config: TrainerConfig, learner: QLearner) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Trainer {
            config,
            learner,
            rng,
            checkpoints: None,
            start_episode: 0,
        }
    }

    pub fn with_checkpoints(mut self, manager: CheckpointManager) -> Self {
        self.checkpoints = Some(manager);
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn learner(&self) -> &QLearner {
        &self.learner
    }

    /// Continue episode numbering from a loaded checkpoint. The caller
    /// trains on the checkpoint's table.
    pub fn resume_from(&mut self, data: &CheckpointData) {
        if data.metadata.learner != *self.learner.config() {
            log::warn!(
                "checkpoint {} was trained with {:?}, continuing with {:?}",
                data.path.display(),
                data.metadata.learner,
                self.learner.config()
            );
        }
        self.start_episode = data.metadata.episode;
        log::info!(
            "resuming from {} (episode {}, {} entries)",
            data.path.display(),
            data.metadata.episode,
            data.table.len()
        );
    }

    /// Load the newest checkpoint and continue numbering from it.
    ///
    /// `Ok(None)` when no checkpoint manager is attached or nothing has been
    /// saved yet. A checkpoint that exists but cannot be read is an error.
    pub fn resume_latest(&mut self) -> Result<Option<ValueTable>, TrainingError> {
        let Some(manager) = &self.checkpoints else {
            return Ok(None);
        };
        let data = match manager.load_latest() {
            Ok(data) => data,
            Err(CheckpointError::NoLatestSymlink(dir)) => {
                log::info!("no checkpoint in {}, starting fresh", dir.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        self.resume_from(&data);
        Ok(Some(data.table))
    }

    /// Run the full training loop, updating `table` in place.
    pub fn train(&mut self, table: &mut ValueTable) -> Result<TrainingSummary, TrainingError> {
        let mut metrics = TrainingMetrics::with_capacity(self.config.log_interval.max(1));

        let start_episode = self.start_episode + 1;
        let end_episode = self.start_episode + self.config.num_episodes;

        log::info!(
            "starting self-play training for {} episodes (episodes {}..={}), alpha={} depth={}",
            self.config.num_episodes,
            start_episode,
            end_episode,
            self.learner.config().alpha,
            self.learner.config().lookahead_depth
        );

        for episode in start_episode..=end_episode {
            let trace = play_self_play_episode(&self.learner, table, &mut self.rng)?;
            metrics.record_episode(trace.result);
            metrics.record_td_error(trace.td_error);

            let window = self.config.log_interval;
            if window > 0 && episode % window == 0 {
                log::info!(
                    "episode {}/{} | entries: {} | first-mover wins({}): {:.1}% | draw: {:.1}% | avg_len: {:.1} | td: {:.4}",
                    episode,
                    end_episode,
                    table.len(),
                    window,
                    metrics.first_player_win_rate(window) * 100.0,
                    metrics.draw_rate(window) * 100.0,
                    metrics.average_game_length(window),
                    metrics.average_td_error(window),
                );
            }

            if self.config.eval_interval > 0 && episode % self.config.eval_interval == 0 {
                let eval_wr = self.evaluate(table)?;
                log::info!(
                    "eval vs random ({} games): {:.1}% win rate",
                    self.config.eval_games,
                    eval_wr * 100.0
                );
            }

            if self.config.checkpoint_interval > 0
                && episode % self.config.checkpoint_interval == 0
                && self.checkpoints.is_some()
            {
                self.checkpoint(table, &metrics, episode)?;
            }
        }

        self.start_episode = end_episode;
        let final_win_rate = if self.config.eval_interval > 0 {
            let wr = self.evaluate(table)?;
            log::info!("final eval vs random: {:.1}% win rate", wr * 100.0);
            Some(wr)
        } else {
            None
        };

        let window = self.config.log_interval.max(1);
        log::info!(
            "training complete: {} episodes, {} table entries",
            metrics.total_episodes(),
            table.len()
        );

        Ok(TrainingSummary {
            last_episode: end_episode,
            table_entries: table.len(),
            first_player_win_rate: metrics.first_player_win_rate(window),
            draw_rate: metrics.draw_rate(window),
            final_win_rate,
        })
    }

    /// Greedy win rate against the random agent over `eval_games`,
    /// alternating seats.
    pub fn evaluate(&mut self, table: &ValueTable) -> Result<f32, TrainingError> {
        let seed: u64 = self.rng.random();
        evaluate(table, &self.learner, self.config.eval_games, seed)
    }

    fn checkpoint(
        &mut self,
        table: &ValueTable,
        metrics: &TrainingMetrics,
        episode: usize,
    ) -> Result<(), TrainingError> {
        let win_rate = self.evaluate(table)?;
        let Some(manager) = &self.checkpoints else {
            return Ok(());
        };
        let window = self.config.log_interval.max(1);
        let ckpt_metrics = CheckpointMetrics {
            win_rate,
            draw_rate: metrics.draw_rate(window),
            average_game_length: metrics.average_game_length(window),
            average_td_error: metrics.average_td_error(window),
            table_updates: table.updates(),
        };
        match manager.save_checkpoint(table, self.learner.config(), &ckpt_metrics, episode) {
            Ok(path) => log::info!("checkpoint saved: {}", path.display()),
            Err(e) => log::warn!("checkpoint failed: {}", e),
        }
        Ok(())
    }
}
