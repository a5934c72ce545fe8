use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tabular_connect_four::ai::{QLearner, ValueTable};
use tabular_connect_four::checkpoint::CheckpointManager;
use tabular_connect_four::config::AppConfig;
use tabular_connect_four::training::Trainer;

/// Train a tabular Connect Four agent via self-play.
#[derive(Parser)]
#[command(name = "train", about = "Train a tabular Connect Four agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Override the TD step size
    #[arg(long)]
    alpha: Option<f64>,

    /// Override the lookahead depth in half-moves
    #[arg(long)]
    depth: Option<u32>,

    /// Seed the self-play RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Resume training from the latest checkpoint
    #[arg(long)]
    resume: bool,

    /// Write the trained table as a flat JSON document
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Some(episodes) = cli.episodes {
        app_config.training.num_episodes = episodes;
    }
    if let Some(alpha) = cli.alpha {
        app_config.learner.alpha = alpha;
    }
    if let Some(depth) = cli.depth {
        app_config.learner.lookahead_depth = depth;
    }
    if cli.seed.is_some() {
        app_config.training.seed = cli.seed;
    }
    app_config
        .validate()
        .context("invalid configuration after command-line overrides")?;

    let manager = CheckpointManager::new(app_config.checkpoint.clone());
    let mut trainer = Trainer::new(
        app_config.training.clone(),
        QLearner::new(app_config.learner.clone()),
    )
    .with_checkpoints(manager);

    let mut table = ValueTable::new();
    if cli.resume {
        if let Some(restored) = trainer
            .resume_latest()
            .context("resuming from the latest checkpoint")?
        {
            table = restored;
        }
    }

    let summary = trainer.train(&mut table).context("training failed")?;
    log::info!(
        "finished at episode {} with {} entries",
        summary.last_episode,
        summary.table_entries
    );

    if let Some(path) = cli.export {
        table
            .save_json(&path)
            .with_context(|| format!("exporting table to {}", path.display()))?;
        log::info!("exported {} entries to {}", table.len(), path.display());
    }

    Ok(())
}
