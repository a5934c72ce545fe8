use std::path::Path;

use crate::ai::LearnerConfig;
use crate::checkpoint::CheckpointManagerConfig;
use crate::error::ConfigError;
use crate::training::trainer::TrainerConfig;

/// Deepest lookahead accepted from configuration.
pub const MAX_LOOKAHEAD_DEPTH: u32 = 8;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub learner: LearnerConfig,
    pub training: TrainerConfig,
    pub checkpoint: CheckpointManagerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.learner.alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::Validation(
                "learner.alpha must be in (0, 1]".into(),
            ));
        }
        if self.learner.lookahead_depth > MAX_LOOKAHEAD_DEPTH {
            return Err(ConfigError::Validation(format!(
                "learner.lookahead_depth must be <= {MAX_LOOKAHEAD_DEPTH}"
            )));
        }
        if !self.learner.midgame_reward.is_finite() {
            return Err(ConfigError::Validation(
                "learner.midgame_reward must be finite".into(),
            ));
        }
        if self.training.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }
        if self.training.eval_games == 0 {
            return Err(ConfigError::Validation(
                "training.eval_games must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[learner]
alpha = 0.25
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.learner.alpha - 0.25).abs() < 1e-9);
        assert_eq!(config.learner.lookahead_depth, 4);
        assert_eq!(config.training.num_episodes, 10_000);
        assert_eq!(config.training.seed, None);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation_rejects_zero_episodes() {
        let mut config = AppConfig::default();
        config.training.num_episodes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_log_interval() {
        let mut config = AppConfig::default();
        config.training.log_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_eval_games() {
        let mut config = AppConfig::default();
        config.training.eval_games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_alpha_out_of_range() {
        for alpha in [0.0, -0.1, 1.5, f64::NAN] {
            let mut config = AppConfig::default();
            config.learner.alpha = alpha;
            assert!(config.validate().is_err(), "alpha {alpha} accepted");
        }
        let mut config = AppConfig::default();
        config.learner.alpha = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_deep_lookahead() {
        let mut config = AppConfig::default();
        config.learner.lookahead_depth = MAX_LOOKAHEAD_DEPTH + 1;
        assert!(config.validate().is_err());
        config.learner.lookahead_depth = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_finite_reward() {
        let mut config = AppConfig::default();
        config.learner.midgame_reward = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.training.num_episodes, 10_000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[training]
num_episodes = 500
seed = 7

[checkpoint]
keep_last_n = 2
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.training.num_episodes, 500);
        assert_eq!(config.training.seed, Some(7));
        assert_eq!(config.checkpoint.keep_last_n, 2);
        assert!((config.learner.alpha - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[learner]\nalpha = 2.0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "[learner\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
