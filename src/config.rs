use log::warn;
use serde::Deserialize;

use std::path::{Path, PathBuf};

use crate::{error::ConfigError, solver::DEFAULT_DEPTH};

/// The deepest search the configuration accepts
pub const MAX_SEARCH_DEPTH: u32 = 6;

/// Engine and front-end settings, loadable from TOML
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plies searched after each candidate reply
    pub search_depth: u32,
    /// Pause before the opponent's half-move in interactive play
    pub opponent_delay_ms: u64,
    /// Seed for the tie-breaking RNG, from entropy when absent
    pub seed: Option<u64>,
    /// Extra opening book records added to the built-in replies
    pub opening_book: Option<PathBuf>,
    pub self_play_episodes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_depth: DEFAULT_DEPTH,
            opponent_delay_ms: 500,
            seed: None,
            opening_book: None,
            self_play_episodes: 1000,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search_depth must be <= {}",
                MAX_SEARCH_DEPTH
            )));
        }
        if self.self_play_episodes == 0 {
            return Err(ConfigError::Validation(
                "self_play_episodes must be > 0".into(),
            ));
        }
        Ok(())
    }
}
