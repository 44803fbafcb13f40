use std::path::PathBuf;

use crate::game::TurnState;

/// Errors returned by the turn controller for calls it refuses outright.
///
/// Playing into a full column is not one of them: it loses the game instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("column {0} out of range, columns must be between 0 and 6")]
    InvalidColumn(usize),

    #[error("half-move not allowed while the game is {state:?}")]
    OutOfTurn { state: TurnState },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
