#![forbid(unsafe_code)]

use std::fmt;

use tempora_patch::DiffError;
use thiserror::Error;

/// Which way a replay was travelling when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

/// Errors surfaced by the temporal history middleware.
#[derive(Debug, Error)]
pub enum TemporalError {
    /// The engine could not produce the next state. Nothing was committed.
    #[error("mutation rejected: {0}")]
    Diff(#[source] DiffError),
    /// Applying recorded patches failed. The pair was restored to its stack.
    #[error("{direction} replay failed: {source}")]
    Replay {
        direction: Direction,
        #[source]
        source: DiffError,
    },
    /// `limit` must be at least 1.
    #[error("history limit must be at least 1, got {0}")]
    InvalidLimit(usize),
    /// `undo`/`redo` called with zero steps.
    #[error("step count must be at least 1")]
    InvalidSteps,
    /// Options could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure loading [`TemporalOptions`](super::options::TemporalOptions) from
/// a file or string.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "options-config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "options-config")]
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[cfg(feature = "options-config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
