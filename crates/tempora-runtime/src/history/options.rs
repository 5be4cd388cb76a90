#![forbid(unsafe_code)]

//! Temporal middleware options.
//!
//! Every option has a default, so `TemporalOptions::default()` gives a
//! ten-entry history that records every field.
//!
//! # Loading
//!
//! With the `options-config` feature the serializable part can be loaded as
//! data:
//!
//! ```toml
//! # tempora.toml
//! limit = 25
//! exclude = [["user", "name"], ["items", 0]]
//! include = [["settings"]]
//! ```
//!
//! ```rust,ignore
//! let options = TemporalOptions::from_toml_file("tempora.toml")?;
//! let options = TemporalOptions::from_json_str(json)?;
//! ```
//!
//! `partialize` is code, not data, and is never serialized.

use std::fmt;
#[cfg(feature = "options-config")]
use std::path::Path as FsPath;

#[cfg(feature = "options-config")]
use serde::{Deserialize, Serialize};
use tempora_patch::{Partialize, Path};

#[cfg(feature = "options-config")]
use super::error::ConfigError;
use super::error::TemporalError;
use super::path_filter::PathFilter;
use super::stacks::DEFAULT_LIMIT;

/// Construction options for [`Temporal`](super::temporal::Temporal).
#[derive(Clone)]
#[cfg_attr(feature = "options-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "options-config", serde(default))]
pub struct TemporalOptions {
    /// Maximum retained undo entries. Must be at least 1.
    pub limit: usize,
    /// Exclude rules. `None` disables filtering entirely.
    #[cfg_attr(feature = "options-config", serde(skip_serializing_if = "Option::is_none"))]
    pub exclude: Option<Vec<Path>>,
    /// Include rules, consulted only when `exclude` is present.
    #[cfg_attr(feature = "options-config", serde(skip_serializing_if = "Option::is_none"))]
    pub include: Option<Vec<Path>>,
    /// Skip recording transitions whose filtered patches are empty.
    pub skip_empty: bool,
    /// Projection applied to both sides of a transition before diffing.
    #[cfg_attr(feature = "options-config", serde(skip))]
    pub partialize: Option<Partialize>,
}

impl Default for TemporalOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            exclude: None,
            include: None,
            skip_empty: false,
            partialize: None,
        }
    }
}

impl fmt::Debug for TemporalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporalOptions")
            .field("limit", &self.limit)
            .field("exclude", &self.exclude)
            .field("include", &self.include)
            .field("skip_empty", &self.skip_empty)
            .field("partialize", &self.partialize.is_some())
            .finish()
    }
}

impl TemporalOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_exclude(mut self, rules: impl IntoIterator<Item = Path>) -> Self {
        self.exclude = Some(rules.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_include(mut self, rules: impl IntoIterator<Item = Path>) -> Self {
        self.include = Some(rules.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    #[must_use]
    pub fn with_partialize(mut self, partialize: Partialize) -> Self {
        self.partialize = Some(partialize);
        self
    }

    /// Reject values that can never work.
    pub fn validate(&self) -> Result<(), TemporalError> {
        if self.limit == 0 {
            return Err(TemporalError::InvalidLimit(self.limit));
        }
        Ok(())
    }

    /// Rule sets as a [`PathFilter`].
    #[must_use]
    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(self.exclude.clone(), self.include.clone())
    }

    /// Load from a TOML string.
    #[cfg(feature = "options-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "options-config")]
    pub fn from_toml_file(path: impl AsRef<FsPath>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "options-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize the data part to TOML.
    #[cfg(feature = "options-config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
