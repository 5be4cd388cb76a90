#![forbid(unsafe_code)]

//! Patch operations and forward/inverse pairs.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::Path;

/// Kind of an atomic change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Insert a new object field or array element.
    Add,
    /// Delete an existing object field or array element.
    Remove,
    /// Overwrite an existing value.
    Replace,
}

impl PatchOp {
    /// RFC 6902 operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic change to a state tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub op: PatchOp,
    pub path: Path,
    /// New value for `add`/`replace`; absent for `remove`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Patch {
    #[must_use]
    pub fn add(path: impl Into<Path>, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    #[must_use]
    pub fn remove(path: impl Into<Path>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn replace(path: impl Into<Path>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value),
        }
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} = {value}", self.op, self.path),
            None => write!(f, "{} {}", self.op, self.path),
        }
    }
}

/// A recorded state transition and its exact reversal.
///
/// # Invariants
///
/// 1. Applying `forward` to the pre-transition state yields the
///    post-transition state.
/// 2. Applying `inverse` to the post-transition state yields the
///    pre-transition state.
///
/// Both hold after filtering, restricted to the fields whose operations were
/// retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchPair {
    pub forward: Vec<Patch>,
    pub inverse: Vec<Patch>,
}

impl PatchPair {
    #[must_use]
    pub fn new(forward: Vec<Patch>, inverse: Vec<Patch>) -> Self {
        Self { forward, inverse }
    }

    /// `true` when neither direction carries an operation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.inverse.is_empty()
    }

    /// Total number of operations in both directions.
    #[must_use]
    pub fn op_count(&self) -> usize {
        self.forward.len() + self.inverse.len()
    }
}
