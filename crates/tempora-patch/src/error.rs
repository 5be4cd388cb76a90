#![forbid(unsafe_code)]

use thiserror::Error;

use crate::path::Path;

/// Failure while producing or applying patches.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The mutation recipe refused to run.
    #[error("mutation failed: {0}")]
    Mutation(String),
    /// State could not be converted into a JSON tree.
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    /// A JSON tree could not be converted back into the state type.
    #[error("failed to deserialize state: {0}")]
    Deserialize(#[source] serde_json::Error),
    /// A partial replacement was applied to a state that is not an object.
    #[error("partial replacement requires an object state")]
    NotAnObject,
    /// A patch addresses a location whose parent does not exist.
    #[error("path not found: {0}")]
    PathNotFound(Path),
    /// An array index is out of range for the operation.
    #[error("invalid array index at {0}")]
    InvalidIndex(Path),
    /// The token kind does not match the container (key into array, index into object, or scalar parent).
    #[error("invalid target at {0}")]
    InvalidTarget(Path),
    /// An `add` or `replace` patch carried no value.
    #[error("patch at {0} is missing its value")]
    MissingValue(Path),
}

impl DiffError {
    /// Convenience for recipes that fail with a message.
    pub fn mutation(msg: impl Into<String>) -> Self {
        Self::Mutation(msg.into())
    }
}
