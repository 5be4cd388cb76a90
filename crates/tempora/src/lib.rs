#![forbid(unsafe_code)]

//! Tempora public facade crate.
//!
//! Re-exports the patch model and the history runtime, and offers a prelude
//! for day-to-day usage.
//!
//! ```ignore
//! use tempora::prelude::*;
//!
//! let store = Temporal::json(Doc::default(), TemporalOptions::default())?;
//! store.update(|d| d.title = "draft".into())?;
//! store.history().undo(1)?;
//! ```

// --- Patch re-exports ------------------------------------------------------

pub use tempora_patch::{
    DiffEngine, DiffError, JsonDiffEngine, Mutation, Partialize, Patch, PatchOp, PatchPair, Path,
    PathToken, Produced, path,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tempora_runtime::{
    ConfigError, DEFAULT_LIMIT, Direction, HistoryStacks, HistoryStatus, PathFilter, Store,
    Subscription, Temporal, TemporalError, TemporalHistory, TemporalOptions, is_path_included,
};

/// Standard result type for Tempora APIs.
pub type Result<T> = std::result::Result<T, TemporalError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Mutation, Patch, PatchPair, Path, PathToken, Result, Store, Temporal, TemporalError,
        TemporalHistory, TemporalOptions, path,
    };

    pub use crate::{patch, runtime};
}

pub use tempora_patch as patch;
pub use tempora_runtime as runtime;
