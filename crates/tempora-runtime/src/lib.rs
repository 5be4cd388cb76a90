#![forbid(unsafe_code)]

//! Tempora Runtime
//!
//! Single-threaded reactive store plus the temporal history middleware that
//! records, filters and replays its mutations.
//!
//! # Key Components
//!
//! - [`Store`] - shared, observable state container
//! - [`Temporal`] - store decorator recording reversible patches
//! - [`TemporalHistory`] - undo/redo/clear surface with an observable status
//! - [`PathFilter`] - include/exclude rules over patch paths
//! - [`TemporalOptions`] - limit, rules, partialize
//!
//! # Role in Tempora
//! `tempora-runtime` owns state and history. Diffing and patch application
//! are delegated to a `tempora_patch::DiffEngine`.

pub mod history;
pub mod reactive;

pub use history::{
    ConfigError, DEFAULT_LIMIT, Direction, HistoryStacks, HistoryStatus, PathFilter, Temporal,
    TemporalError, TemporalHistory, TemporalOptions, is_path_included,
};
pub use reactive::{Store, Subscription};
