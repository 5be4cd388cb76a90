#![forbid(unsafe_code)]

//! Patch-based temporal history.
//!
//! Wraps a [`Store`](crate::reactive::Store) so that every mutation is
//! recorded as a pair of forward/inverse patches, filtered by path and kept
//! in bounded undo/redo stacks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Temporal<T, E>                                               │
//! │   set(mutation) ──► DiffEngine ──► PathFilter ──► stacks     │
//! │        │                                           │         │
//! │        ▼                                           ▼         │
//! │   Store<T> ◄──────── apply_patches ◄──── TemporalHistory     │
//! │                                          undo / redo / clear │
//! │                                          status: Store<..>   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use tempora_runtime::history::{Temporal, TemporalOptions};
//!
//! let store = Temporal::json(State { count: 0 }, TemporalOptions::default())?;
//! store.update(|s| s.count += 1)?;
//! store.history().undo(1)?;
//! assert_eq!(store.get().count, 0);
//! ```
//!
//! # Module Structure
//!
//! - [`path_filter`]: include/exclude rule resolution
//! - [`stacks`]: bounded undo/redo stacks
//! - [`options`]: construction options and optional file loading
//! - [`temporal`]: the middleware and its history handle
//! - [`error`]: error types

pub mod error;
pub mod options;
pub mod path_filter;
pub mod stacks;
pub mod temporal;

pub use error::{ConfigError, Direction, TemporalError};
pub use options::TemporalOptions;
pub use path_filter::{PathFilter, covers, is_path_included};
pub use stacks::{DEFAULT_LIMIT, HistoryStacks};
pub use temporal::{HistoryStatus, Temporal, TemporalHistory};
