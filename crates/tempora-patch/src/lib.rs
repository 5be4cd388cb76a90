#![forbid(unsafe_code)]

//! Tempora patch layer.
//!
//! Data model and diff-engine contract shared by the Tempora history runtime:
//!
//! - [`Path`] / [`PathToken`] - locations inside a nested state tree
//! - [`Patch`] / [`PatchPair`] - atomic changes and recorded transitions
//! - [`Mutation`] - replace-some-fields or mutate-a-draft requests
//! - [`DiffEngine`] - produce patches for a mutation, re-apply patches
//! - [`JsonDiffEngine`] - the serde_json structural engine
//!
//! # Role in Tempora
//! `tempora-runtime` wraps a store with undo/redo history and never computes
//! a diff itself; everything it records and replays comes from a
//! [`DiffEngine`] defined here.

pub mod engine;
pub mod error;
pub mod json;
pub mod mutation;
pub mod patch;
pub mod path;

pub use engine::{DiffEngine, Partialize, Produced};
pub use error::DiffError;
pub use json::JsonDiffEngine;
pub use mutation::{Mutation, Recipe};
pub use patch::{Patch, PatchOp, PatchPair};
pub use path::{Path, PathToken};
