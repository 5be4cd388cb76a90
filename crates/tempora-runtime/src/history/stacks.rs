#![forbid(unsafe_code)]

//! Bounded undo/redo stacks of recorded patch pairs.
//!
//! # Invariants
//!
//! 1. `undo.len() <= limit` after every push onto the undo stack.
//! 2. Recording a new transition clears the redo stack.
//! 3. Pairs move between stacks; they are never duplicated.
//! 4. Only the undo stack evicts. The redo stack can never hold more pairs
//!    than the undo stack held before they were undone.
//!
//! # Memory Model
//!
//! Pairs are stored in `VecDeque` for O(1) eviction from the front.
//!
//! ```text
//! record(p5)
//! ┌───────────────────────────────────────┐
//! │ Undo: [p1, p2, p3, p4, p5]            │
//! │ Redo: []                              │
//! └───────────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────────┐
//! │ Undo: [p1, p2, p3]                    │
//! │ Redo: [p5, p4]                        │
//! └───────────────────────────────────────┘
//!
//! record(p6)  <-- forward progress, clears redo
//! ┌───────────────────────────────────────┐
//! │ Undo: [p1, p2, p3, p6]                │
//! │ Redo: []                              │
//! └───────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::fmt;

use tempora_patch::PatchPair;

use super::error::TemporalError;

/// Default number of retained undo entries.
pub const DEFAULT_LIMIT: usize = 10;

/// Dual stacks for undo and redo.
#[derive(Clone, PartialEq)]
pub struct HistoryStacks {
    /// Pairs available for undo (newest at back).
    undo: VecDeque<PatchPair>,
    /// Pairs available for redo (newest at back).
    redo: VecDeque<PatchPair>,
    limit: usize,
}

impl fmt::Debug for HistoryStacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStacks")
            .field("undo_depth", &self.undo.len())
            .field("redo_depth", &self.redo.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl Default for HistoryStacks {
    fn default() -> Self {
        Self::with_valid_limit(DEFAULT_LIMIT)
    }
}

impl HistoryStacks {
    /// Empty stacks retaining at most `limit` undo entries.
    ///
    /// A zero limit is rejected with [`TemporalError::InvalidLimit`].
    pub fn new(limit: usize) -> Result<Self, TemporalError> {
        if limit == 0 {
            return Err(TemporalError::InvalidLimit(limit));
        }
        Ok(Self::with_valid_limit(limit))
    }

    fn with_valid_limit(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            limit,
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Record a new transition: clears redo, pushes onto undo, evicts.
    ///
    /// Returns the number of evicted pairs.
    pub fn record(&mut self, pair: PatchPair) -> usize {
        self.redo.clear();
        self.undo.push_back(pair);
        self.enforce_limit()
    }

    /// Pop the most recent undo entry.
    pub fn pop_undo(&mut self) -> Option<PatchPair> {
        self.undo.pop_back()
    }

    /// Pop the most recent redo entry.
    pub fn pop_redo(&mut self) -> Option<PatchPair> {
        self.redo.pop_back()
    }

    /// Move an undone pair onto the redo stack. Never evicts.
    pub fn push_redo(&mut self, pair: PatchPair) {
        self.redo.push_back(pair);
    }

    /// Move a redone pair back onto the undo stack, keeping redo intact.
    ///
    /// Subject to the same eviction as [`record`](Self::record). Returns the
    /// number of evicted pairs.
    pub fn push_undo(&mut self, pair: PatchPair) -> usize {
        self.undo.push_back(pair);
        self.enforce_limit()
    }

    /// Put a pair back where it was popped from after a failed replay.
    ///
    /// The pair was just popped, so this never exceeds the limit.
    pub fn restore_undo(&mut self, pair: PatchPair) {
        self.undo.push_back(pair);
    }

    /// Redo-side counterpart of [`restore_undo`](Self::restore_undo).
    pub fn restore_redo(&mut self, pair: PatchPair) {
        self.redo.push_back(pair);
    }

    /// Clear both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    // ========================================================================
    // Info
    // ========================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl DoubleEndedIterator<Item = &PatchPair> + ExactSizeIterator {
        self.undo.iter()
    }

    /// Redo entries, oldest first (the next redo is last).
    pub fn redo_entries(&self) -> impl DoubleEndedIterator<Item = &PatchPair> + ExactSizeIterator {
        self.redo.iter()
    }

    /// Entry the next undo will replay.
    #[must_use]
    pub fn next_undo(&self) -> Option<&PatchPair> {
        self.undo.back()
    }

    /// Entry the next redo will replay.
    #[must_use]
    pub fn next_redo(&self) -> Option<&PatchPair> {
        self.redo.back()
    }

    fn enforce_limit(&mut self) -> usize {
        let mut evicted = 0;
        while self.undo.len() > self.limit {
            if self.undo.pop_front().is_some() {
                evicted += 1;
            }
        }
        evicted
    }
}

// ============================================================================
// Tests
// ============================================================================
