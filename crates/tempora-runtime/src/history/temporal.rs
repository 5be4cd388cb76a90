#![forbid(unsafe_code)]

//! Temporal history middleware.
//!
//! [`Temporal`] decorates a [`Store`] with filtered, bounded undo/redo. Every
//! mutation goes through [`Temporal::set`]:
//!
//! ```text
//! set(mutation)
//!   previous = store.get()
//!   (next, forward, inverse) = engine.produce_with_patches(previous, mutation)
//!   pair = filter(forward), filter(inverse)  same rules, independently
//!   stacks.record(pair)                      evict oldest, clear redo
//!   store.set(next)                          single commit, then notify
//! ```
//!
//! The sibling [`TemporalHistory`] handle replays recorded pairs against the
//! store's *live* value: undo applies `inverse` and moves the pair to the
//! redo stack, redo applies `forward` and moves it back.
//!
//! # Failure Modes
//!
//! - **Rejected mutation**: the engine error is returned as
//!   [`TemporalError::Diff`]; nothing is committed and no stack changes.
//! - **Replay failure**: the failing pair is put back on the stack it was
//!   popped from and the store keeps the value it had before that step.
//!   Steps completed earlier in the same call are kept.
//! - **Foreign writes**: writing to the wrapped [`Store`] directly bypasses
//!   history. Later replays still target the live value, so they either
//!   apply cleanly to the untouched fields or fail as above.
//! - **Re-entrant calls**: stacks are updated before the store write, so a
//!   subscriber that commits or replays from inside a notification sees a
//!   history that already includes the outer step.
//! - **Borrow panic**: calling a mutating method from inside
//!   [`Temporal::with`] panics, because the state is still borrowed.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tempora_patch::{
    DiffEngine, DiffError, JsonDiffEngine, Mutation, Partialize, PatchPair, Produced,
};
use tracing::{debug, debug_span, field, trace, warn};

use super::error::{Direction, TemporalError};
use super::options::TemporalOptions;
use super::path_filter::PathFilter;
use super::stacks::HistoryStacks;
use crate::reactive::{Store, Subscription};

/// Depth of both stacks, published after every history change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HistoryStatus {
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl HistoryStatus {
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_depth > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.redo_depth > 0
    }
}

struct TemporalCore<T, E> {
    store: Store<T>,
    engine: E,
    filter: PathFilter,
    partialize: Option<Partialize>,
    skip_empty: bool,
    stacks: RefCell<HistoryStacks>,
    status: Store<HistoryStatus>,
}

impl<T, E> TemporalCore<T, E> {
    fn snapshot_status(&self) -> HistoryStatus {
        let stacks = self.stacks.borrow();
        HistoryStatus {
            undo_depth: stacks.undo_depth(),
            redo_depth: stacks.redo_depth(),
        }
    }

    /// Publish depths. Must be called with no stack borrow outstanding so
    /// status subscribers can read the history.
    fn publish_status(&self) {
        let status = self.snapshot_status();
        self.status.set(status);
    }
}

/// A store whose mutations are recorded as reversible patches.
///
/// Cloning creates another handle to the same store and history.
pub struct Temporal<T, E = JsonDiffEngine> {
    core: Rc<TemporalCore<T, E>>,
}

impl<T, E> Clone for Temporal<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T, E> fmt::Debug for Temporal<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.core.snapshot_status();
        f.debug_struct("Temporal")
            .field("undo_depth", &status.undo_depth)
            .field("redo_depth", &status.redo_depth)
            .field("filter", &self.core.filter)
            .finish_non_exhaustive()
    }
}

impl<T> Temporal<T, JsonDiffEngine>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned + 'static,
{
    /// New store holding `initial`, diffed by [`JsonDiffEngine`].
    pub fn json(initial: T, options: TemporalOptions) -> Result<Self, TemporalError> {
        Self::wrap(Store::new(initial), JsonDiffEngine::new(), options)
    }
}

impl<T, E> Temporal<T, E>
where
    T: Clone + PartialEq + 'static,
    E: DiffEngine<T>,
{
    /// Decorate `store` with history.
    ///
    /// Options are validated here, not on first use.
    pub fn wrap(store: Store<T>, engine: E, options: TemporalOptions) -> Result<Self, TemporalError> {
        options.validate()?;
        let stacks = HistoryStacks::new(options.limit)?;
        let filter = options.path_filter();
        debug!(
            limit = options.limit,
            filtered = !filter.is_pass_through(),
            partialized = options.partialize.is_some(),
            "temporal history attached"
        );
        Ok(Self {
            core: Rc::new(TemporalCore {
                store,
                engine,
                filter,
                partialize: options.partialize,
                skip_empty: options.skip_empty,
                stacks: RefCell::new(stacks),
                status: Store::new(HistoryStatus::default()),
            }),
        })
    }

    // ========================================================================
    // Store surface
    // ========================================================================

    /// Clone of the current state.
    #[must_use]
    pub fn get(&self) -> T {
        self.core.store.get()
    }

    /// Borrow the current state for the duration of `f`.
    ///
    /// `f` must not mutate this store (`set`, `update`, `undo`, ...): the
    /// borrow is held while it runs and the write would panic. Use
    /// [`get`](Self::get) when the closure needs to commit.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.core.store.with(f)
    }

    /// Subscribe to committed state changes (mutations, undos and redos).
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.core.store.subscribe(callback)
    }

    /// Version of the wrapped store.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.core.store.version()
    }

    /// The wrapped store. Writes made through it are not recorded.
    #[must_use]
    pub fn store(&self) -> &Store<T> {
        &self.core.store
    }

    /// Handle exposing undo/redo/clear for this store.
    #[must_use]
    pub fn history(&self) -> TemporalHistory<T, E> {
        TemporalHistory {
            core: Rc::clone(&self.core),
        }
    }

    // ========================================================================
    // Mutation interception
    // ========================================================================

    /// Commit `mutation` and record its filtered patches.
    ///
    /// Atomic on failure: an engine error leaves the store and both stacks
    /// exactly as they were.
    pub fn set(&self, mutation: Mutation<T>) -> Result<(), TemporalError> {
        let core = &self.core;
        let span = debug_span!(
            "temporal.commit",
            forward_ops = field::Empty,
            inverse_ops = field::Empty,
            dropped_ops = field::Empty,
            undo_depth = field::Empty,
            redo_depth = field::Empty,
        );
        let _guard = span.enter();

        let previous = core.store.get();
        let Produced {
            next,
            forward,
            inverse,
        } = core
            .engine
            .produce_with_patches(&previous, mutation, core.partialize.as_ref())
            .map_err(|err| {
                debug!(error = %err, "mutation rejected");
                TemporalError::Diff(err)
            })?;

        let recorded_ops = forward.len() + inverse.len();
        let pair = core.filter.filter_pair(PatchPair::new(forward, inverse));
        span.record("forward_ops", pair.forward.len() as u64);
        span.record("inverse_ops", pair.inverse.len() as u64);
        span.record("dropped_ops", (recorded_ops - pair.op_count()) as u64);

        if core.skip_empty && pair.is_empty() {
            trace!("nothing tracked changed; history untouched");
            core.store.set(next);
            return Ok(());
        }

        // Stacks first: subscribers woken by the write may commit or replay.
        let evicted = core.stacks.borrow_mut().record(pair);
        if evicted > 0 {
            trace!(evicted, "evicted oldest history entries");
        }
        let status = core.snapshot_status();
        span.record("undo_depth", status.undo_depth as u64);
        span.record("redo_depth", status.redo_depth as u64);

        core.store.set(next);
        core.publish_status();
        Ok(())
    }

    /// Assign the given top-level fields.
    pub fn set_state(&self, partial: Value) -> Result<(), TemporalError> {
        let mutation = Mutation::replace(partial).map_err(TemporalError::Diff)?;
        self.set(mutation)
    }

    /// Mutate a draft of the current state.
    pub fn update(&self, recipe: impl FnOnce(&mut T) + 'static) -> Result<(), TemporalError> {
        self.set(Mutation::transform(recipe))
    }

    /// Mutate a draft; an `Err` from `recipe` aborts without committing.
    pub fn try_update(
        &self,
        recipe: impl FnOnce(&mut T) -> Result<(), DiffError> + 'static,
    ) -> Result<(), TemporalError> {
        self.set(Mutation::try_transform(recipe))
    }
}

/// Undo/redo surface of a [`Temporal`] store.
///
/// Addressable on its own so history UI can track depth through
/// [`status`](Self::status) without subscribing to every state change.
pub struct TemporalHistory<T, E = JsonDiffEngine> {
    core: Rc<TemporalCore<T, E>>,
}

impl<T, E> Clone for TemporalHistory<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T, E> fmt::Debug for TemporalHistory<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporalHistory")
            .field("stacks", &*self.core.stacks.borrow())
            .finish()
    }
}

impl<T, E> TemporalHistory<T, E>
where
    T: Clone + PartialEq + 'static,
    E: DiffEngine<T>,
{
    /// Step back up to `steps` recorded transitions.
    ///
    /// Returns the number of steps performed; fewer than `steps` when the
    /// undo stack runs out, `0` when it was already empty.
    pub fn undo(&self, steps: usize) -> Result<usize, TemporalError> {
        self.replay(Direction::Undo, steps)
    }

    /// Step forward up to `steps` undone transitions.
    pub fn redo(&self, steps: usize) -> Result<usize, TemporalError> {
        self.replay(Direction::Redo, steps)
    }

    /// Single undo step. `Ok(false)` when there was nothing to undo.
    pub fn undo_one(&self) -> Result<bool, TemporalError> {
        Ok(self.replay(Direction::Undo, 1)? == 1)
    }

    /// Single redo step. `Ok(false)` when there was nothing to redo.
    pub fn redo_one(&self) -> Result<bool, TemporalError> {
        Ok(self.replay(Direction::Redo, 1)? == 1)
    }

    /// Drop both stacks. The store's value is left as is.
    pub fn clear(&self) {
        self.core.stacks.borrow_mut().clear();
        self.core.publish_status();
        debug!("temporal history cleared");
    }

    fn replay(&self, direction: Direction, steps: usize) -> Result<usize, TemporalError> {
        if steps == 0 {
            return Err(TemporalError::InvalidSteps);
        }
        let core = &self.core;
        let span = match direction {
            Direction::Undo => debug_span!("temporal.undo", steps, applied = field::Empty),
            Direction::Redo => debug_span!("temporal.redo", steps, applied = field::Empty),
        };
        let _guard = span.enter();

        let mut applied = 0;
        while applied < steps {
            let popped = {
                let mut stacks = core.stacks.borrow_mut();
                match direction {
                    Direction::Undo => stacks.pop_undo(),
                    Direction::Redo => stacks.pop_redo(),
                }
            };
            let Some(pair) = popped else {
                break;
            };

            let patches = match direction {
                Direction::Undo => &pair.inverse,
                Direction::Redo => &pair.forward,
            };
            let current = core.store.get();
            match core.engine.apply_patches(&current, patches) {
                Ok(next) => {
                    {
                        let mut stacks = core.stacks.borrow_mut();
                        match direction {
                            Direction::Undo => stacks.push_redo(pair),
                            Direction::Redo => {
                                let evicted = stacks.push_undo(pair);
                                if evicted > 0 {
                                    trace!(evicted, "evicted oldest history entries");
                                }
                            }
                        }
                    }
                    core.store.set(next);
                    core.publish_status();
                    applied += 1;
                }
                Err(source) => {
                    warn!(
                        %direction,
                        error = %source,
                        applied,
                        "replay failed; entry restored to its stack"
                    );
                    {
                        let mut stacks = core.stacks.borrow_mut();
                        match direction {
                            Direction::Undo => stacks.restore_undo(pair),
                            Direction::Redo => stacks.restore_redo(pair),
                        }
                    }
                    core.publish_status();
                    span.record("applied", applied as u64);
                    return Err(TemporalError::Replay { direction, source });
                }
            }
        }
        span.record("applied", applied as u64);
        Ok(applied)
    }

    /// Snapshot of the undo stack (oldest first; the next undo is last).
    #[must_use]
    pub fn undo_stack(&self) -> Vec<PatchPair> {
        self.core.stacks.borrow().undo_entries().cloned().collect()
    }

    /// Snapshot of the redo stack (oldest first; the next redo is last).
    #[must_use]
    pub fn redo_stack(&self) -> Vec<PatchPair> {
        self.core.stacks.borrow().redo_entries().cloned().collect()
    }

    /// Borrow the stacks for the duration of `f` without cloning entries.
    pub fn with_stacks<R>(&self, f: impl FnOnce(&HistoryStacks) -> R) -> R {
        f(&self.core.stacks.borrow())
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.core.stacks.borrow().undo_depth()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.core.stacks.borrow().redo_depth()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.stacks.borrow().can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.core.stacks.borrow().can_redo()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.core.stacks.borrow().limit()
    }

    /// Observable depths, updated after every recorded or replayed step.
    #[must_use]
    pub fn status(&self) -> Store<HistoryStatus> {
        self.core.status.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
