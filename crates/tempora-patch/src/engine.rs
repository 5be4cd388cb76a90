#![forbid(unsafe_code)]

//! The diff-engine contract consumed by the temporal history middleware.
//!
//! An engine owns two things: producing a next state together with forward
//! and inverse patches, and re-applying a patch list to a state. History code
//! only ever stores and replays what the engine hands back.

use std::rc::Rc;

use serde_json::Value;

use crate::error::DiffError;
use crate::mutation::Mutation;
use crate::patch::Patch;

/// Projection applied to both sides of a transition before diffing.
///
/// Must keep the document shape (drop fields, never rename or move them) so
/// the produced paths stay valid against the full state.
pub type Partialize = Rc<dyn Fn(&Value) -> Value>;

/// Output of [`DiffEngine::produce_with_patches`].
#[derive(Debug, Clone, PartialEq)]
pub struct Produced<T> {
    pub next: T,
    pub forward: Vec<Patch>,
    pub inverse: Vec<Patch>,
}

/// Computes and replays structural patches for state type `T`.
pub trait DiffEngine<T> {
    /// Run `mutation` against a draft of `base` and describe the transition.
    ///
    /// `base` is never modified. On error no state has been produced.
    fn produce_with_patches(
        &self,
        base: &T,
        mutation: Mutation<T>,
        partialize: Option<&Partialize>,
    ) -> Result<Produced<T>, DiffError>;

    /// Apply `patches` in order to a copy of `base`.
    ///
    /// Pure: `base` is left untouched whether or not application succeeds.
    fn apply_patches(&self, base: &T, patches: &[Patch]) -> Result<T, DiffError>;
}

impl<T, E: DiffEngine<T> + ?Sized> DiffEngine<T> for Rc<E> {
    fn produce_with_patches(
        &self,
        base: &T,
        mutation: Mutation<T>,
        partialize: Option<&Partialize>,
    ) -> Result<Produced<T>, DiffError> {
        (**self).produce_with_patches(base, mutation, partialize)
    }

    fn apply_patches(&self, base: &T, patches: &[Patch]) -> Result<T, DiffError> {
        (**self).apply_patches(base, patches)
    }
}
