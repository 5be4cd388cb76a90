#![forbid(unsafe_code)]

//! Hierarchical path filtering for recorded patches.
//!
//! Decides, per patch operation, whether the change participates in history.
//! Rules are [`Path`]s matched by prefix: a rule covers a candidate when the
//! rule's tokens equal the candidate's leading tokens.
//!
//! # Resolution order
//!
//! ```text
//! exclude absent?            -> keep   (include never consulted)
//! exclude covers candidate?  -> drop
//! include present?           -> keep iff include covers candidate
//! otherwise                  -> keep
//! ```
//!
//! Empty rule sets are "present but matching nothing": an empty `exclude`
//! enables the include check, an empty `include` drops everything not
//! already excluded.

use tempora_patch::{Patch, PatchPair, Path, PathToken};

/// `true` if `rule` is an element-wise prefix of `candidate`.
#[must_use]
pub fn covers(rule: &[PathToken], candidate: &[PathToken]) -> bool {
    candidate.starts_with(rule)
}

/// Whether a patch touching `candidate` is retained under the given rules.
#[must_use]
pub fn is_path_included(
    candidate: &[PathToken],
    exclude: Option<&[Path]>,
    include: Option<&[Path]>,
) -> bool {
    let Some(exclude) = exclude else {
        return true;
    };
    if exclude.iter().any(|rule| covers(rule, candidate)) {
        return false;
    }
    match include {
        Some(include) => include.iter().any(|rule| covers(rule, candidate)),
        None => true,
    }
}

/// Owned include/exclude rule sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    exclude: Option<Vec<Path>>,
    include: Option<Vec<Path>>,
}

impl PathFilter {
    #[must_use]
    pub fn new(exclude: Option<Vec<Path>>, include: Option<Vec<Path>>) -> Self {
        Self { exclude, include }
    }

    /// No rules: every patch is retained.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.exclude.is_none()
    }

    #[must_use]
    pub fn exclude(&self) -> Option<&[Path]> {
        self.exclude.as_deref()
    }

    #[must_use]
    pub fn include(&self) -> Option<&[Path]> {
        self.include.as_deref()
    }

    #[must_use]
    pub fn retains_path(&self, candidate: &[PathToken]) -> bool {
        is_path_included(candidate, self.exclude(), self.include())
    }

    #[must_use]
    pub fn retains(&self, patch: &Patch) -> bool {
        self.retains_path(&patch.path)
    }

    /// Filter forward and inverse lists independently with the same rules.
    ///
    /// Whole operations are dropped; retained ones are moved unchanged.
    #[must_use]
    pub fn filter_pair(&self, pair: PatchPair) -> PatchPair {
        if self.is_pass_through() {
            return pair;
        }
        let PatchPair { forward, inverse } = pair;
        PatchPair {
            forward: forward.into_iter().filter(|p| self.retains(p)).collect(),
            inverse: inverse.into_iter().filter(|p| self.retains(p)).collect(),
        }
    }
}
