#![forbid(unsafe_code)]

//! serde_json backed diff engine.
//!
//! [`JsonDiffEngine`] works for any state type that round-trips through
//! `serde_json::Value`. Producing a transition clones the base state into a
//! draft, runs the recipe on the draft, then diffs the JSON trees of base and
//! draft in both directions. Applying patches serializes the state, patches
//! the tree and deserializes the result.

pub mod apply;
pub mod diff;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::engine::{DiffEngine, Partialize, Produced};
use crate::error::DiffError;
use crate::mutation::Mutation;
use crate::patch::Patch;

pub use apply::{apply_op, apply_ops, apply_patch};
pub use diff::diff;

/// Structural diff engine over serde_json trees.
///
/// Construct one at startup with [`JsonDiffEngine::new`] and hand it to the
/// middleware; there is no process-wide switch to flip first.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDiffEngine {
    _private: (),
}

impl JsonDiffEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

fn to_tree<T: Serialize>(value: &T) -> Result<Value, DiffError> {
    serde_json::to_value(value).map_err(DiffError::Serialize)
}

impl<T> DiffEngine<T> for JsonDiffEngine
where
    T: Clone + Serialize + DeserializeOwned + 'static,
{
    fn produce_with_patches(
        &self,
        base: &T,
        mutation: Mutation<T>,
        partialize: Option<&Partialize>,
    ) -> Result<Produced<T>, DiffError> {
        let recipe = mutation.into_recipe();
        let mut draft = base.clone();
        recipe(&mut draft)?;

        let mut before = to_tree(base)?;
        let mut after = to_tree(&draft)?;
        if let Some(project) = partialize {
            before = project(&before);
            after = project(&after);
        }

        let forward = diff::diff(&before, &after);
        let inverse = diff::diff(&after, &before);
        trace!(
            forward_ops = forward.len(),
            inverse_ops = inverse.len(),
            "produced patches"
        );
        Ok(Produced {
            next: draft,
            forward,
            inverse,
        })
    }

    fn apply_patches(&self, base: &T, patches: &[Patch]) -> Result<T, DiffError> {
        if patches.is_empty() {
            return Ok(base.clone());
        }
        let mut tree = to_tree(base)?;
        apply::apply_ops(&mut tree, patches)?;
        serde_json::from_value(tree).map_err(DiffError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde::Deserialize;
    use serde_json::json;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct AppState {
        user: User,
        count: i64,
        tags: Vec<String>,
    }

    fn state() -> AppState {
        AppState {
            user: User {
                name: "Bob".into(),
                age: 25,
            },
            count: 1,
            tags: vec!["a".into()],
        }
    }

    #[test]
    fn transform_produces_field_level_patches() {
        let engine = JsonDiffEngine::new();
        let base = state();
        let produced = engine
            .produce_with_patches(
                &base,
                Mutation::transform(|s: &mut AppState| {
                    s.user.name = "Alice".into();
                    s.count = 2;
                }),
                None,
            )
            .unwrap();

        assert_eq!(produced.next.user.name, "Alice");
        assert_eq!(produced.next.count, 2);
        assert_eq!(base.count, 1, "base must not be touched");
        assert_eq!(
            produced.forward,
            vec![
                Patch::replace(path!["count"], json!(2)),
                Patch::replace(path!["user", "name"], json!("Alice")),
            ]
        );
        assert_eq!(
            produced.inverse,
            vec![
                Patch::replace(path!["count"], json!(1)),
                Patch::replace(path!["user", "name"], json!("Bob")),
            ]
        );
    }

    #[test]
    fn replace_and_transform_agree() {
        let engine = JsonDiffEngine::new();
        let base = state();
        let by_replace = engine
            .produce_with_patches(
                &base,
                Mutation::replace(json!({"count": 5})).unwrap(),
                None,
            )
            .unwrap();
        let by_transform = engine
            .produce_with_patches(&base, Mutation::transform(|s: &mut AppState| s.count = 5), None)
            .unwrap();
        assert_eq!(by_replace, by_transform);
    }

    #[test]
    fn failing_recipe_produces_nothing() {
        let engine = JsonDiffEngine::new();
        let err = engine
            .produce_with_patches(
                &state(),
                Mutation::try_transform(|_: &mut AppState| Err(DiffError::mutation("nope"))),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, DiffError::Mutation(msg) if msg == "nope"));
    }

    #[test]
    fn apply_inverse_restores_base() {
        let engine = JsonDiffEngine::new();
        let base = state();
        let produced = engine
            .produce_with_patches(
                &base,
                Mutation::transform(|s: &mut AppState| {
                    s.tags.push("b".into());
                    s.user.age += 1;
                }),
                None,
            )
            .unwrap();
        let restored = engine.apply_patches(&produced.next, &produced.inverse).unwrap();
        assert_eq!(restored, base);
        let replayed = engine.apply_patches(&base, &produced.forward).unwrap();
        assert_eq!(replayed, produced.next);
    }

    #[test]
    fn partialize_limits_diffed_fields() {
        let engine = JsonDiffEngine::new();
        let only_count: Partialize = Rc::new(|tree: &Value| json!({"count": tree["count"]}));
        let produced = engine
            .produce_with_patches(
                &state(),
                Mutation::transform(|s: &mut AppState| {
                    s.count = 9;
                    s.user.name = "Zed".into();
                }),
                Some(&only_count),
            )
            .unwrap();
        assert_eq!(produced.next.user.name, "Zed");
        assert_eq!(produced.forward, vec![Patch::replace(path!["count"], json!(9))]);
    }

    #[test]
    fn patch_that_breaks_the_type_fails_to_deserialize() {
        let engine = JsonDiffEngine::new();
        let err = engine
            .apply_patches(&state(), &[Patch::replace(path!["count"], json!("x"))])
            .unwrap_err();
        assert!(matches!(err, DiffError::Deserialize(_)));
    }
}
