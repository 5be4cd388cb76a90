#![forbid(unsafe_code)]

//! The two ways a caller can describe a state transition.
//!
//! [`Mutation::Replace`] assigns each provided top-level field of an object
//! state; [`Mutation::Transform`] runs a recipe against a draft copy. Engines
//! never look at the variant: [`Mutation::into_recipe`] normalises both into a
//! single draft-mutating closure.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DiffError;

/// A draft-mutating closure. Runs once against a private copy of the state.
pub type Recipe<T> = Box<dyn FnOnce(&mut T) -> Result<(), DiffError>>;

/// A requested state transition.
pub enum Mutation<T> {
    /// Assign each provided top-level field; fields not listed are kept.
    Replace(Map<String, Value>),
    /// Mutate a draft of the current state.
    Transform(Recipe<T>),
}

impl<T: 'static> Mutation<T> {
    /// Infallible recipe.
    pub fn transform(f: impl FnOnce(&mut T) + 'static) -> Self {
        Self::Transform(Box::new(move |draft: &mut T| -> Result<(), DiffError> {
            f(draft);
            Ok(())
        }))
    }

    /// Recipe that may reject the transition. A rejected recipe leaves the
    /// store and the history untouched.
    pub fn try_transform(f: impl FnOnce(&mut T) -> Result<(), DiffError> + 'static) -> Self {
        Self::Transform(Box::new(f))
    }

    /// Partial replacement from an object value.
    ///
    /// Non-object values are rejected with [`DiffError::NotAnObject`].
    pub fn replace(partial: Value) -> Result<Self, DiffError> {
        match partial {
            Value::Object(fields) => Ok(Self::Replace(fields)),
            _ => Err(DiffError::NotAnObject),
        }
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Mutation<T> {
    /// Normalise into one recipe.
    ///
    /// `Replace` becomes "serialize the draft, assign the fields, deserialize
    /// back", so a replacement that does not fit `T` fails like a recipe would.
    pub fn into_recipe(self) -> Recipe<T> {
        match self {
            Self::Transform(recipe) => recipe,
            Self::Replace(fields) => Box::new(move |draft: &mut T| -> Result<(), DiffError> {
                let mut tree = serde_json::to_value(&*draft).map_err(DiffError::Serialize)?;
                let Value::Object(target) = &mut tree else {
                    return Err(DiffError::NotAnObject);
                };
                for (key, value) in fields {
                    target.insert(key, value);
                }
                *draft = serde_json::from_value(tree).map_err(DiffError::Deserialize)?;
                Ok(())
            }),
        }
    }
}

impl<T> fmt::Debug for Mutation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(fields) => f
                .debug_tuple("Replace")
                .field(&fields.keys().collect::<Vec<_>>())
                .finish(),
            Self::Transform(_) => f.debug_tuple("Transform").finish_non_exhaustive(),
        }
    }
}

impl<T> From<Map<String, Value>> for Mutation<T> {
    fn from(fields: Map<String, Value>) -> Self {
        Self::Replace(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Bears {
        bears: u32,
        name: String,
    }

    #[test]
    fn replace_assigns_only_listed_fields() {
        let mutation: Mutation<Bears> = Mutation::replace(json!({"bears": 3})).expect("object");
        let mut draft = Bears {
            bears: 0,
            name: "grizzly".into(),
        };
        (mutation.into_recipe())(&mut draft).expect("recipe");
        assert_eq!(draft.bears, 3);
        assert_eq!(draft.name, "grizzly");
    }

    #[test]
    fn replace_rejects_non_object() {
        let err = Mutation::<Bears>::replace(json!(5)).expect_err("scalar");
        assert!(matches!(err, DiffError::NotAnObject));
    }

    #[test]
    fn replace_with_wrong_shape_fails_to_deserialize() {
        let mutation: Mutation<Bears> =
            Mutation::replace(json!({"bears": "many"})).expect("object");
        let mut draft = Bears {
            bears: 0,
            name: String::new(),
        };
        let err = (mutation.into_recipe())(&mut draft).expect_err("type mismatch");
        assert!(matches!(err, DiffError::Deserialize(_)));
    }

    #[test]
    fn transform_runs_against_draft() {
        let mutation = Mutation::transform(|d: &mut Bears| d.bears += 1);
        let mut draft = Bears {
            bears: 1,
            name: String::new(),
        };
        (mutation.into_recipe())(&mut draft).expect("recipe");
        assert_eq!(draft.bears, 2);
    }

    #[test]
    fn debug_lists_replaced_keys() {
        let mutation: Mutation<Bears> = Mutation::replace(json!({"bears": 1})).expect("object");
        assert!(format!("{mutation:?}").contains("bears"));
    }
}
