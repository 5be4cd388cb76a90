#![forbid(unsafe_code)]

//! Paths into nested state trees.
//!
//! A [`Path`] is an ordered sequence of [`PathToken`]s: object keys and array
//! indices. Patches produced by a diff engine locate their change with a
//! `Path`, and history filter rules are `Path`s compared by prefix.
//!
//! Serialized form is a plain JSON array mixing strings and integers, e.g.
//! `["items", 0, "title"]`.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// One step into a nested value.
///
/// `Key("0")` and `Index(0)` are distinct tokens: object keys and array
/// positions never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathToken {
    /// Array position.
    Index(usize),
    /// Object field name.
    Key(String),
}

impl PathToken {
    /// The key, if this token addresses an object field.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }

    /// The index, if this token addresses an array slot.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(idx) => Some(*idx),
            Self::Key(_) => None,
        }
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // RFC 6901 escaping so the rendered path reads as a JSON Pointer.
            Self::Key(key) => write!(f, "{}", key.replace('~', "~0").replace('/', "~1")),
            Self::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for PathToken {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathToken {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<&String> for PathToken {
    fn from(key: &String) -> Self {
        Self::Key(key.clone())
    }
}

impl From<usize> for PathToken {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}

/// Location of a value inside a nested state tree.
///
/// The empty path addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathToken>);

impl Path {
    /// The root path.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a path from any sequence of tokens.
    pub fn from_tokens(tokens: impl IntoIterator<Item = PathToken>) -> Self {
        Self(tokens.into_iter().collect())
    }

    /// Returns a new path with `token` appended.
    #[must_use]
    pub fn child(&self, token: impl Into<PathToken>) -> Self {
        let mut tokens = Vec::with_capacity(self.0.len() + 1);
        tokens.extend_from_slice(&self.0);
        tokens.push(token.into());
        Self(tokens)
    }

    /// Append a token in place.
    pub fn push(&mut self, token: impl Into<PathToken>) {
        self.0.push(token.into());
    }

    /// Split into the parent path and the final token.
    ///
    /// Returns `None` for the root path.
    #[must_use]
    pub fn split_last(&self) -> Option<(&[PathToken], &PathToken)> {
        self.0.split_last().map(|(last, parent)| (parent, last))
    }

    /// `true` if `prefix` equals this path or is an ancestor of it.
    #[must_use]
    pub fn starts_with(&self, prefix: &[PathToken]) -> bool {
        self.0.starts_with(prefix)
    }

    /// Tokens as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[PathToken] {
        &self.0
    }

    /// Consume into the underlying token vector.
    #[must_use]
    pub fn into_tokens(self) -> Vec<PathToken> {
        self.0
    }
}

impl Deref for Path {
    type Target = [PathToken];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[PathToken]> for Path {
    fn as_ref(&self) -> &[PathToken] {
        &self.0
    }
}

impl From<Vec<PathToken>> for Path {
    fn from(tokens: Vec<PathToken>) -> Self {
        Self(tokens)
    }
}

impl From<&[PathToken]> for Path {
    fn from(tokens: &[PathToken]) -> Self {
        Self(tokens.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        Self(keys.into_iter().map(PathToken::from).collect())
    }
}

impl FromIterator<PathToken> for Path {
    fn from_iter<I: IntoIterator<Item = PathToken>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathToken;
    type IntoIter = std::slice::Iter<'a, PathToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Renders as a JSON Pointer (`/user/name`, root is the empty string).
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "/{token}")?;
        }
        Ok(())
    }
}

/// Build a [`Path`] from keys and bracketed indices.
///
/// ```
/// use tempora_patch::{path, PathToken};
///
/// let p = path!["items", [0], "title"];
/// assert_eq!(p[1], PathToken::Index(0));
/// assert_eq!(p.to_string(), "/items/0/title");
/// ```
#[macro_export]
macro_rules! path {
    (@token [$idx:expr]) => {
        $crate::PathToken::Index($idx)
    };
    (@token $key:expr) => {
        $crate::PathToken::from($key)
    };
    () => {
        $crate::Path::new()
    };
    ($($seg:tt),+ $(,)?) => {
        $crate::Path::from_tokens([$($crate::path!(@token $seg)),+])
    };
}
