#![forbid(unsafe_code)]

//! Patch application over JSON trees (RFC 6902 `add`/`remove`/`replace`).

use serde_json::Value;

use crate::error::DiffError;
use crate::patch::{Patch, PatchOp};
use crate::path::{Path, PathToken};

/// Apply `ops` in order to a copy of `doc`.
pub fn apply_patch(doc: &Value, ops: &[Patch]) -> Result<Value, DiffError> {
    let mut doc = doc.clone();
    apply_ops(&mut doc, ops)?;
    Ok(doc)
}

/// Apply `ops` in order, in place. Stops at the first failing operation; the
/// document may then hold the effects of earlier operations.
pub fn apply_ops(doc: &mut Value, ops: &[Patch]) -> Result<(), DiffError> {
    for op in ops {
        apply_op(doc, op)?;
    }
    Ok(())
}

/// Apply a single operation in place.
pub fn apply_op(doc: &mut Value, op: &Patch) -> Result<(), DiffError> {
    match op.op {
        PatchOp::Add => apply_add(doc, &op.path, required_value(op)?),
        PatchOp::Remove => apply_remove(doc, &op.path),
        PatchOp::Replace => apply_replace(doc, &op.path, required_value(op)?),
    }
}

fn required_value(op: &Patch) -> Result<Value, DiffError> {
    op.value
        .clone()
        .ok_or_else(|| DiffError::MissingValue(op.path.clone()))
}

// ── Path navigation ───────────────────────────────────────────────────────

/// Mutable navigation to the container holding the last token of `path`.
fn parent_mut<'a, 'p>(
    doc: &'a mut Value,
    path: &'p Path,
) -> Result<(&'a mut Value, &'p PathToken), DiffError> {
    let (parent, last) = path
        .split_last()
        .ok_or_else(|| DiffError::InvalidTarget(path.clone()))?;
    let mut cursor = doc;
    for token in parent {
        cursor = match (cursor, token) {
            (Value::Object(map), PathToken::Key(key)) => map.get_mut(key),
            (Value::Array(arr), PathToken::Index(idx)) => arr.get_mut(*idx),
            _ => None,
        }
        .ok_or_else(|| DiffError::PathNotFound(path.clone()))?;
    }
    Ok((cursor, last))
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(doc: &mut Value, path: &Path, value: Value) -> Result<(), DiffError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, last) = parent_mut(doc, path)?;
    match (parent, last) {
        (Value::Object(map), PathToken::Key(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (Value::Array(arr), PathToken::Index(idx)) => {
            if *idx > arr.len() {
                return Err(DiffError::InvalidIndex(path.clone()));
            }
            arr.insert(*idx, value);
            Ok(())
        }
        _ => Err(DiffError::InvalidTarget(path.clone())),
    }
}

fn apply_remove(doc: &mut Value, path: &Path) -> Result<(), DiffError> {
    let (parent, last) = parent_mut(doc, path)?;
    match (parent, last) {
        (Value::Object(map), PathToken::Key(key)) => map
            .remove(key)
            .map(drop)
            .ok_or_else(|| DiffError::PathNotFound(path.clone())),
        (Value::Array(arr), PathToken::Index(idx)) => {
            if *idx >= arr.len() {
                return Err(DiffError::InvalidIndex(path.clone()));
            }
            arr.remove(*idx);
            Ok(())
        }
        _ => Err(DiffError::InvalidTarget(path.clone())),
    }
}

fn apply_replace(doc: &mut Value, path: &Path, value: Value) -> Result<(), DiffError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, last) = parent_mut(doc, path)?;
    match (parent, last) {
        (Value::Object(map), PathToken::Key(key)) => match map.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(DiffError::PathNotFound(path.clone())),
        },
        (Value::Array(arr), PathToken::Index(idx)) => match arr.get_mut(*idx) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(DiffError::InvalidIndex(path.clone())),
        },
        _ => Err(DiffError::InvalidTarget(path.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn add_object_field() {
        let out = apply_patch(&json!({"a": 1}), &[Patch::add(path!["b"], json!(2))]).unwrap();
        assert_eq!(out, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn add_array_element_shifts_tail() {
        let out = apply_patch(&json!([1, 3]), &[Patch::add(path![[1]], json!(2))]).unwrap();
        assert_eq!(out, json!([1, 2, 3]));
    }

    #[test]
    fn add_past_end_is_invalid_index() {
        let err = apply_patch(&json!([1]), &[Patch::add(path![[5]], json!(2))]).unwrap_err();
        assert!(matches!(err, DiffError::InvalidIndex(p) if p == path![[5]]));
    }

    #[test]
    fn remove_missing_field_is_not_found() {
        let err = apply_patch(&json!({"a": 1}), &[Patch::remove(path!["b"])]).unwrap_err();
        assert!(matches!(err, DiffError::PathNotFound(_)));
    }

    #[test]
    fn remove_root_is_invalid_target() {
        let err = apply_patch(&json!({"a": 1}), &[Patch::remove(Path::new())]).unwrap_err();
        assert!(matches!(err, DiffError::InvalidTarget(_)));
    }

    #[test]
    fn replace_requires_existing_field() {
        let err =
            apply_patch(&json!({"a": 1}), &[Patch::replace(path!["b"], json!(2))]).unwrap_err();
        assert!(matches!(err, DiffError::PathNotFound(_)));
    }

    #[test]
    fn replace_root() {
        let out = apply_patch(&json!({"a": 1}), &[Patch::replace(Path::new(), json!(7))]).unwrap();
        assert_eq!(out, json!(7));
    }

    #[test]
    fn missing_parent_is_not_found() {
        let err = apply_patch(
            &json!({"a": 1}),
            &[Patch::replace(path!["user", "name"], json!("x"))],
        )
        .unwrap_err();
        assert!(matches!(err, DiffError::PathNotFound(p) if p == path!["user", "name"]));
    }

    #[test]
    fn index_into_object_is_invalid_target() {
        let err = apply_patch(&json!({"a": 1}), &[Patch::add(path![[0]], json!(1))]).unwrap_err();
        assert!(matches!(err, DiffError::InvalidTarget(_)));
    }

    #[test]
    fn value_less_add_is_rejected() {
        let op = Patch {
            op: PatchOp::Add,
            path: path!["a"],
            value: None,
        };
        let err = apply_patch(&json!({}), &[op]).unwrap_err();
        assert!(matches!(err, DiffError::MissingValue(_)));
    }

    #[test]
    fn apply_patch_leaves_input_untouched() {
        let doc = json!({"a": 1});
        let _ = apply_patch(&doc, &[Patch::replace(path!["a"], json!(2))]).unwrap();
        assert_eq!(doc, json!({"a": 1}));
    }
}
