#![forbid(unsafe_code)]

//! Structural diff between two JSON trees.
//!
//! Emits only `add`, `remove` and `replace`, each addressing one whole field
//! or element:
//!
//! - objects: `remove` for keys missing from `dst`, `add` for new keys,
//!   recursion into keys present on both sides;
//! - arrays: recursion over the common index range, then `add` for appended
//!   elements (ascending) or `remove` for truncated ones (descending, so each
//!   index is valid at the moment it is applied);
//! - anything else that differs: `replace` at that path.

use serde_json::{Map, Value};

use crate::patch::Patch;
use crate::path::Path;

/// Patches that turn `src` into `dst`. Empty when the trees are equal.
pub fn diff(src: &Value, dst: &Value) -> Vec<Patch> {
    let mut ops = Vec::new();
    diff_at_path(&mut ops, &Path::new(), src, dst);
    ops
}

fn diff_at_path(ops: &mut Vec<Patch>, path: &Path, src: &Value, dst: &Value) {
    if src == dst {
        return;
    }
    match (src, dst) {
        (Value::Object(s), Value::Object(d)) => diff_obj(ops, path, s, d),
        (Value::Array(s), Value::Array(d)) => diff_arr(ops, path, s, d),
        _ => ops.push(Patch::replace(path.clone(), dst.clone())),
    }
}

fn diff_obj(ops: &mut Vec<Patch>, path: &Path, src: &Map<String, Value>, dst: &Map<String, Value>) {
    for key in src.keys() {
        if !dst.contains_key(key) {
            ops.push(Patch::remove(path.child(key)));
        }
    }
    for (key, dst_val) in dst {
        let child = path.child(key);
        match src.get(key) {
            None => ops.push(Patch::add(child, dst_val.clone())),
            Some(src_val) => diff_at_path(ops, &child, src_val, dst_val),
        }
    }
}

fn diff_arr(ops: &mut Vec<Patch>, path: &Path, src: &[Value], dst: &[Value]) {
    let common = src.len().min(dst.len());
    for idx in 0..common {
        diff_at_path(ops, &path.child(idx), &src[idx], &dst[idx]);
    }
    for (idx, value) in dst.iter().enumerate().skip(common) {
        ops.push(Patch::add(path.child(idx), value.clone()));
    }
    for idx in (common..src.len()).rev() {
        ops.push(Patch::remove(path.child(idx)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::apply::apply_patch;
    use crate::patch::PatchOp;
    use crate::path;
    use serde_json::json;

    fn roundtrip(src: Value, dst: Value) {
        let ops = diff(&src, &dst);
        let result = apply_patch(&src, &ops).expect("apply failed");
        assert_eq!(result, dst);
    }

    #[test]
    fn equal_docs_produce_nothing() {
        assert!(diff(&json!({"a": 1}), &json!({"a": 1})).is_empty());
    }

    #[test]
    fn scalar_change_is_root_replace() {
        let ops = diff(&json!(1), &json!(2));
        assert_eq!(ops, vec![Patch::replace(Path::new(), json!(2))]);
    }

    #[test]
    fn nested_field_change_is_field_level() {
        let ops = diff(
            &json!({"user": {"name": "Bob", "age": 25}}),
            &json!({"user": {"name": "Alice", "age": 25}}),
        );
        assert_eq!(ops, vec![Patch::replace(path!["user", "name"], json!("Alice"))]);
    }

    #[test]
    fn added_and_removed_keys() {
        let ops = diff(&json!({"a": 1, "b": 2}), &json!({"a": 1, "c": 3}));
        assert_eq!(
            ops,
            vec![Patch::remove(path!["b"]), Patch::add(path!["c"], json!(3))]
        );
    }

    #[test]
    fn type_change_replaces_whole_value() {
        let ops = diff(&json!({"a": [1]}), &json!({"a": {"x": 1}}));
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op, PatchOp::Replace);
        assert_eq!(ops[0].path, path!["a"]);
    }

    #[test]
    fn array_growth_appends_in_order() {
        let ops = diff(&json!([1]), &json!([1, 2, 3]));
        assert_eq!(
            ops,
            vec![
                Patch::add(path![[1]], json!(2)),
                Patch::add(path![[2]], json!(3)),
            ]
        );
    }

    #[test]
    fn array_truncation_removes_from_the_back() {
        let ops = diff(&json!([1, 2, 3]), &json!([1]));
        assert_eq!(ops, vec![Patch::remove(path![[2]]), Patch::remove(path![[1]])]);
    }

    #[test]
    fn roundtrips() {
        roundtrip(
            json!({"name": "Alice", "age": 30}),
            json!({"name": "Bob", "age": 30, "city": "NYC"}),
        );
        roundtrip(json!([1, 2, 3]), json!([1, 99, 2, 3]));
        roundtrip(json!([1, 2, 3]), json!([3]));
        roundtrip(json!({"arr": [{"a": 1}, {"b": 2}]}), json!({"arr": [{"a": 2}]}));
        roundtrip(json!(null), json!({"a": 1}));
    }
}
