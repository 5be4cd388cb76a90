#![forbid(unsafe_code)]

//! Property tests for the temporal middleware.
//!
//! Validates:
//! - Undo depth never exceeds the limit.
//! - After any sequence of commits, undos and redos, the store value equals
//!   the value tracked by a simple snapshot model of the same history.
//! - Undoing everything returns to the oldest reachable snapshot.
//! - Excluded fields never appear in recorded patches.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use tempora_patch::{PathToken, path};
use tempora_runtime::history::{Temporal, TemporalOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Doc {
    count: i32,
    tags: Vec<u8>,
    note: String,
}

fn doc() -> Doc {
    Doc {
        count: 0,
        tags: Vec::new(),
        note: String::new(),
    }
}

#[derive(Debug, Clone)]
enum Action {
    SetCount(i32),
    PushTag(u8),
    PopTag,
    SetNote(String),
    Undo(usize),
    Redo(usize),
    Clear,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => any::<i32>().prop_map(Action::SetCount),
        2 => any::<u8>().prop_map(Action::PushTag),
        1 => Just(Action::PopTag),
        2 => "[a-z]{0,4}".prop_map(Action::SetNote),
        3 => (1usize..4).prop_map(Action::Undo),
        2 => (1usize..4).prop_map(Action::Redo),
        1 => Just(Action::Clear),
    ]
}

fn mutate(doc: &mut Doc, action: &Action) {
    match action {
        Action::SetCount(n) => doc.count = *n,
        Action::PushTag(t) => doc.tags.push(*t),
        Action::PopTag => {
            doc.tags.pop();
        }
        Action::SetNote(s) => doc.note = s.clone(),
        Action::Undo(_) | Action::Redo(_) | Action::Clear => {}
    }
}

/// Snapshot model: `past` ends with the current value, `future` holds
/// redo targets (next redo last).
struct Model {
    past: Vec<Doc>,
    future: Vec<Doc>,
    limit: usize,
}

impl Model {
    fn new(limit: usize) -> Self {
        Self {
            past: vec![doc()],
            future: Vec::new(),
            limit,
        }
    }

    fn current(&self) -> &Doc {
        self.past.last().unwrap()
    }

    fn commit(&mut self, next: Doc) {
        self.past.push(next);
        self.future.clear();
        while self.past.len() > self.limit + 1 {
            self.past.remove(0);
        }
    }

    fn undo(&mut self, steps: usize) {
        for _ in 0..steps {
            if self.past.len() < 2 {
                break;
            }
            let top = self.past.pop().unwrap();
            self.future.push(top);
        }
    }

    fn redo(&mut self, steps: usize) {
        for _ in 0..steps {
            let Some(next) = self.future.pop() else { break };
            self.past.push(next);
            while self.past.len() > self.limit + 1 {
                self.past.remove(0);
            }
        }
    }

    fn clear(&mut self) {
        let current = self.current().clone();
        self.past = vec![current];
        self.future.clear();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn matches_snapshot_model(
        limit in 1usize..6,
        actions in prop::collection::vec(action(), 0..40),
    ) {
        let temporal = Temporal::json(doc(), TemporalOptions::new().with_limit(limit)).unwrap();
        let history = temporal.history();
        let mut model = Model::new(limit);

        for action in &actions {
            match action {
                Action::Undo(n) => {
                    history.undo(*n).unwrap();
                    model.undo(*n);
                }
                Action::Redo(n) => {
                    history.redo(*n).unwrap();
                    model.redo(*n);
                }
                Action::Clear => {
                    history.clear();
                    model.clear();
                }
                edit => {
                    let edit_for_store = edit.clone();
                    temporal.update(move |d| mutate(d, &edit_for_store)).unwrap();
                    let mut next = model.current().clone();
                    mutate(&mut next, edit);
                    model.commit(next);
                }
            }

            prop_assert!(history.undo_depth() <= limit);
            prop_assert_eq!(history.undo_depth(), model.past.len() - 1);
            prop_assert_eq!(history.redo_depth(), model.future.len());
            prop_assert_eq!(&temporal.get(), model.current());
        }

        let depth = history.undo_depth();
        if depth > 0 {
            history.undo(depth).unwrap();
        }
        prop_assert_eq!(&temporal.get(), &model.past[0]);
    }

    #[test]
    fn excluded_paths_never_recorded(
        edits in prop::collection::vec(action(), 1..20),
    ) {
        let options = TemporalOptions::new().with_exclude([path!["note"]]);
        let temporal = Temporal::json(doc(), options).unwrap();
        for edit in edits {
            temporal.update(move |d| mutate(d, &edit)).unwrap();
        }
        let note = PathToken::from("note");
        for pair in temporal.history().undo_stack() {
            for patch in pair.forward.iter().chain(pair.inverse.iter()) {
                prop_assert_ne!(patch.path.first(), Some(&note));
            }
        }
    }
}
