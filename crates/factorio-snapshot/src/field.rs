//! Total, path-based reads over a snapshot tree.
//!
//! Every accessor returns a well-defined zero value when the path is missing
//! or the node has the wrong kind: `0` for numbers, `false` for booleans, an
//! empty key set for trees. Absence is data, never an error.

use crate::value::{Tree, Value};

/// A borrowed cursor into a snapshot tree, possibly pointing at nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Field<'a> {
    value: Option<&'a Value>,
}

impl<'a> Field<'a> {
    pub const fn new(value: &'a Value) -> Self {
        Self { value: Some(value) }
    }

    /// A cursor that points at nothing.
    pub const fn absent() -> Self {
        Self { value: None }
    }

    /// Descend through `path`, one tree key per segment.
    pub fn get(self, path: &[&str]) -> Field<'a> {
        let mut current = self.value;
        for segment in path {
            current = current
                .and_then(Value::as_tree)
                .and_then(|tree| tree.get(segment));
        }
        Field { value: current }
    }

    pub const fn is_present(self) -> bool {
        self.value.is_some()
    }

    pub fn number(self) -> f64 {
        self.value.map_or(0.0, Value::as_f64)
    }

    pub fn int(self) -> i64 {
        self.value.map_or(0, Value::as_i64)
    }

    pub fn bool(self) -> bool {
        self.value.is_some_and(Value::as_bool)
    }

    fn tree(self) -> Option<&'a Tree> {
        self.value.and_then(Value::as_tree)
    }

    /// Child keys in source order. Empty unless this is a tree.
    ///
    /// Source order is not stable across producer runs; callers must not
    /// derive output ordering from it.
    pub fn keys(self) -> impl Iterator<Item = &'a str> {
        self.tree().into_iter().flat_map(Tree::keys)
    }

    /// Child `(key, field)` pairs in source order.
    pub fn entries(self) -> impl Iterator<Item = (&'a str, Field<'a>)> {
        self.tree()
            .into_iter()
            .flat_map(Tree::iter)
            .map(|(key, value)| (key, Field::new(value)))
    }
}
