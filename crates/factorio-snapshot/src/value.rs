//! Untyped snapshot values.
//!
//! The producer writes a free-form JSON document whose shape changes as the
//! game progresses (no forces yet, no rockets launched yet, new surfaces...).
//! Instead of decoding into fixed structs, the document is kept as a tagged
//! union and read through [`Field`](crate::Field).

use std::fmt;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

/// A single node of the snapshot tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Tree(Tree),
}

/// An ordered map of child values.
///
/// Keeps the key order of the source document. Arrays are stored as trees
/// keyed by their decimal index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    entries: IndexMap<String, Value>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a child. A repeated key keeps its original position and takes
    /// the new value, so keys stay unique.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for (k, v) in iter {
            tree.insert(k, v);
        }
        tree
    }
}

impl Value {
    /// Numeric view of the value. Non-numeric data reads as `0`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::String(s) => s
                .trim()
                .parse()
                .ok()
                .filter(|n: &f64| n.is_finite())
                .unwrap_or(0.0),
            Value::Tree(_) | Value::Null => 0.0,
        }
    }

    /// Integer view of the value, truncated toward zero.
    pub fn as_i64(&self) -> i64 {
        let n = self.as_f64();
        if n.is_nan() { 0 } else { n.trunc() as i64 }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => {
                let s = s.trim();
                !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false")
            }
            Value::Tree(t) => !t.is_empty(),
            Value::Null => false,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Value::Tree(t) => Some(t),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut tree = Tree::new();
        let mut index = 0usize;
        while let Some(value) = seq.next_element::<Value>()? {
            tree.insert(index.to_string(), value);
            index += 1;
        }
        Ok(Value::Tree(tree))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut tree = Tree {
            entries: IndexMap::with_capacity(map.size_hint().unwrap_or(0)),
        };
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            tree.insert(key, value);
        }
        Ok(Value::Tree(tree))
    }
}
