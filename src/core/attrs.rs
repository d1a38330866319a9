//! Attribute sets for structured logging
//!
//! This module provides:
//! - `AttrValue`: the closed sum type attribute values are stored as
//! - `AttrSet`: a string-keyed attribute map with layered merge semantics
//!
//! Attribute sets exist at three layers: the base's set, an adapter's set,
//! and per-call attributes. On merge, later (more specific) layers win.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Value type for log attributes
///
/// Values the core cannot render (callables, foreign handles) are stored as
/// `Opaque` with a human-readable type description; rendering decisions are
/// deferred to destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Map(HashMap<String, AttrValue>),
    Opaque(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => write!(f, "{}", s),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(fl) => write!(f, "{}", fl),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Map(m) => {
                let mut pairs: Vec<_> = m.iter().collect();
                pairs.sort_by(|a, b| a.0.cmp(b.0));
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, "}}")
            }
            AttrValue::Opaque(desc) => write!(f, "<{}>", desc),
        }
    }
}

impl AttrValue {
    /// Describe an unrenderable value by its type name
    pub fn opaque<T: ?Sized>() -> Self {
        AttrValue::Opaque(std::any::type_name::<T>().to_string())
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            AttrValue::Str(s) => serde_json::Value::String(s.clone()),
            AttrValue::Int(i) => serde_json::Value::Number((*i).into()),
            AttrValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            AttrValue::Bool(b) => serde_json::Value::Bool(*b),
            AttrValue::Map(m) => serde_json::Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
            AttrValue::Opaque(desc) => serde_json::Value::String(format!("<{}>", desc)),
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<i32> for AttrValue {
    fn from(i: i32) -> Self {
        AttrValue::Int(i as i64)
    }
}

impl From<u32> for AttrValue {
    fn from(i: u32) -> Self {
        AttrValue::Int(i as i64)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<HashMap<String, AttrValue>> for AttrValue {
    fn from(m: HashMap<String, AttrValue>) -> Self {
        AttrValue::Map(m)
    }
}

/// An unordered attribute name to value mapping.
///
/// Keys are unique; last write wins. All operations are total. Mutating
/// operations affect only the receiver, and `Clone` never aliases the
/// source's storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrSet {
    entries: HashMap<String, AttrValue>,
}

impl AttrSet {
    /// Create a new empty attribute set
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Set an attribute, overwriting any previous value under the same key
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.entries.insert(key.into(), value.into());
    }

    /// Set an attribute, returning the set for chained construction
    #[must_use]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.set(key, value);
        self
    }

    /// Look up an attribute by name
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    /// Remove an attribute; absent keys are a no-op
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Remove all attributes
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge another set into this one; the other set's entries win on
    /// key collision
    pub fn merge(&mut self, other: &AttrSet) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Non-destructive merge producing a new independent set
    #[must_use]
    pub fn merged(&self, other: &AttrSet) -> AttrSet {
        let mut result = self.clone();
        result.merge(other);
        result
    }

    /// Export as a plain mapping keyed by original string names
    pub fn export(&self) -> HashMap<String, AttrValue> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.entries.iter()
    }

    /// Format attributes as key=value pairs in stable key order
    pub fn format_pairs(&self) -> String {
        let mut pairs: Vec<_> = self.entries.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for AttrSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_pairs())
    }
}

impl FromIterator<(String, AttrValue)> for AttrSet {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
