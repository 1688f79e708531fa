//! Product attributes gathered during fusion and extraction.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// A single attribute value
///
/// Untagged in JSON: strings, arrays of strings, numbers and booleans map to
/// the corresponding variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AttributeValue {
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The text value, or the first list element
    pub fn primary(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::List(items) => items.first().map(String::as_str),
            _ => None,
        }
    }

    /// List items, or the text as a one-element list
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            AttributeValue::Text(s) => vec![s.as_str()],
            AttributeValue::List(items) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the value carries no information (blank text or empty list)
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Text(s) => s.trim().is_empty(),
            AttributeValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
            _ => false,
        }
    }

    /// Case-insensitive substring check across the textual content
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.as_list()
            .iter()
            .any(|s| s.to_lowercase().contains(&needle))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::List(items) => f.write_str(&items.join(", ")),
            AttributeValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(items: Vec<String>) -> Self {
        AttributeValue::List(items)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

/// Ordered attribute map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Insert only when the key is absent; returns whether it was inserted
    pub fn insert_if_absent(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> bool {
        match self.values.entry(key.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.values.remove(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Present and carrying a non-empty value
    pub fn has_value(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    #[inline]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_text)
    }

    /// Primary text for a key: the `{key}_primary` alias when set, else the
    /// value's own primary element
    pub fn primary(&self, key: &str) -> Option<&str> {
        self.get(&format!("{key}_primary"))
            .and_then(AttributeValue::primary)
            .or_else(|| self.get(key).and_then(AttributeValue::primary))
            .filter(|s| !s.trim().is_empty())
    }

    pub fn list(&self, key: &str) -> Vec<&str> {
        self.get(key).map(AttributeValue::as_list).unwrap_or_default()
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(AttributeValue::as_bool).unwrap_or(false)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(k, v);
        }
        attributes
    }
}
