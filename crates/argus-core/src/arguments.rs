//! Keyword-argument map handed to handlers.

use indexmap::IndexMap;

use crate::Value;

/// Ordered map of argument name to [`Value`].
///
/// The pipeline fills it in declaration order; validators read it as a whole,
/// which is what allows cross-field checks.
///
/// # Example
///
/// ```rust
/// use argus_core::{Arguments, Value};
///
/// let args: Arguments = [("id", Value::Int(7))].into_iter().collect();
/// assert_eq!(args.get("id"), Some(&Value::Int(7)));
/// assert!(!args.contains_key("name"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    inner: IndexMap<String, Value>,
}

impl Arguments {
    /// Creates an empty argument map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Returns true if `key` is present (even with a null value).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Removes and returns the value under `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.shift_remove(key)
    }

    /// Removes the value under `key`, returning [`Value::Null`] when absent.
    pub fn take(&mut self, key: &str) -> Value {
        self.remove(key).unwrap_or_default()
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over argument names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Arguments {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl From<IndexMap<String, Value>> for Arguments {
    fn from(inner: IndexMap<String, Value>) -> Self {
        Self { inner }
    }
}
