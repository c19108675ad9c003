//! Property views bound to a resource

use crate::PropertyValue;
use std::collections::BTreeMap;

/// Read access to a resource's properties.
///
/// Every key can be read two ways: natively, which may hand out a
/// [`PropertyValue::Stream`], or coerced into a serializable form, which
/// drains such a stream. The coerced read returns `None` when the content
/// cannot be produced, for example because the stream was already consumed.
pub trait ValueMap {
    /// Property names, in a stable order.
    fn keys(&self) -> Vec<String>;

    /// Native read.
    fn get(&self, key: &str) -> Option<PropertyValue>;

    /// Coerced read. Never returns a stream.
    fn get_serializable(&self, key: &str) -> Option<PropertyValue> {
        self.get(key)?.materialize()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All native entries.
    fn entries(&self) -> Vec<(String, PropertyValue)> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }
}

/// A [`ValueMap`] over an owned property map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryValueMap {
    values: BTreeMap<String, PropertyValue>,
}

impl MemoryValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`MemoryValueMap::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueMap for MemoryValueMap {
    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<PropertyValue> {
        self.values.get(key).cloned()
    }
}

impl From<BTreeMap<String, PropertyValue>> for MemoryValueMap {
    fn from(values: BTreeMap<String, PropertyValue>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for MemoryValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
