//! Detached, serializable copies of a resource's properties

use crate::properties::PropertyFilter;
use resource_store::{PropertyValue, ValueMap};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Set to `true` on a snapshot when at least one stream could not be read.
pub const READ_ERROR_MARKER: &str = "resource-helper/ReadError";

/// An immutable copy of a property view.
///
/// Every stream-valued entry, including arrays holding streams, has either
/// been drained into [`PropertyValue::Binary`] or, if that failed, kept as
/// the original value with [`READ_ERROR_MARKER`] set. Callers must check
/// [`PropertySnapshot::has_read_error`] before relying on binary content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertySnapshot {
    entries: BTreeMap<String, PropertyValue>,
}

/// Copy `view` into a [`PropertySnapshot`].
///
/// Eager values are copied as they are. Stream values, and arrays holding
/// streams, are read again through [`ValueMap::get_serializable`]; if that
/// yields nothing the entry is kept unchanged and the snapshot is flagged.
/// Never fails.
pub fn clone_value_map(view: &dyn ValueMap) -> PropertySnapshot {
    let mut entries: BTreeMap<String, PropertyValue> = view.entries().into_iter().collect();

    let lazy: Vec<String> = entries
        .iter()
        .filter(|(_, value)| value.contains_stream())
        .map(|(key, _)| key.clone())
        .collect();

    let mut has_read_error = false;
    for key in lazy {
        match view.get_serializable(&key).filter(|v| !v.contains_stream()) {
            Some(value) => {
                entries.insert(key, value);
            }
            None => {
                tracing::trace!(key = %key, "stream property could not be materialized");
                has_read_error = true;
            }
        }
    }

    if has_read_error {
        entries.insert(READ_ERROR_MARKER.to_string(), PropertyValue::Boolean(true));
    }
    PropertySnapshot { entries }
}

impl PropertySnapshot {
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PropertyValue> {
        self.entries.iter()
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

    pub fn has_read_error(&self) -> bool {
        self.entries.get(READ_ERROR_MARKER) == Some(&PropertyValue::Boolean(true))
    }

    /// Keys whose stream content could not be captured.
    pub fn unreadable_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.contains_stream())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// A new snapshot without the keys `filter` ignores.
    ///
    /// The read-error marker, if present, is carried over.
    pub fn persistable(&self, filter: &PropertyFilter) -> PropertySnapshot {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| !filter.ignores(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        PropertySnapshot { entries }
    }

    /// The owned property map, e.g. for a store create request.
    pub fn to_map(&self) -> BTreeMap<String, PropertyValue> {
        self.entries.clone()
    }

    pub fn into_map(self) -> BTreeMap<String, PropertyValue> {
        self.entries
    }
}

impl From<BTreeMap<String, PropertyValue>> for PropertySnapshot {
    fn from(entries: BTreeMap<String, PropertyValue>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a PropertySnapshot {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
