//! Transport and control properties that are never persisted
//!
//! Events and jobs carry metadata that only matters to the messaging layer
//! while they are in flight. [`IGNORED_PROPERTIES`] is the single table of
//! those keys, each with the reason it is excluded.

use crate::config::HelperConfig;
use std::collections::BTreeMap;

/// Reserved keys and why they are not written to the store.
pub const IGNORED_PROPERTIES: &[(&str, &str)] = &[
    ("event.distribute", "cluster distribution flag"),
    ("event.application", "id of the originating application instance"),
    ("event.topics", "event topic, implied by the storage location"),
    ("slingevent:eventId", "job id, assigned by the job manager"),
    ("event.job.parallel", "queue parallelism override"),
    ("event.job.run.local", "local execution flag"),
    ("event.job.queueordered", "ordered queue flag"),
    ("slingevent:notification:job", "job notification payload"),
    ("event.job.status.context", "status notifier callback context"),
];

/// Whether `key` is one of the reserved keys in [`IGNORED_PROPERTIES`].
///
/// Matching is exact and case sensitive.
pub fn ignore_property(key: &str) -> bool {
    IGNORED_PROPERTIES.iter().any(|(reserved, _)| *reserved == key)
}

/// An ignore list seeded from [`IGNORED_PROPERTIES`] that hosts can extend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    ignored: BTreeMap<String, String>,
}

impl Default for PropertyFilter {
    fn default() -> Self {
        Self {
            ignored: IGNORED_PROPERTIES
                .iter()
                .map(|(k, r)| (k.to_string(), r.to_string()))
                .collect(),
        }
    }
}

impl PropertyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table plus `[ignored_properties]` from configuration.
    pub fn from_config(config: &HelperConfig) -> Self {
        config
            .ignored_properties
            .iter()
            .fold(Self::default(), |filter, (key, reason)| {
                filter.with_ignored(key.clone(), reason.clone())
            })
    }

    /// Add a key to ignore. Re-adding a key replaces its reason.
    pub fn with_ignored(mut self, key: impl Into<String>, reason: impl Into<String>) -> Self {
        self.ignored.insert(key.into(), reason.into());
        self
    }

    pub fn ignores(&self, key: &str) -> bool {
        self.ignored.contains_key(key)
    }

    /// Why `key` is ignored, if it is.
    pub fn reason(&self, key: &str) -> Option<&str> {
        self.ignored.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ignored.keys().map(String::as_str)
    }
}
