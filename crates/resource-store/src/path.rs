//! Segment-based addressing for the hierarchical store

use serde::{Serialize, Serializer};

/// An absolute location in the hierarchical store.
///
/// Stored as an ordered list of segments. Parsing treats both `/` and `\`
/// as separators and drops empty segments, so `"/a//b/"` and `"a\\b"`
/// address the same node. Segments are taken as given: callers are
/// expected to pass names through `filter_name` before composing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// The root of the store (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a slash-separated path.
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// Build a path from already-split segments.
    ///
    /// Empty segments are dropped; nothing else is checked.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.is_empty())
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a single segment.
    ///
    /// The segment is appended verbatim, including any `/` it contains.
    /// Use [`ResourcePath::join_path`] to append a multi-segment suffix.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        let mut segments = self.segments.clone();
        if !segment.is_empty() {
            segments.push(segment);
        }
        Self { segments }
    }

    /// Append every segment of a relative slash-separated suffix.
    pub fn join_path(&self, suffix: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(Self::parse(suffix).segments);
        Self { segments }
    }

    /// Get the parent location. The root has no parent.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// The last segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Every proper ancestor, shallowest first, excluding the root.
    pub fn ancestors(&self) -> impl Iterator<Item = ResourcePath> + '_ {
        (1..self.segments.len()).map(|len| Self {
            segments: self.segments[..len].to_vec(),
        })
    }

    /// Whether `self` is `other` or lies below it.
    pub fn starts_with(&self, other: &ResourcePath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl std::fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for ResourcePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for ResourcePath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for ResourcePath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&String> for ResourcePath {
    fn from(s: &String) -> Self {
        Self::parse(s)
    }
}
