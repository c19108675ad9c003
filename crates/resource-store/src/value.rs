//! Property values as exposed by the store

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::io::Read;
use std::sync::{Arc, Mutex};

type Source = Box<dyn Read + Send>;

/// A single-read byte source backing a binary property.
///
/// Clones share the underlying source: once any clone has been drained,
/// every clone reports itself consumed.
#[derive(Clone)]
pub struct BinaryStream {
    source: Arc<Mutex<Option<Source>>>,
}

impl BinaryStream {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            source: Arc::new(Mutex::new(Some(Box::new(reader)))),
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(std::io::Cursor::new(bytes.into()))
    }

    /// A stream whose content is already gone.
    pub fn consumed() -> Self {
        Self {
            source: Arc::new(Mutex::new(None)),
        }
    }

    /// Drain the stream.
    ///
    /// Returns `None` if it was already consumed or the read failed. A failed
    /// read also consumes the stream.
    pub fn read_to_end(&self) -> Option<Vec<u8>> {
        let mut reader = self.source.lock().ok()?.take()?;
        let mut buf = Vec::new();
        match reader.read_to_end(&mut buf) {
            Ok(_) => Some(buf),
            Err(e) => {
                tracing::trace!(error = %e, "binary stream read failed");
                None
            }
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.source.lock().map(|s| s.is_none()).unwrap_or(true)
    }
}

impl std::fmt::Debug for BinaryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryStream")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl PartialEq for BinaryStream {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

/// Streams cannot be copied without consuming them, so they serialize as `null`.
impl Serialize for BinaryStream {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_none()
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Binary(Vec<u8>),
    Array(Vec<PropertyValue>),
    /// Lazily read binary content; see [`BinaryStream`].
    Stream(BinaryStream),
}

impl PropertyValue {
    /// Whether reading this value would consume a stream.
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Whether this value is a stream or an array holding one at any depth.
    pub fn contains_stream(&self) -> bool {
        match self {
            Self::Stream(_) => true,
            Self::Array(items) => items.iter().any(Self::contains_stream),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Copy this value into a form that no longer depends on a live stream.
    ///
    /// Streams are drained into [`PropertyValue::Binary`]; arrays are
    /// materialized element by element and fail as a whole if any element
    /// cannot be read.
    pub fn materialize(&self) -> Option<PropertyValue> {
        match self {
            Self::Stream(stream) => stream.read_to_end().map(Self::Binary),
            Self::Array(items) => items
                .iter()
                .map(Self::materialize)
                .collect::<Option<Vec<_>>>()
                .map(Self::Array),
            other => Some(other.clone()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(v)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(v: Vec<PropertyValue>) -> Self {
        Self::Array(v)
    }
}

impl From<BinaryStream> for PropertyValue {
    fn from(v: BinaryStream) -> Self {
        Self::Stream(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device gone"))
        }
    }

    #[test]
    fn stream_reads_once() {
        let stream = BinaryStream::from_bytes(b"payload".to_vec());
        let clone = stream.clone();
        assert_eq!(stream.read_to_end(), Some(b"payload".to_vec()));
        assert!(clone.is_consumed());
        assert_eq!(clone.read_to_end(), None);
    }

    #[test]
    fn failed_read_consumes_stream() {
        let stream = BinaryStream::new(FailingReader);
        assert_eq!(stream.read_to_end(), None);
        assert!(stream.is_consumed());
    }

    #[test]
    fn contains_stream_looks_inside_arrays() {
        let nested = PropertyValue::Array(vec![PropertyValue::Array(vec![
            PropertyValue::Stream(BinaryStream::consumed()),
        ])]);
        assert!(nested.contains_stream());
        assert!(!PropertyValue::Array(vec![PropertyValue::from(1_i64)]).contains_stream());
        assert!(!PropertyValue::from("a").contains_stream());
    }

    #[test]
    fn materialize_array_fails_on_dead_element() {
        let value = PropertyValue::Array(vec![
            PropertyValue::from("a"),
            PropertyValue::Stream(BinaryStream::consumed()),
        ]);
        assert_eq!(value.materialize(), None);
    }

    #[test]
    fn serializes_untagged() {
        let value = PropertyValue::Array(vec![
            PropertyValue::from("a"),
            PropertyValue::from(2_i64),
            PropertyValue::from(true),
            PropertyValue::Stream(BinaryStream::consumed()),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["a",2,true,null]"#);
    }
}
