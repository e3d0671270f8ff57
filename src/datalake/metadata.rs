//! User-defined file metadata

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header prefix that marks a datalake metadata entry on the wire
pub const META_HEADER_PREFIX: &str = "x-basin-meta-";

/// User-defined metadata attached to a datalake file
///
/// In memory this is a plain string-keyed map; the `x-basin-meta-` prefix
/// the wire format uses exists only at the marshalling boundary
/// ([`to_headers`](FileMetadata::to_headers) /
/// [`from_prefixed`](FileMetadata::from_prefixed)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMetadata(BTreeMap<String, String>);

impl FileMetadata {
    /// Create an empty metadata map
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a metadata value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set a metadata value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no entries are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a response-side map whose keys carry the wire prefix
    ///
    /// Keys without the prefix are not metadata and are ignored. Scalar
    /// values are stringified the way the platform renders them.
    pub fn from_prefixed(object: &JsonObject) -> Self {
        let mut map = BTreeMap::new();
        for (key, value) in object {
            if let Some(stripped) = key.strip_prefix(META_HEADER_PREFIX) {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                map.insert(stripped.to_string(), rendered);
            }
        }
        Self(map)
    }

    /// Render entries as upload request headers, re-adding the wire prefix
    pub fn to_headers(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (format!("{META_HEADER_PREFIX}{k}"), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FileMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
