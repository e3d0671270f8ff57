//! Datalake entity types

use super::metadata::FileMetadata;
use crate::error::{Error, Result};
use crate::http::Downloader;
use crate::types::JsonValue;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

// ============================================================================
// Channel
// ============================================================================

/// A datalake channel: a bucket of uploaded files
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub channel_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub storage_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Datalake File
// ============================================================================

/// Wire shape of one file record
#[derive(Debug, Deserialize)]
struct FileRecord {
    file_id: String,
    #[serde(default)]
    content_type: Option<String>,
    download_uri: String,
    #[serde(default)]
    uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: crate::types::JsonObject,
}

/// A file stored in a datalake channel
///
/// An immutable value holder; [`content`](DatalakeFile::content) downloads
/// the payload on demand through the attached [`Downloader`].
#[derive(Clone)]
pub struct DatalakeFile {
    pub channel_id: String,
    pub file_id: String,
    pub content_type: Option<String>,
    pub download_uri: String,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub metadata: FileMetadata,
    downloader: Arc<dyn Downloader>,
}

impl DatalakeFile {
    /// Build a file entity from one raw page entry. Pure; no I/O.
    pub(crate) fn from_value(
        channel_id: &str,
        value: JsonValue,
        downloader: Arc<dyn Downloader>,
    ) -> Result<Self> {
        let record: FileRecord = serde_json::from_value(value)?;
        Ok(Self {
            channel_id: channel_id.to_string(),
            file_id: record.file_id,
            content_type: record.content_type,
            download_uri: record.download_uri,
            uploaded_at: record.uploaded_at,
            metadata: FileMetadata::from_prefixed(&record.metadata),
            downloader,
        })
    }

    /// Download this file's bytes
    pub async fn content(&self) -> Result<Bytes> {
        if self.download_uri.is_empty() {
            return Err(Error::decode("file record has no download_uri"));
        }
        self.downloader.download(&self.download_uri).await
    }
}

impl std::fmt::Debug for DatalakeFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatalakeFile")
            .field("channel_id", &self.channel_id)
            .field("file_id", &self.file_id)
            .field("content_type", &self.content_type)
            .field("uploaded_at", &self.uploaded_at)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// A file together with its downloaded payload, as yielded by the prefetch
/// consumption mode
#[derive(Debug, Clone)]
pub struct FileContent {
    pub file: DatalakeFile,
    pub data: Bytes,
}
