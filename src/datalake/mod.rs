//! Datalake resource layer: channels and files
//!
//! File listings are cursor-paginated; channel listings are offset/sized.
//! Bulk upload (`upload_dir`) is best-effort: individual failures are
//! logged and skipped, never aborting the batch. Bulk download
//! (`list_files_content`) is the opposite: any failure surfaces to the
//! consumer.

mod metadata;
mod types;

pub use metadata::{FileMetadata, META_HEADER_PREFIX};
pub use types::{Channel, DatalakeFile, FileContent};

use crate::error::{Error, Result};
use crate::http::{ApiClient, Downloader, RequestConfig};
use crate::paging::{
    CursorIter, ListFilters, OffsetIter, PageFetcher, PageRequest, Prefetch, RawPage,
};
use crate::types::JsonValue;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

// ============================================================================
// Page shapes
// ============================================================================

/// Wire shape of a file list page. A response missing `files` is malformed
/// and fails deserialization outright.
#[derive(Debug, Deserialize)]
struct FileListPage {
    files: Vec<JsonValue>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelListPage {
    channels: Vec<JsonValue>,
    total: u64,
}

// ============================================================================
// Page fetchers
// ============================================================================

struct FilePageFetcher {
    api: Arc<ApiClient>,
    path: String,
}

#[async_trait]
impl PageFetcher for FilePageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage> {
        let config = RequestConfig::new().query_all(request.to_query());
        let page: FileListPage = self.api.get_json(&self.path, config).await?;
        Ok(RawPage::cursor(page.files, page.next_page_token))
    }
}

struct ChannelPageFetcher {
    api: Arc<ApiClient>,
    path: String,
}

#[async_trait]
impl PageFetcher for ChannelPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage> {
        let config = RequestConfig::new().query_all(request.to_query());
        let page: ChannelListPage = self.api.get_json(&self.path, config).await?;
        Ok(RawPage::sized(page.channels, page.total))
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the datalake APIs
#[derive(Debug, Clone)]
pub struct DatalakeClient {
    api: Arc<ApiClient>,
}

impl DatalakeClient {
    /// Create a datalake client over a shared transport
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn channels_path(&self) -> String {
        format!("organizations/{}/channels", self.api.organization_id())
    }

    fn channel_path(&self, channel_id: &str) -> String {
        format!("{}/{channel_id}", self.channels_path())
    }

    fn files_path(&self, channel_id: &str) -> String {
        format!("{}/files", self.channel_path(channel_id))
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    /// Create a channel
    pub async fn create_channel(
        &self,
        name: &str,
        description: Option<&str>,
        storage_type: &str,
    ) -> Result<Channel> {
        let body = json!({
            "name": name,
            "description": description,
            "storage_type": storage_type,
        });
        self.api
            .post_json(&self.channels_path(), RequestConfig::new().json(body))
            .await
    }

    /// Fetch one channel
    pub async fn get_channel(&self, channel_id: &str) -> Result<Channel> {
        self.api
            .get_json(&self.channel_path(channel_id), RequestConfig::new())
            .await
    }

    /// List channels (offset/sized iteration)
    pub fn list_channels(&self, filters: ListFilters) -> OffsetIter<Channel> {
        let fetcher = Arc::new(ChannelPageFetcher {
            api: self.api.clone(),
            path: self.channels_path(),
        });
        OffsetIter::new(
            fetcher,
            Arc::new(|value| serde_json::from_value(value).map_err(Error::from)),
            filters,
        )
    }

    /// Delete a channel
    pub async fn delete_channel(&self, channel_id: &str) -> Result<()> {
        self.api.delete(&self.channel_path(channel_id)).await
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// List files in a channel (cursor iteration)
    pub fn list_files(&self, channel_id: &str, filters: ListFilters) -> CursorIter<DatalakeFile> {
        let fetcher = Arc::new(FilePageFetcher {
            api: self.api.clone(),
            path: self.files_path(channel_id),
        });
        let downloader: Arc<dyn Downloader> = self.api.clone();
        let channel_id = channel_id.to_string();
        CursorIter::new(
            fetcher,
            Arc::new(move |value| {
                DatalakeFile::from_value(&channel_id, value, downloader.clone())
            }),
            filters,
        )
    }

    /// List files and eagerly download their contents
    ///
    /// Prefetch consumption mode: up to `workers` concurrent downloads,
    /// yielding [`FileContent`] in completion order. A failed download
    /// surfaces to the consumer; it is not skipped.
    pub fn list_files_content(
        &self,
        channel_id: &str,
        filters: ListFilters,
        workers: usize,
    ) -> Prefetch<DatalakeFile, FileContent> {
        self.list_files(channel_id, filters)
            .prefetch(workers, |file: DatalakeFile| async move {
                let data = file.content().await?;
                Ok(FileContent { file, data })
            })
    }

    /// Fetch one file record
    pub async fn get_file(&self, channel_id: &str, file_id: &str) -> Result<DatalakeFile> {
        let path = format!("{}/{file_id}", self.files_path(channel_id));
        let value: JsonValue = self.api.get_json(&path, RequestConfig::new()).await?;
        DatalakeFile::from_value(channel_id, value, self.api.clone())
    }

    /// Upload one file from memory
    pub async fn upload_file(
        &self,
        channel_id: &str,
        data: Bytes,
        content_type: &str,
        metadata: &FileMetadata,
    ) -> Result<DatalakeFile> {
        let mut config = RequestConfig::new()
            .header("content-type", content_type)
            .bytes(data);
        for (key, value) in metadata.to_headers() {
            config = config.header(key, value);
        }
        let value: JsonValue = self
            .api
            .post_json(&self.files_path(channel_id), config)
            .await?;
        DatalakeFile::from_value(channel_id, value, self.api.clone())
    }

    /// Upload every regular file in a directory, concurrently
    ///
    /// Best-effort batch semantics: a failed upload is logged and excluded
    /// from the returned list; the rest of the batch proceeds. The original
    /// filename is recorded as `filename` metadata.
    pub async fn upload_dir(
        &self,
        channel_id: &str,
        dir: &Path,
        workers: usize,
    ) -> Result<Vec<DatalakeFile>> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let results: Vec<_> = stream::iter(paths)
            .map(|path| async move {
                let outcome = self.upload_path(channel_id, &path).await;
                (path, outcome)
            })
            .buffer_unordered(workers.max(1))
            .collect()
            .await;

        let mut uploaded = Vec::new();
        for (path, outcome) in results {
            match outcome {
                Ok(file) => uploaded.push(file),
                Err(e) => warn!("upload of {} failed, skipping: {e}", path.display()),
            }
        }
        Ok(uploaded)
    }

    /// Delete a file
    pub async fn delete_file(&self, channel_id: &str, file_id: &str) -> Result<()> {
        let path = format!("{}/{file_id}", self.files_path(channel_id));
        self.api.delete(&path).await
    }

    /// Upload one file from disk
    ///
    /// The content type is guessed from the extension and the original
    /// filename is recorded as `filename` metadata.
    pub async fn upload_path(&self, channel_id: &str, path: &Path) -> Result<DatalakeFile> {
        let data = tokio::fs::read(path).await?;
        let mut metadata = FileMetadata::new();
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            metadata.set("filename", name);
        }
        let content_type = guess_content_type(path);
        self.upload_file(channel_id, Bytes::from(data), content_type, &metadata)
            .await
    }
}

/// Guess an upload content type from a file extension
fn guess_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
