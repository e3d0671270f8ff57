//! Dataset entity types

use crate::error::Result;
use crate::http::Downloader;
use crate::types::JsonValue;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

// ============================================================================
// Dataset
// ============================================================================

/// A dataset: a named collection of annotated items
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub dataset_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub dataset_type: String,
    /// Task-specific properties (category definitions etc.); arbitrary JSON
    #[serde(default)]
    pub props: JsonValue,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Dataset Item
// ============================================================================

/// Reference to one payload backing a dataset item
#[derive(Debug, Clone, Deserialize)]
pub struct SourceData {
    pub data_type: String,
    pub data_uri: String,
}

/// Wire shape of one item record
#[derive(Debug, Deserialize)]
struct ItemRecord {
    item_id: String,
    #[serde(default)]
    attributes: JsonValue,
    source_data: Vec<SourceData>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// One item of a dataset: annotation attributes plus references to the
/// payloads that back it
#[derive(Clone)]
pub struct DatasetItem {
    pub dataset_id: String,
    pub item_id: String,
    /// Annotation attributes; arbitrary JSON
    pub attributes: JsonValue,
    pub source_data: Vec<SourceData>,
    pub created_at: Option<DateTime<Utc>>,
    downloader: Arc<dyn Downloader>,
}

impl DatasetItem {
    /// Build an item entity from one raw page entry. Pure; no I/O.
    pub(crate) fn from_value(
        dataset_id: &str,
        value: JsonValue,
        downloader: Arc<dyn Downloader>,
    ) -> Result<Self> {
        let record: ItemRecord = serde_json::from_value(value)?;
        Ok(Self {
            dataset_id: dataset_id.to_string(),
            item_id: record.item_id,
            attributes: record.attributes,
            source_data: record.source_data,
            created_at: record.created_at,
            downloader,
        })
    }

    /// Download every source-data payload, in declaration order
    pub async fn payloads(&self) -> Result<Vec<Bytes>> {
        let mut out = Vec::with_capacity(self.source_data.len());
        for source in &self.source_data {
            out.push(self.downloader.download(&source.data_uri).await?);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for DatasetItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetItem")
            .field("dataset_id", &self.dataset_id)
            .field("item_id", &self.item_id)
            .field("attributes", &self.attributes)
            .field("source_data", &self.source_data)
            .finish_non_exhaustive()
    }
}

/// An item together with its downloaded payloads, as yielded by the
/// prefetch consumption mode
#[derive(Debug, Clone)]
pub struct ItemPayload {
    pub item: DatasetItem,
    pub data: Vec<Bytes>,
}
