//! Dataset resource layer: datasets and dataset items
//!
//! Item listings are cursor-paginated; dataset listings are offset/sized.
//! `list_items_content` is the prefetch consumption mode: it downloads
//! every item's source data concurrently and yields in completion order.

mod types;

pub use types::{Dataset, DatasetItem, ItemPayload, SourceData};

use crate::error::{Error, Result};
use crate::http::{ApiClient, Downloader, RequestConfig};
use crate::paging::{
    CursorIter, ListFilters, OffsetIter, PageFetcher, PageRequest, Prefetch, RawPage,
};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// Page shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct ItemListPage {
    items: Vec<JsonValue>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatasetListPage {
    datasets: Vec<JsonValue>,
    total: u64,
}

// ============================================================================
// Page fetchers
// ============================================================================

struct ItemPageFetcher {
    api: Arc<ApiClient>,
    path: String,
}

#[async_trait]
impl PageFetcher for ItemPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage> {
        let config = RequestConfig::new().query_all(request.to_query());
        let page: ItemListPage = self.api.get_json(&self.path, config).await?;
        Ok(RawPage::cursor(page.items, page.next_page_token))
    }
}

struct DatasetPageFetcher {
    api: Arc<ApiClient>,
    path: String,
}

#[async_trait]
impl PageFetcher for DatasetPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage> {
        let config = RequestConfig::new().query_all(request.to_query());
        let page: DatasetListPage = self.api.get_json(&self.path, config).await?;
        Ok(RawPage::sized(page.datasets, page.total))
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the dataset APIs
#[derive(Debug, Clone)]
pub struct DatasetClient {
    api: Arc<ApiClient>,
}

impl DatasetClient {
    /// Create a dataset client over a shared transport
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn datasets_path(&self) -> String {
        format!("organizations/{}/datasets", self.api.organization_id())
    }

    fn dataset_path(&self, dataset_id: &str) -> String {
        format!("{}/{dataset_id}", self.datasets_path())
    }

    fn items_path(&self, dataset_id: &str) -> String {
        format!("{}/items", self.dataset_path(dataset_id))
    }

    // ------------------------------------------------------------------
    // Datasets
    // ------------------------------------------------------------------

    /// Create a dataset
    pub async fn create_dataset(
        &self,
        name: &str,
        dataset_type: &str,
        props: JsonValue,
    ) -> Result<Dataset> {
        let body = json!({
            "name": name,
            "type": dataset_type,
            "props": props,
        });
        self.api
            .post_json(&self.datasets_path(), RequestConfig::new().json(body))
            .await
    }

    /// Fetch one dataset
    pub async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset> {
        self.api
            .get_json(&self.dataset_path(dataset_id), RequestConfig::new())
            .await
    }

    /// List datasets (offset/sized iteration)
    pub fn list_datasets(&self, filters: ListFilters) -> OffsetIter<Dataset> {
        let fetcher = Arc::new(DatasetPageFetcher {
            api: self.api.clone(),
            path: self.datasets_path(),
        });
        OffsetIter::new(
            fetcher,
            Arc::new(|value| serde_json::from_value(value).map_err(Error::from)),
            filters,
        )
    }

    /// Delete a dataset
    pub async fn delete_dataset(&self, dataset_id: &str) -> Result<()> {
        self.api.delete(&self.dataset_path(dataset_id)).await
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// List items of a dataset (cursor iteration)
    pub fn list_items(&self, dataset_id: &str, filters: ListFilters) -> CursorIter<DatasetItem> {
        let fetcher = Arc::new(ItemPageFetcher {
            api: self.api.clone(),
            path: self.items_path(dataset_id),
        });
        let downloader: Arc<dyn Downloader> = self.api.clone();
        let dataset_id = dataset_id.to_string();
        CursorIter::new(
            fetcher,
            Arc::new(move |value| DatasetItem::from_value(&dataset_id, value, downloader.clone())),
            filters,
        )
    }

    /// List items and eagerly download their source data
    ///
    /// Prefetch consumption mode: up to `workers` concurrent downloads,
    /// yielding [`ItemPayload`] in completion order. A failed download
    /// surfaces to the consumer; it is not skipped.
    pub fn list_items_content(
        &self,
        dataset_id: &str,
        filters: ListFilters,
        workers: usize,
    ) -> Prefetch<DatasetItem, ItemPayload> {
        self.list_items(dataset_id, filters)
            .prefetch(workers, |item: DatasetItem| async move {
                let data = item.payloads().await?;
                Ok(ItemPayload { item, data })
            })
    }

    /// Fetch one item
    pub async fn get_item(&self, dataset_id: &str, item_id: &str) -> Result<DatasetItem> {
        let path = format!("{}/{item_id}", self.items_path(dataset_id));
        let value: JsonValue = self.api.get_json(&path, RequestConfig::new()).await?;
        DatasetItem::from_value(dataset_id, value, self.api.clone())
    }

    /// Register one item
    pub async fn create_item(
        &self,
        dataset_id: &str,
        attributes: JsonValue,
        source_data: Vec<JsonValue>,
    ) -> Result<DatasetItem> {
        let body = json!({
            "attributes": attributes,
            "source_data": source_data,
        });
        let value: JsonValue = self
            .api
            .post_json(&self.items_path(dataset_id), RequestConfig::new().json(body))
            .await?;
        DatasetItem::from_value(dataset_id, value, self.api.clone())
    }

    /// Delete an item
    pub async fn delete_item(&self, dataset_id: &str, item_id: &str) -> Result<()> {
        let path = format!("{}/{item_id}", self.items_path(dataset_id));
        self.api.delete(&path).await
    }
}
