//! Training resource layer: job definitions, versions, jobs, and models
//!
//! Every training listing is offset/sized: the server reports a total
//! count alongside each page, and [`OffsetIter::size`] exposes it without
//! a separate count endpoint.

mod types;

pub use types::{Job, JobDefinition, JobDefinitionVersion, JobStatus, Model};

use crate::error::{Error, Result};
use crate::http::{ApiClient, RequestConfig};
use crate::paging::{ListFilters, OffsetIter, PageFetcher, PageRequest, RawPage};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

// ============================================================================
// Page shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefinitionListPage {
    definitions: Vec<JsonValue>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct VersionListPage {
    versions: Vec<JsonValue>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct JobListPage {
    jobs: Vec<JsonValue>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ModelListPage {
    models: Vec<JsonValue>,
    total: u64,
}

// ============================================================================
// Page fetchers
// ============================================================================

struct DefinitionPageFetcher {
    api: Arc<ApiClient>,
    path: String,
}

#[async_trait]
impl PageFetcher for DefinitionPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage> {
        let config = RequestConfig::new().query_all(request.to_query());
        let page: DefinitionListPage = self.api.get_json(&self.path, config).await?;
        Ok(RawPage::sized(page.definitions, page.total))
    }
}

struct VersionPageFetcher {
    api: Arc<ApiClient>,
    path: String,
}

#[async_trait]
impl PageFetcher for VersionPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage> {
        let config = RequestConfig::new().query_all(request.to_query());
        let page: VersionListPage = self.api.get_json(&self.path, config).await?;
        Ok(RawPage::sized(page.versions, page.total))
    }
}

struct JobPageFetcher {
    api: Arc<ApiClient>,
    path: String,
}

#[async_trait]
impl PageFetcher for JobPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage> {
        let config = RequestConfig::new().query_all(request.to_query());
        let page: JobListPage = self.api.get_json(&self.path, config).await?;
        Ok(RawPage::sized(page.jobs, page.total))
    }
}

struct ModelPageFetcher {
    api: Arc<ApiClient>,
    path: String,
}

#[async_trait]
impl PageFetcher for ModelPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RawPage> {
        let config = RequestConfig::new().query_all(request.to_query());
        let page: ModelListPage = self.api.get_json(&self.path, config).await?;
        Ok(RawPage::sized(page.models, page.total))
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the training APIs
#[derive(Debug, Clone)]
pub struct TrainingClient {
    api: Arc<ApiClient>,
}

impl TrainingClient {
    /// Create a training client over a shared transport
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn definitions_path(&self) -> String {
        format!(
            "organizations/{}/training/definitions",
            self.api.organization_id()
        )
    }

    fn definition_path(&self, name: &str) -> String {
        format!("{}/{name}", self.definitions_path())
    }

    // ------------------------------------------------------------------
    // Job definitions
    // ------------------------------------------------------------------

    /// List job definitions (offset/sized iteration)
    pub fn list_job_definitions(&self, filters: ListFilters) -> OffsetIter<JobDefinition> {
        let fetcher = Arc::new(DefinitionPageFetcher {
            api: self.api.clone(),
            path: self.definitions_path(),
        });
        OffsetIter::new(
            fetcher,
            Arc::new(|value| serde_json::from_value(value).map_err(Error::from)),
            filters,
        )
    }

    /// Fetch one job definition
    pub async fn get_job_definition(&self, name: &str) -> Result<JobDefinition> {
        self.api
            .get_json(&self.definition_path(name), RequestConfig::new())
            .await
    }

    /// List the versions of a job definition
    pub fn list_versions(
        &self,
        definition_name: &str,
        filters: ListFilters,
    ) -> OffsetIter<JobDefinitionVersion> {
        let fetcher = Arc::new(VersionPageFetcher {
            api: self.api.clone(),
            path: format!("{}/versions", self.definition_path(definition_name)),
        });
        OffsetIter::new(
            fetcher,
            Arc::new(|value| serde_json::from_value(value).map_err(Error::from)),
            filters,
        )
    }

    // ------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------

    /// List the jobs of a job definition
    pub fn list_jobs(&self, definition_name: &str, filters: ListFilters) -> OffsetIter<Job> {
        let fetcher = Arc::new(JobPageFetcher {
            api: self.api.clone(),
            path: format!("{}/jobs", self.definition_path(definition_name)),
        });
        let definition_name = definition_name.to_string();
        OffsetIter::new(
            fetcher,
            Arc::new(move |value| Job::from_value(&definition_name, value)),
            filters,
        )
    }

    /// Fetch one job
    pub async fn get_job(&self, definition_name: &str, job_id: &str) -> Result<Job> {
        let path = format!("{}/jobs/{job_id}", self.definition_path(definition_name));
        let value: JsonValue = self.api.get_json(&path, RequestConfig::new()).await?;
        Job::from_value(definition_name, value)
    }

    // ------------------------------------------------------------------
    // Models
    // ------------------------------------------------------------------

    /// List the models of a job definition
    pub fn list_models(&self, definition_name: &str, filters: ListFilters) -> OffsetIter<Model> {
        let fetcher = Arc::new(ModelPageFetcher {
            api: self.api.clone(),
            path: format!("{}/models", self.definition_path(definition_name)),
        });
        let definition_name = definition_name.to_string();
        OffsetIter::new(
            fetcher,
            Arc::new(move |value| Model::from_value(&definition_name, value)),
            filters,
        )
    }

    /// Fetch one model
    pub async fn get_model(&self, definition_name: &str, model_id: &str) -> Result<Model> {
        let path = format!("{}/models/{model_id}", self.definition_path(definition_name));
        let value: JsonValue = self.api.get_json(&path, RequestConfig::new()).await?;
        Model::from_value(definition_name, value)
    }
}

#[cfg(test)]
mod tests;
