//! Top-level platform client

use crate::config::ClientConfig;
use crate::datalake::DatalakeClient;
use crate::dataset::DatasetClient;
use crate::error::Result;
use crate::http::ApiClient;
use crate::training::TrainingClient;
use std::sync::Arc;

/// Entry point to the Basin platform APIs.
///
/// Owns one [`ApiClient`] transport; the per-resource clients returned by
/// [`datalake`](Self::datalake), [`datasets`](Self::datasets) and
/// [`training`](Self::training) share it.
#[derive(Debug, Clone)]
pub struct BasinClient {
    api: Arc<ApiClient>,
}

impl BasinClient {
    /// Create a client from an explicit configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            api: Arc::new(ApiClient::new(config)?),
        })
    }

    /// Create a client from `BASIN_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Datalake APIs: channels and files
    pub fn datalake(&self) -> DatalakeClient {
        DatalakeClient::new(self.api.clone())
    }

    /// Dataset APIs: datasets and items
    pub fn datasets(&self) -> DatasetClient {
        DatasetClient::new(self.api.clone())
    }

    /// Training APIs: job definitions, versions, jobs, models
    pub fn training(&self) -> TrainingClient {
        TrainingClient::new(self.api.clone())
    }
}
