//! Training entity types
//!
//! `Job` and `Model` carry a lazy back-reference to their parent resource.
//! The reference is resolved on first access and memoized in a
//! single-assignment cell; listing or constructing the entity never
//! triggers the extra fetch.

use super::TrainingClient;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::OnceCell;

// ============================================================================
// Job Definition
// ============================================================================

/// A named training recipe; versions hold the concrete image and command
#[derive(Debug, Clone, Deserialize)]
pub struct JobDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latest_version: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

/// One immutable version of a job definition
#[derive(Debug, Clone, Deserialize)]
pub struct JobDefinitionVersion {
    pub version: u64,
    #[serde(default)]
    pub docker_image: Option<String>,
    #[serde(default)]
    pub command: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Job
// ============================================================================

/// Lifecycle state of a training job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Stopped,
    /// Status string the client does not know about
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// True when the job will not change state again
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Stopped)
    }
}

/// Wire shape of one job record
#[derive(Debug, Deserialize)]
struct JobRecord {
    job_id: String,
    status: JobStatus,
    #[serde(default)]
    version: Option<u64>,
    #[serde(default)]
    instance_type: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// One run of a job definition version
#[derive(Debug, Clone)]
pub struct Job {
    pub definition_name: String,
    pub job_id: String,
    pub status: JobStatus,
    pub version: Option<u64>,
    pub instance_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    definition: OnceCell<JobDefinition>,
}

impl Job {
    /// Build a job entity from one raw page entry. Pure; no I/O.
    pub(crate) fn from_value(definition_name: &str, value: JsonValue) -> Result<Self> {
        let record: JobRecord = serde_json::from_value(value)?;
        Ok(Self {
            definition_name: definition_name.to_string(),
            job_id: record.job_id,
            status: record.status,
            version: record.version,
            instance_type: record.instance_type,
            created_at: record.created_at,
            definition: OnceCell::new(),
        })
    }

    /// Resolve the parent job definition, fetching it at most once
    pub async fn definition(&self, client: &TrainingClient) -> Result<&JobDefinition> {
        self.definition
            .get_or_try_init(|| client.get_job_definition(&self.definition_name))
            .await
    }
}

// ============================================================================
// Model
// ============================================================================

/// Wire shape of one model record
#[derive(Debug, Deserialize)]
struct ModelRecord {
    model_id: String,
    name: String,
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    artifact_uri: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// A trained model artifact registered under a job definition
#[derive(Debug, Clone)]
pub struct Model {
    pub definition_name: String,
    pub model_id: String,
    pub name: String,
    /// Absent for models imported from outside the platform
    pub job_id: Option<String>,
    pub artifact_uri: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    job: OnceCell<Job>,
}

impl Model {
    /// Build a model entity from one raw page entry. Pure; no I/O.
    pub(crate) fn from_value(definition_name: &str, value: JsonValue) -> Result<Self> {
        let record: ModelRecord = serde_json::from_value(value)?;
        Ok(Self {
            definition_name: definition_name.to_string(),
            model_id: record.model_id,
            name: record.name,
            job_id: record.job_id,
            artifact_uri: record.artifact_uri,
            created_at: record.created_at,
            job: OnceCell::new(),
        })
    }

    /// Resolve the job that produced this model, fetching it at most once.
    ///
    /// Fails with [`Error::MissingReference`] when the model carries no
    /// `job_id` (imported models have none).
    pub async fn job(&self, client: &TrainingClient) -> Result<&Job> {
        self.job
            .get_or_try_init(|| async {
                let job_id = self
                    .job_id
                    .as_deref()
                    .ok_or_else(|| Error::missing_reference("model", "job_id"))?;
                client.get_job(&self.definition_name, job_id).await
            })
            .await
    }
}
