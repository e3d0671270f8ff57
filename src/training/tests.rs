//! Tests for the training resource layer

use super::*;
use crate::config::ClientConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TrainingClient {
    let config = ClientConfig::new("test-token", "org-1")
        .with_api_url(base_url)
        .with_retries(0);
    TrainingClient::new(Arc::new(ApiClient::new(config).unwrap()))
}

fn job_record(job_id: &str, status: &str) -> JsonValue {
    json!({
        "job_id": job_id,
        "status": status,
        "version": 3,
        "instance_type": "gpu.small",
        "created_at": "2024-03-01T12:00:00Z"
    })
}

#[tokio::test]
async fn test_list_jobs_with_size() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet/jobs"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [job_record("j-1", "succeeded"), job_record("j-2", "running")],
            "total": 3
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet/jobs"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [job_record("j-3", "failed")],
            "total": 3
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut iter = client.list_jobs("resnet", ListFilters::new().items_per_page(2));

    assert_eq!(iter.size().await.unwrap(), 3);
    let jobs = iter.collect_remaining().await.unwrap();

    let ids: Vec<_> = jobs.iter().map(|j| j.job_id.as_str()).collect();
    assert_eq!(ids, vec!["j-1", "j-2", "j-3"]);
    assert_eq!(jobs[0].status, JobStatus::Succeeded);
    assert!(jobs[2].status.is_terminal());
}

#[tokio::test]
async fn test_job_definition_resolved_at_most_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet/jobs/j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_record("j-1", "running")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "resnet",
            "description": "image classifier",
            "latest_version": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let job = client.get_job("resnet", "j-1").await.unwrap();

    let first = job.definition(&client).await.unwrap();
    assert_eq!(first.name, "resnet");

    // Second access hits the memoized cell, not the server.
    let second = job.definition(&client).await.unwrap();
    assert_eq!(second.latest_version, Some(3));
}

#[tokio::test]
async fn test_listing_jobs_does_not_resolve_definitions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [job_record("j-1", "pending")],
            "total": 1
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "resnet" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let jobs = client
        .list_jobs("resnet", ListFilters::new())
        .collect_remaining()
        .await
        .unwrap();
    assert_eq!(jobs.len(), 1);
}

#[tokio::test]
async fn test_model_job_backref() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet/models/m-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_id": "m-1",
            "name": "resnet-best",
            "job_id": "j-1",
            "artifact_uri": "s3://models/m-1"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet/jobs/j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_record("j-1", "succeeded")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let model = client.get_model("resnet", "m-1").await.unwrap();

    let job = model.job(&client).await.unwrap();
    assert_eq!(job.job_id, "j-1");
    assert_eq!(job.status, JobStatus::Succeeded);

    // Memoized.
    model.job(&client).await.unwrap();
}

#[tokio::test]
async fn test_model_without_job_reference() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-1/training/definitions/resnet/models/m-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_id": "m-2",
            "name": "imported",
            "artifact_uri": "s3://models/m-2"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let model = client.get_model("resnet", "m-2").await.unwrap();

    let err = model.job(&client).await.unwrap_err();
    assert!(matches!(err, Error::MissingReference { .. }));
}

#[test]
fn test_unknown_job_status() {
    let status: JobStatus = serde_json::from_value(json!("paused")).unwrap();
    assert_eq!(status, JobStatus::Unknown);
    assert!(!status.is_terminal());
}

#[tokio::test]
async fn test_list_versions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/organizations/org-1/training/definitions/resnet/versions",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "versions": [
                { "version": 1, "docker_image": "registry/train:1" },
                { "version": 2, "docker_image": "registry/train:2", "command": ["python", "train.py"] }
            ],
            "total": 2
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let versions = client
        .list_versions("resnet", ListFilters::new())
        .collect_remaining()
        .await
        .unwrap();

    assert_eq!(versions.len(), 2);
    assert_eq!(versions[1].command.as_deref(), Some(["python".to_string(), "train.py".to_string()].as_slice()));
}
