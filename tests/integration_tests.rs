//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: BasinClient → HTTP requests → typed
//! entities, across both pagination modes and the prefetch download path.

use basin_client::{BasinClient, ClientConfig, ListFilters};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> BasinClient {
    let config = ClientConfig::new("integration-token", "org-42")
        .with_api_url(base_url)
        .with_retries(0);
    BasinClient::new(config).unwrap()
}

fn file_record(server: &MockServer, file_id: &str) -> serde_json::Value {
    json!({
        "file_id": file_id,
        "content_type": "image/png",
        "download_uri": format!("{}/blobs/{file_id}", server.uri()),
        "uploaded_at": "2024-05-10T08:30:00Z",
        "metadata": { "x-basin-meta-camera": "front" }
    })
}

// ============================================================================
// Cursor pagination end-to-end
// ============================================================================

#[tokio::test]
async fn test_file_listing_follows_cursor_tokens() {
    let server = MockServer::start().await;

    // Continuation request carries only the token, no filters.
    Mock::given(method("GET"))
        .and(path("/organizations/org-42/channels/cam/files"))
        .and(query_param("next_page_token", "page-2"))
        .and(header("Authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [file_record(&server, "f-3")],
            "next_page_token": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-42/channels/cam/files"))
        .and(query_param("items_per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [file_record(&server, "f-1"), file_record(&server, "f-2")],
            "next_page_token": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut files = client
        .datalake()
        .list_files("cam", ListFilters::new().items_per_page(2));

    let mut ids = Vec::new();
    while let Some(file) = files.next().await.unwrap() {
        ids.push(file.file_id);
    }
    assert_eq!(ids, vec!["f-1", "f-2", "f-3"]);
}

// ============================================================================
// Offset pagination end-to-end
// ============================================================================

#[tokio::test]
async fn test_channel_listing_reports_size_and_stops_at_total() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-42/channels"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channels": [
                { "channel_id": "c-1", "name": "front", "storage_type": "object" },
                { "channel_id": "c-2", "name": "rear", "storage_type": "object" }
            ],
            "total": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-42/channels"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channels": [
                { "channel_id": "c-3", "name": "side", "storage_type": "object" }
            ],
            "total": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut channels = client
        .datalake()
        .list_channels(ListFilters::new().items_per_page(2));

    assert_eq!(channels.size().await.unwrap(), 3);
    let all = channels.collect_remaining().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].channel_id, "c-3");
    // The two mounted mocks verify no trailing fetch happened past the total.
}

// ============================================================================
// Prefetch download end-to-end
// ============================================================================

#[tokio::test]
async fn test_bulk_file_download_yields_all_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-42/channels/cam/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                file_record(&server, "f-1"),
                file_record(&server, "f-2"),
                file_record(&server, "f-3")
            ],
            "next_page_token": null
        })))
        .mount(&server)
        .await;

    for id in ["f-1", "f-2", "f-3"] {
        Mock::given(method("GET"))
            .and(path(format!("/blobs/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(id.as_bytes().to_vec())
                    .set_delay(Duration::from_millis(10)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = test_client(&server.uri());
    let mut downloads = client
        .datalake()
        .list_files_content("cam", ListFilters::new(), 2);

    let mut seen = Vec::new();
    while let Some(fetched) = downloads.next().await {
        let content = fetched.unwrap();
        assert_eq!(content.data.as_ref(), content.file.file_id.as_bytes());
        seen.push(content.file.file_id);
    }
    seen.sort();
    assert_eq!(seen, vec!["f-1", "f-2", "f-3"]);
}

// ============================================================================
// Retry behavior through the full stack
// ============================================================================

#[tokio::test]
async fn test_transient_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-42/datasets/ds-1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-42/datasets/ds-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dataset_id": "ds-1",
            "name": "pets",
            "type": "classification"
        })))
        .mount(&server)
        .await;

    let config = ClientConfig::new("integration-token", "org-42")
        .with_api_url(server.uri())
        .with_retries(2);
    let client = BasinClient::new(config).unwrap();

    let dataset = client.datasets().get_dataset("ds-1").await.unwrap();
    assert_eq!(dataset.name, "pets");
}

#[tokio::test]
async fn test_metadata_round_trips_through_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/org-42/channels/cam/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [file_record(&server, "f-1")],
            "next_page_token": null
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut files = client.datalake().list_files("cam", ListFilters::new());
    let file = files.next().await.unwrap().unwrap();

    // The wire prefix is stripped at the marshalling boundary.
    assert_eq!(file.metadata.get("camera"), Some("front"));
}
