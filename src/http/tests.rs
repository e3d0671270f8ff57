//! Tests for the HTTP transport

use super::*;
use crate::config::ClientConfig;
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::new("test-token", "org-1")
        .with_api_url(base_url)
        .with_backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
}

#[tokio::test]
async fn test_get_json_carries_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server.uri())).unwrap();
    let body: serde_json::Value = client.get_json("/ping", RequestConfig::new()).await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_query_params_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("items_per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server.uri())).unwrap();
    let config = RequestConfig::new().query("items_per_page", "10");
    let body: serde_json::Value = client.get_json("/list", config).await.unwrap();
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server.uri())).unwrap();
    let body: serde_json::Value = client
        .get_json("/flaky", RequestConfig::new())
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such channel"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server.uri())).unwrap();
    let err = client
        .get_json::<serde_json::Value>("/missing", RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        crate::error::Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such channel");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_download_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server.uri())).unwrap();
    let bytes = client
        .download(&format!("{}/blob", server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), b"payload");
}

#[test]
fn test_backoff_calculation() {
    let config = ClientConfig::new("t", "o").with_backoff(
        BackoffType::Exponential,
        Duration::from_millis(100),
        Duration::from_secs(1),
    );
    let client = ApiClient::new(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    // Capped at max_backoff
    assert_eq!(client.calculate_backoff(10), Duration::from_secs(1));
}
