//! Integration tests for the HTTP client.

use select3_net::NetworkError;
use select3_net::http::{DEFAULT_TIMEOUT, HttpClient, HttpClientBuilder};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_client_creation() {
    let client = HttpClient::new();
    assert_eq!(client.config().timeout, DEFAULT_TIMEOUT);
    assert!(client.config().user_agent.starts_with("select3/"));
}

#[tokio::test]
async fn test_client_builder() {
    let client = HttpClientBuilder::new()
        .timeout(Duration::from_secs(60))
        .build()
        .expect("Failed to build client");

    assert_eq!(client.config().timeout, Duration::from_secs(60));
}

#[tokio::test]
async fn test_request_headers() {
    let client = HttpClient::new();

    let request = client
        .get("https://example.com/api/users?q=ali")
        .header("Accept", "application/json")
        .header("bad header", "x");

    assert_eq!(request.headers().len(), 1);
    assert_eq!(request.headers()["accept"], "application/json");
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    client
        .get(format!("{}/ua", mock_server.uri()))
        .send()
        .await
        .expect("Request failed");

    let requests = mock_server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("select3/"));
}

#[tokio::test]
async fn test_relative_url_is_rejected() {
    let client = HttpClient::new();
    let result = client.get("/api/users?q=ali").send().await;
    assert!(matches!(result, Err(NetworkError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_get_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("q", "ali"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"login": "alice", "id": 7}])),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let response = client
        .get(format!("{}/api/users?q=ali", mock_server.uri()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    assert!(response.is_success());

    let data: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(data[0]["login"], "alice");
    assert_eq!(data[0]["id"], 7);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let response = client
        .get(format!("{}/broken", mock_server.uri()))
        .send()
        .await
        .expect("Request failed");

    let result: Result<serde_json::Value, _> = response.json().await;
    assert!(matches!(result, Err(NetworkError::Json(_))));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = HttpClient::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .expect("Failed to build client");

    let result = client.get(format!("{}/slow", mock_server.uri())).send().await;

    assert!(matches!(result, Err(NetworkError::Timeout)));
}

#[tokio::test]
async fn test_error_status_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/not-found"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let response = client
        .get(format!("{}/not-found", mock_server.uri()))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 404);
    assert!(!response.is_success());

    let err = response.error_for_status_with_body().await.unwrap_err();
    assert_eq!(
        err,
        NetworkError::HttpStatus {
            status: 404,
            message: Some("Not Found".to_string()),
        }
    );
}
