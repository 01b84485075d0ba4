//! HTTP boundary tests: drive the router directly with `oneshot`

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use faleproxy::server::router;
use faleproxy::{Relay, ServerConfig};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Yale University Test Page</title></head>
<body>
  <h1>Welcome to Yale University</h1>
  <a href="https://www.yale.edu/about">About Yale</a>
  <img src="https://www.yale.edu/images/logo.png" alt="Yale Logo">
  <script>window.school = "Yale";</script>
</body>
</html>
"#;

fn app() -> Router {
    router(Relay::default(), &ServerConfig::default())
}

async fn post_fetch(app: Router, content_type: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/fetch")
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn mock_upstream() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SAMPLE_HTML, "text/html"))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_fetch_end_to_end() {
    let upstream = mock_upstream().await;
    let url = format!("{}/", upstream.uri());

    let (status, body) = post_fetch(
        app(),
        "application/json",
        json!({ "url": url }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["title"], "Fale University Test Page");
    assert_eq!(body["originalUrl"], url.as_str());
    assert_eq!(body["replacementCount"], 3);

    let content = body["content"].as_str().unwrap();
    assert!(content.contains("Welcome to Fale University"));
    assert!(content.contains(">About Fale<"));
    assert!(content.contains(r#"href="https://www.yale.edu/about""#));
    assert!(content.contains(r#"alt="Yale Logo""#));
    assert!(content.contains(r#"window.school = "Yale";"#));
}

#[tokio::test]
async fn test_fetch_form_encoded() {
    let upstream = mock_upstream().await;
    let url = format!("{}/", upstream.uri());
    let form = format!("url={}", url.replace(':', "%3A").replace('/', "%2F"));

    let (status, body) = post_fetch(app(), "application/x-www-form-urlencoded", form).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["originalUrl"], url.as_str());
    assert_eq!(body["title"], "Fale University Test Page");
}

#[tokio::test]
async fn test_missing_url() {
    let (status, body) = post_fetch(app(), "application/json", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "URL is required" }));
}

#[tokio::test]
async fn test_empty_url() {
    let (status, body) = post_fetch(app(), "application/json", r#"{"url":""}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "URL is required" }));
}

#[tokio::test]
async fn test_missing_body_content_type() {
    let (status, body) = post_fetch(app(), "text/plain", "https://example.com").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "URL is required" }));
}

#[tokio::test]
async fn test_malformed_json() {
    let (status, body) = post_fetch(app(), "application/json", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body: "));
}

#[tokio::test]
async fn test_unreachable_host() {
    let (status, body) = post_fetch(
        app(),
        "application/json",
        r#"{"url":"http://127.0.0.1:1/"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch content: "));
}

#[tokio::test]
async fn test_upstream_not_found() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&upstream)
        .await;

    let url = format!("{}/gone", upstream.uri());
    let (status, body) = post_fetch(app(), "application/json", json!({ "url": url }).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to fetch content: HTTP status 404 Not Found"
    );
}

#[tokio::test]
async fn test_invalid_scheme() {
    let (status, body) = post_fetch(
        app(),
        "application/json",
        r#"{"url":"ftp://example.com/"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to fetch content: Invalid URL: must start with http:// or https://"
    );
}

#[tokio::test]
async fn test_static_index_served() {
    let public_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../public");
    let config = ServerConfig {
        public_dir: Some(public_dir),
        ..Default::default()
    };
    let app = router(Relay::default(), &config);

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<title>Faleproxy</title>"));
}

#[tokio::test]
async fn test_no_static_without_public_dir() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
