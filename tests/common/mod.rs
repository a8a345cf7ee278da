//! Common test utilities for integration tests
//!
//! Builds a relay router pointed at a mock remote service and provides
//! request and response helpers.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use jira_relay::domain::models::JiraConfig;
use jira_relay::{router, AppState, Config, JiraClient, TrackerClient};

pub const AUTH: &str = "Basic YW5uQGFjbWUuY29tOmFwaS10b2tlbg==";
pub const BOUNDARY: &str = "relay-test-boundary";

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Configuration pointing at `base_url`, staging uploads in `staging`
pub fn config_for(base_url: &str, staging: &Path) -> Config {
    let mut config = Config::default();
    config.jira = JiraConfig::for_site(base_url);
    config.uploads.staging_dir = Some(staging.to_path_buf());
    config
}

pub fn relay(config: &Config) -> Router {
    let client: Arc<dyn TrackerClient> =
        Arc::new(JiraClient::new(&config.jira).expect("client should build"));
    router(AppState::new(client, config))
}

pub fn json_post(uri: &str, body: &Value, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn request(method: &str, uri: &str, auth: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(body).unwrap()
}

/// Multipart body with an optional `issueKey` field and an optional `file`
pub fn multipart_body(issue_key: Option<&str>, file: Option<(&str, &[u8])>) -> Body {
    let mut body = Vec::new();
    if let Some(key) = issue_key {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"issueKey\"\r\n\r\n{key}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: text/plain\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

pub fn multipart_post(uri: &str, auth: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(body).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable")
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

/// Number of entries left in a staging directory
pub fn staged_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// Mocks that fail verification if the relay calls the remote service at all
pub async fn expect_no_calls(server: &mut mockito::ServerGuard) -> Vec<mockito::Mock> {
    let mut mocks = Vec::new();
    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        mocks.push(
            server
                .mock(method, mockito::Matcher::Any)
                .expect(0)
                .create_async()
                .await,
        );
    }
    mocks
}

pub async fn assert_all(mocks: &[mockito::Mock]) {
    for mock in mocks {
        mock.assert_async().await;
    }
}
