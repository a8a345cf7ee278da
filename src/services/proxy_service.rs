//! Generic path pass-through.

use reqwest::Method;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::error::GatewayError;
use crate::domain::models::{Credential, RemoteResponse};
use crate::domain::ports::{ForwardRequest, TrackerClient};

pub struct ProxyService<C: TrackerClient + ?Sized> {
    client: Arc<C>,
}

impl<C: TrackerClient + ?Sized> ProxyService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Forward one request to `{base_url}/{path}`.
    ///
    /// The remote response is relayed whatever its status; only transport
    /// failures become errors.
    #[instrument(skip(self, credential, query, body))]
    pub async fn forward(
        &self,
        credential: &Credential,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Vec<u8>,
    ) -> Result<RemoteResponse, GatewayError> {
        let request = build_forward_request(method, path, query, body);
        self.client.forward(credential, request).await
    }
}

fn carries_body(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Outbound request for an inbound `/api/{path}?{query}`
pub fn build_forward_request(
    method: Method,
    path: &str,
    query: Option<&str>,
    body: Vec<u8>,
) -> ForwardRequest {
    let mut path_and_query = format!("/{}", path.trim_start_matches('/'));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    let body = (carries_body(&method) && !body.is_empty()).then_some(body);
    ForwardRequest {
        method,
        path_and_query,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RelayBody;
    use crate::services::test_support::{client_for, credential, AUTH};
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_build_keeps_query() {
        let request = build_forward_request(
            Method::GET,
            "rest/api/3/search",
            Some("jql=project%3DABC&maxResults=5"),
            Vec::new(),
        );
        assert_eq!(
            request.path_and_query,
            "/rest/api/3/search?jql=project%3DABC&maxResults=5"
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn test_body_only_for_mutating_methods() {
        let get = build_forward_request(Method::GET, "x", None, b"{}".to_vec());
        assert!(get.body.is_none());

        let put = build_forward_request(Method::PUT, "x", None, b"{}".to_vec());
        assert_eq!(put.body.as_deref(), Some(&b"{}"[..]));

        let empty_post = build_forward_request(Method::POST, "x", None, Vec::new());
        assert!(empty_post.body.is_none());
    }

    #[tokio::test]
    async fn test_forward_sends_relay_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/3/issue/ABC-1/watchers")
            .match_header("authorization", AUTH)
            .match_header("accept", "application/json")
            .match_header("content-type", "application/json")
            .match_header("x-atlassian-token", "no-check")
            .match_header("x-experimentalapi", "opt-in")
            .match_header("user-agent", Matcher::Regex("^jira-relay/".to_string()))
            .match_body(r#""5b10ac8d82e05b22cc7d4ef5""#)
            .with_status(204)
            .create_async()
            .await;
        let service = ProxyService::new(client_for(&server));

        let relayed = service
            .forward(
                &credential(),
                Method::POST,
                "rest/api/3/issue/ABC-1/watchers",
                None,
                br#""5b10ac8d82e05b22cc7d4ef5""#.to_vec(),
            )
            .await
            .unwrap();

        assert_eq!(relayed.status, reqwest::StatusCode::NO_CONTENT);
        assert_eq!(relayed.body, RelayBody::Empty);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_forward_relays_remote_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/api/3/issue/NOPE-1")
            .with_status(404)
            .with_body(r#"{"errorMessages":["Issue does not exist"]}"#)
            .create_async()
            .await;
        let service = ProxyService::new(client_for(&server));

        let relayed = service
            .forward(&credential(), Method::GET, "rest/api/3/issue/NOPE-1", None, Vec::new())
            .await
            .unwrap();

        assert_eq!(relayed.status, reqwest::StatusCode::NOT_FOUND);
        assert_eq!(
            relayed.json(),
            Some(&json!({ "errorMessages": ["Issue does not exist"] }))
        );
    }

    #[tokio::test]
    async fn test_forward_wraps_non_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/status")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;
        let service = ProxyService::new(client_for(&server));

        let relayed = service
            .forward(&credential(), Method::GET, "status", None, Vec::new())
            .await
            .unwrap();

        assert_eq!(relayed.status, reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(relayed.json(), Some(&json!({ "error": "Bad Gateway" })));
    }
}
