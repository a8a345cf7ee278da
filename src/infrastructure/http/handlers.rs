//! One handler per relay operation.
//!
//! The [`Credential`] extractor comes first in every handler so that a
//! missing credential is rejected before the body is read or any remote call
//! is made.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, Method, Uri};
use axum::Json;
use serde_json::{json, Value};

use super::extract::{header_credential, JsonBody};
use super::server::AppState;
use super::uploads::stage_upload;
use crate::domain::error::GatewayError;
use crate::domain::models::operations::{
    AddCommentRequest, CreateIssueRequest, DownloadQuery, IssueKeyRequest, IssuePeople,
    NotificationSent, ReporterUpdated, SendNotificationRequest, TransitionApplied,
    TransitionRequest, UpdateReporterRequest,
};
use crate::domain::models::{Credential, RemoteResponse};

type Relayed = Result<RemoteResponse, GatewayError>;

pub async fn proxy(
    credential: Credential,
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Relayed {
    // The wildcard capture is percent-decoded, so the tail is cut from the
    // raw URI to keep `%2F` and `%3F` inside their segment.
    let path = uri.path().strip_prefix("/api").unwrap_or_else(|| uri.path());
    state
        .proxy
        .forward(&credential, method, path, uri.query(), body.to_vec())
        .await
}

pub async fn add_comment(
    credential: Credential,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddCommentRequest>,
) -> Relayed {
    state.issues.add_comment(&credential, request).await
}

pub async fn add_attachment(
    credential: Credential,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Relayed {
    let form = stage_upload(multipart?, &state.uploads).await?;
    state
        .attachments
        .upload(&credential, form.issue_key, form.file)
        .await
}

pub async fn list_attachments(
    credential: Credential,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<IssueKeyRequest>,
) -> Result<Json<Vec<Value>>, GatewayError> {
    state.attachments.list(&credential, request).await.map(Json)
}

/// Browser links cannot set headers, so the credential may also arrive as `?auth=`.
pub async fn download_attachment(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<DownloadQuery>, axum::extract::rejection::QueryRejection>,
) -> Relayed {
    let Query(query) = query?;
    let credential = query
        .auth
        .and_then(Credential::new)
        .or_else(|| header_credential(&headers))
        .ok_or(GatewayError::MissingCredential)?;

    state.attachments.download(&credential, query.url).await
}

pub async fn get_issue_reporter(
    credential: Credential,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<IssueKeyRequest>,
) -> Result<Json<IssuePeople>, GatewayError> {
    state.people.issue_people(&credential, request).await.map(Json)
}

pub async fn update_issue_reporter(
    credential: Credential,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateReporterRequest>,
) -> Result<Json<ReporterUpdated>, GatewayError> {
    state.people.update_reporter(&credential, request).await.map(Json)
}

pub async fn send_notification(
    credential: Credential,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SendNotificationRequest>,
) -> Result<Json<NotificationSent>, GatewayError> {
    state.notifications.send(&credential, request).await.map(Json)
}

pub async fn execute_transition(
    credential: Credential,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TransitionRequest>,
) -> Result<Json<TransitionApplied>, GatewayError> {
    state
        .issues
        .execute_transition(&credential, request)
        .await
        .map(Json)
}

pub async fn create_issue(
    credential: Credential,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateIssueRequest>,
) -> Relayed {
    state.issues.create_issue(&credential, request).await
}

pub async fn healthz() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
