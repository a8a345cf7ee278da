use async_trait::async_trait;
use reqwest::Method;

use crate::domain::error::GatewayError;
use crate::domain::models::payloads::{
    CommentPayload, CreateIssuePayload, NotifyPayload, ServiceDeskRequestPayload,
};
use crate::domain::models::tracker::{PeopleFields, ServiceDesk, TrackerUser};
use crate::domain::models::{Credential, RemoteResponse, StagedUpload};

/// A request relayed as-is by the generic path proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequest {
    pub method: Method,
    /// Path below the site root plus optional query, e.g. `/rest/api/3/myself?expand=groups`
    pub path_and_query: String,
    pub body: Option<Vec<u8>>,
}

/// Remote issue tracker operations used by the relay.
///
/// Methods returning [`RemoteResponse`] hand back the remote's answer whatever
/// its status, so callers decide what to relay. Methods returning typed values
/// map non-success statuses to [`GatewayError::Remote`].
///
/// No method retries.
#[async_trait]
pub trait TrackerClient: Send + Sync {
    /// Relay an arbitrary call below the site root
    async fn forward(
        &self,
        credential: &Credential,
        request: ForwardRequest,
    ) -> Result<RemoteResponse, GatewayError>;

    async fn add_comment(
        &self,
        credential: &Credential,
        issue_key: &str,
        payload: &CommentPayload,
    ) -> Result<RemoteResponse, GatewayError>;

    /// Stream a staged file to the issue's attachment endpoint
    async fn upload_attachment(
        &self,
        credential: &Credential,
        issue_key: &str,
        upload: &StagedUpload,
    ) -> Result<RemoteResponse, GatewayError>;

    /// `fields.attachment` of an issue, `None` when the field is absent
    async fn issue_attachments(
        &self,
        credential: &Credential,
        issue_key: &str,
    ) -> Result<Option<Vec<serde_json::Value>>, GatewayError>;

    async fn issue_people(
        &self,
        credential: &Credential,
        issue_key: &str,
    ) -> Result<PeopleFields, GatewayError>;

    async fn search_users(
        &self,
        credential: &Credential,
        query: &str,
    ) -> Result<Vec<TrackerUser>, GatewayError>;

    async fn set_reporter(
        &self,
        credential: &Credential,
        issue_key: &str,
        account_id: &str,
    ) -> Result<RemoteResponse, GatewayError>;

    async fn notify(
        &self,
        credential: &Credential,
        issue_key: &str,
        payload: &NotifyPayload,
    ) -> Result<RemoteResponse, GatewayError>;

    async fn transition(
        &self,
        credential: &Credential,
        issue_key: &str,
        transition_id: &str,
    ) -> Result<RemoteResponse, GatewayError>;

    async fn service_desks(&self, credential: &Credential)
        -> Result<Vec<ServiceDesk>, GatewayError>;

    async fn create_service_request(
        &self,
        credential: &Credential,
        payload: &ServiceDeskRequestPayload,
    ) -> Result<RemoteResponse, GatewayError>;

    async fn create_issue(
        &self,
        credential: &Credential,
        payload: &CreateIssuePayload,
    ) -> Result<RemoteResponse, GatewayError>;

    /// Fetch an absolute URL and keep the body as bytes
    async fn download(
        &self,
        credential: &Credential,
        url: &str,
    ) -> Result<RemoteResponse, GatewayError>;
}
