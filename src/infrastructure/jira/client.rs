use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client as ReqwestClient, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{CSRF_BYPASS_HEADER, CSRF_BYPASS_VALUE, EXPERIMENTAL_API_HEADER, EXPERIMENTAL_API_VALUE};
use crate::domain::error::GatewayError;
use crate::domain::models::payloads::{
    CommentPayload, CreateIssuePayload, NotifyPayload, ReporterUpdatePayload,
    ServiceDeskRequestPayload, TransitionPayload,
};
use crate::domain::models::tracker::{
    AttachmentFields, IssueEnvelope, Page, PeopleFields, ServiceDesk, TrackerUser,
};
use crate::domain::models::{Credential, JiraConfig, RelayBody, RemoteResponse, StagedUpload};
use crate::domain::ports::{ForwardRequest, TrackerClient};

const JSON: &str = "application/json";
const SERVICE_DESK_PAGE_SIZE: u32 = 50;

/// HTTP client for the remote issue tracker
///
/// One pooled `reqwest::Client` is shared by every request the relay handles.
/// The caller's credential is attached per call and never stored.
pub struct JiraClient {
    http_client: ReqwestClient,
    base_url: Url,
    user_agent: String,
}

impl JiraClient {
    /// Build a client for the configured site
    pub fn new(config: &JiraConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Base URL cannot carry a path: {}", config.base_url);
        }

        info!(
            "Initializing tracker client: base_url={}, timeout={}s",
            base_url, config.request_timeout_secs
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .tcp_nodelay(true)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Site URL with `segments` appended; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn issue_endpoint(&self, issue_key: &str, tail: &[&str]) -> Url {
        let mut segments = vec!["rest", "api", "3", "issue", issue_key];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    fn authorized(builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, credential.expose())
            .header(ACCEPT, JSON)
    }

    async fn send_json<T: serde::Serialize + ?Sized + Sync>(
        &self,
        builder: RequestBuilder,
        credential: &Credential,
        payload: &T,
    ) -> Result<RemoteResponse, GatewayError> {
        let response = Self::authorized(builder, credential)
            .json(payload)
            .send()
            .await?;
        relay_json(response).await
    }

    async fn get_typed<T: DeserializeOwned>(
        &self,
        url: Url,
        credential: &Credential,
    ) -> Result<T, GatewayError> {
        debug!("GET {}", url);
        let response = Self::authorized(self.http_client.get(url), credential)
            .send()
            .await?;
        decode(relay_json(response).await?)
    }
}

/// Read a remote response completely and apply the JSON relay rule
async fn relay_json(response: Response) -> Result<RemoteResponse, GatewayError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    debug!("Response status: {}", status);
    if !status.is_success() {
        warn!("Remote service returned {}", status);
    }
    Ok(RemoteResponse::from_json_body(status, &bytes))
}

/// Decode a successful JSON response into a typed model
fn decode<T: DeserializeOwned>(relayed: RemoteResponse) -> Result<T, GatewayError> {
    let relayed = relayed.into_success()?;
    let value = match relayed.body {
        RelayBody::Json(value) => value,
        RelayBody::Empty | RelayBody::Bytes { .. } => Value::Null,
    };
    serde_json::from_value(value).map_err(|e| {
        GatewayError::Transport(format!("Unexpected response from remote service: {e}"))
    })
}

fn header_string(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl TrackerClient for JiraClient {
    #[instrument(skip(self, credential, request), fields(method = %request.method, path = %request.path_and_query))]
    async fn forward(
        &self,
        credential: &Credential,
        request: ForwardRequest,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path_and_query
        );
        debug!("Forwarding {} {}", request.method, url);

        let mut builder = self
            .http_client
            .request(request.method, url)
            .header(AUTHORIZATION, credential.expose())
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .header(USER_AGENT, &self.user_agent)
            .header(CSRF_BYPASS_HEADER, CSRF_BYPASS_VALUE)
            .header(EXPERIMENTAL_API_HEADER, EXPERIMENTAL_API_VALUE);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        relay_json(builder.send().await?).await
    }

    #[instrument(skip(self, credential, payload))]
    async fn add_comment(
        &self,
        credential: &Credential,
        issue_key: &str,
        payload: &CommentPayload,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = self.issue_endpoint(issue_key, &["comment"]);
        self.send_json(self.http_client.post(url), credential, payload)
            .await
    }

    #[instrument(skip(self, credential, upload), fields(file = %upload.file_name(), size = upload.size()))]
    async fn upload_attachment(
        &self,
        credential: &Credential,
        issue_key: &str,
        upload: &StagedUpload,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = self.issue_endpoint(issue_key, &["attachments"]);
        let file = tokio::fs::File::open(upload.path()).await?;

        let mut part = Part::stream_with_length(Body::from(file), upload.size())
            .file_name(upload.file_name().to_string());
        if let Some(content_type) = upload.content_type() {
            part = part.mime_str(content_type).map_err(|_| {
                GatewayError::InvalidRequest(format!("Invalid content type: {content_type}"))
            })?;
        }
        let form = Form::new().part("file", part);

        debug!("POST {}", url);
        let response = Self::authorized(self.http_client.post(url), credential)
            .header(CSRF_BYPASS_HEADER, CSRF_BYPASS_VALUE)
            .multipart(form)
            .send()
            .await?;
        relay_json(response).await
    }

    #[instrument(skip(self, credential))]
    async fn issue_attachments(
        &self,
        credential: &Credential,
        issue_key: &str,
    ) -> Result<Option<Vec<Value>>, GatewayError> {
        let mut url = self.issue_endpoint(issue_key, &[]);
        url.query_pairs_mut().append_pair("fields", "attachment");

        let issue: IssueEnvelope<AttachmentFields> = self.get_typed(url, credential).await?;
        Ok(issue.fields.and_then(|fields| fields.attachment))
    }

    #[instrument(skip(self, credential))]
    async fn issue_people(
        &self,
        credential: &Credential,
        issue_key: &str,
    ) -> Result<PeopleFields, GatewayError> {
        let mut url = self.issue_endpoint(issue_key, &[]);
        url.query_pairs_mut()
            .append_pair("fields", PeopleFields::QUERY);

        let issue: IssueEnvelope<PeopleFields> = self.get_typed(url, credential).await?;
        Ok(issue.fields.unwrap_or_default())
    }

    #[instrument(skip(self, credential, query))]
    async fn search_users(
        &self,
        credential: &Credential,
        query: &str,
    ) -> Result<Vec<TrackerUser>, GatewayError> {
        let mut url = self.endpoint(&["rest", "api", "3", "user", "search"]);
        url.query_pairs_mut().append_pair("query", query);

        self.get_typed(url, credential).await
    }

    #[instrument(skip(self, credential))]
    async fn set_reporter(
        &self,
        credential: &Credential,
        issue_key: &str,
        account_id: &str,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = self.issue_endpoint(issue_key, &[]);
        let payload = ReporterUpdatePayload::new(account_id);
        self.send_json(self.http_client.put(url), credential, &payload)
            .await
    }

    #[instrument(skip(self, credential, payload))]
    async fn notify(
        &self,
        credential: &Credential,
        issue_key: &str,
        payload: &NotifyPayload,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = self.issue_endpoint(issue_key, &["notify"]);
        self.send_json(self.http_client.post(url), credential, payload)
            .await
    }

    #[instrument(skip(self, credential))]
    async fn transition(
        &self,
        credential: &Credential,
        issue_key: &str,
        transition_id: &str,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = self.issue_endpoint(issue_key, &["transitions"]);
        let payload = TransitionPayload::new(transition_id);
        self.send_json(self.http_client.post(url), credential, &payload)
            .await
    }

    #[instrument(skip(self, credential))]
    async fn service_desks(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ServiceDesk>, GatewayError> {
        let mut desks = Vec::new();
        let mut start: usize = 0;

        loop {
            let mut url = self.endpoint(&["rest", "servicedeskapi", "servicedesk"]);
            url.query_pairs_mut()
                .append_pair("start", &start.to_string())
                .append_pair("limit", &SERVICE_DESK_PAGE_SIZE.to_string());

            let page: Page<ServiceDesk> = self.get_typed(url, credential).await?;
            let fetched = page.values.len();
            desks.extend(page.values);

            // Older deployments omit isLastPage; a short page ends the listing.
            let last = page
                .is_last_page
                .unwrap_or(fetched < SERVICE_DESK_PAGE_SIZE as usize);
            if last || fetched == 0 {
                break;
            }
            start += fetched;
        }

        Ok(desks)
    }

    #[instrument(skip(self, credential, payload))]
    async fn create_service_request(
        &self,
        credential: &Credential,
        payload: &ServiceDeskRequestPayload,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = self.endpoint(&["rest", "servicedeskapi", "request"]);
        self.send_json(self.http_client.post(url), credential, payload)
            .await
    }

    #[instrument(skip(self, credential, payload))]
    async fn create_issue(
        &self,
        credential: &Credential,
        payload: &CreateIssuePayload,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = self.endpoint(&["rest", "api", "3", "issue"]);
        self.send_json(self.http_client.post(url), credential, payload)
            .await
    }

    #[instrument(skip(self, credential, url))]
    async fn download(
        &self,
        credential: &Credential,
        url: &str,
    ) -> Result<RemoteResponse, GatewayError> {
        let response = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, credential.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return relay_json(response).await;
        }

        let content_type = header_string(&response, CONTENT_TYPE);
        let content_disposition = header_string(&response, CONTENT_DISPOSITION);
        let data = response.bytes().await?.to_vec();
        debug!(bytes = data.len(), "Downloaded attachment");

        Ok(RemoteResponse::new(
            status,
            RelayBody::Bytes {
                content_type,
                content_disposition,
                data,
            },
        ))
    }
}
