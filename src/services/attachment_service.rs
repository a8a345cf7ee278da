//! Attachment upload, listing and download.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::error::GatewayError;
use crate::domain::models::operations::{required, IssueKeyRequest};
use crate::domain::models::{Credential, DownloadConfig, RemoteResponse, StagedUpload};
use crate::domain::ports::TrackerClient;
use crate::infrastructure::logging::scrub;

pub struct AttachmentService<C: TrackerClient + ?Sized> {
    client: Arc<C>,
    download: DownloadConfig,
}

impl<C: TrackerClient + ?Sized> AttachmentService<C> {
    pub fn new(client: Arc<C>, download: DownloadConfig) -> Self {
        Self { client, download }
    }

    /// Re-send a staged file to the issue. The staged file is removed
    /// whatever the outcome.
    #[instrument(skip(self, credential, issue_key, upload), fields(file = %upload.file_name()))]
    pub async fn upload(
        &self,
        credential: &Credential,
        issue_key: Option<String>,
        upload: StagedUpload,
    ) -> Result<RemoteResponse, GatewayError> {
        let issue_key = required(issue_key, "issueKey")?;

        let result = self
            .client
            .upload_attachment(credential, &issue_key, &upload)
            .await;
        upload.discard().await;

        if let Ok(ref relayed) = result {
            info!(issue_key = %issue_key, status = %relayed.status, "attachment relayed");
        }
        result
    }

    /// Attachment objects of an issue, `[]` when it has none
    #[instrument(skip(self, credential, request))]
    pub async fn list(
        &self,
        credential: &Credential,
        request: IssueKeyRequest,
    ) -> Result<Vec<Value>, GatewayError> {
        let issue_key = required(request.issue_key, "issueKey")?;
        Ok(self
            .client
            .issue_attachments(credential, &issue_key)
            .await?
            .unwrap_or_default())
    }

    /// Fetch attachment content from `url` with the caller's credential.
    #[instrument(skip(self, credential, url))]
    pub async fn download(
        &self,
        credential: &Credential,
        url: Option<String>,
    ) -> Result<RemoteResponse, GatewayError> {
        let url = required(url, "url")?;
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| GatewayError::InvalidRequest(format!("Invalid url: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidRequest(format!(
                "Unsupported url scheme: {}",
                parsed.scheme()
            )));
        }
        let host = parsed.host_str().unwrap_or_default();
        if !self.download.allows_host(host) {
            warn!(url = %scrub(&url), "download host not allowed");
            return Err(GatewayError::InvalidRequest(format!(
                "Downloads from {host} are not allowed"
            )));
        }

        self.client.download(credential, parsed.as_str()).await
    }
}
