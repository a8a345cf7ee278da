//! Comments, transitions and issue creation.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domain::error::GatewayError;
use crate::domain::models::operations::{
    required, AddCommentRequest, CreateIssueRequest, ProjectType, TransitionApplied,
    TransitionRequest, DEFAULT_ISSUE_TYPE,
};
use crate::domain::models::payloads::{
    CommentPayload, CreateIssuePayload, IssueTypeRef, NewIssueFields, ProjectRef,
    RequestFieldValues, ServiceDeskRequestPayload,
};
use crate::domain::models::{Credential, Document, RemoteResponse, ServiceDesk};
use crate::domain::ports::TrackerClient;

pub struct IssueService<C: TrackerClient + ?Sized> {
    client: Arc<C>,
}

impl<C: TrackerClient + ?Sized> IssueService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Post `comment` as a single-paragraph document; the remote reply is relayed.
    #[instrument(skip(self, credential, request))]
    pub async fn add_comment(
        &self,
        credential: &Credential,
        request: AddCommentRequest,
    ) -> Result<RemoteResponse, GatewayError> {
        let issue_key = required(request.issue_key, "issueKey")?;
        let comment = match request.comment {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(GatewayError::MissingField("comment")),
        };

        self.client
            .add_comment(credential, &issue_key, &CommentPayload::plain(comment))
            .await
    }

    #[instrument(skip(self, credential, request))]
    pub async fn execute_transition(
        &self,
        credential: &Credential,
        request: TransitionRequest,
    ) -> Result<TransitionApplied, GatewayError> {
        let issue_key = required(request.issue_key, "issueKey")?;
        let transition_id = required(request.transition_id, "transitionId")?;

        self.client
            .transition(credential, &issue_key, &transition_id)
            .await?
            .into_success()?;

        info!(issue_key = %issue_key, transition_id = %transition_id, "transition applied");
        Ok(TransitionApplied {
            success: true,
            issue_key,
            transition_id,
        })
    }

    /// Create an issue, or a customer request for service desk projects.
    #[instrument(skip(self, credential, request))]
    pub async fn create_issue(
        &self,
        credential: &Credential,
        request: CreateIssueRequest,
    ) -> Result<RemoteResponse, GatewayError> {
        let project_key = required(request.project_key, "projectKey")?;
        let summary = required(request.summary, "summary")?;
        let description = request.description.filter(|d| !d.trim().is_empty());

        match ProjectType::from_flag(request.project_type.as_deref()) {
            ProjectType::ServiceDesk => {
                let request_type_id = required(request.request_type_id, "requestTypeId")?;
                let desk = self.find_service_desk(credential, &project_key).await?;

                let payload = ServiceDeskRequestPayload {
                    service_desk_id: desk.id,
                    request_type_id,
                    request_field_values: RequestFieldValues {
                        summary,
                        description,
                    },
                };
                self.client.create_service_request(credential, &payload).await
            }
            ProjectType::Standard => {
                let issue_type = request
                    .issue_type
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string());

                let payload = CreateIssuePayload {
                    fields: NewIssueFields {
                        project: ProjectRef { key: project_key },
                        summary,
                        description: description.map(Document::from_plain_text),
                        issuetype: IssueTypeRef { name: issue_type },
                    },
                };
                self.client.create_issue(credential, &payload).await
            }
        }
    }

    async fn find_service_desk(
        &self,
        credential: &Credential,
        project_key: &str,
    ) -> Result<ServiceDesk, GatewayError> {
        let desks = self.client.service_desks(credential).await?;
        debug!(count = desks.len(), "service desks listed");

        desks
            .into_iter()
            .find(|desk| desk.project_key.eq_ignore_ascii_case(project_key))
            .ok_or_else(|| {
                GatewayError::NotFound(format!("No service desk found for project: {project_key}"))
            })
    }
}
