//! Outbound request bodies sent to the remote service.

use serde::Serialize;

use super::document::Document;

#[derive(Debug, Clone, Serialize)]
pub struct CommentPayload {
    pub body: Document,
}

impl CommentPayload {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            body: Document::from_plain_text(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub account_id: String,
}

/// `PUT /rest/api/3/issue/{key}` body that only touches the reporter
#[derive(Debug, Clone, Serialize)]
pub struct ReporterUpdatePayload {
    pub fields: ReporterField,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReporterField {
    pub reporter: AccountRef,
}

impl ReporterUpdatePayload {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            fields: ReporterField {
                reporter: AccountRef {
                    account_id: account_id.into(),
                },
            },
        }
    }
}

/// `POST /rest/api/3/issue/{key}/notify`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyPayload {
    pub subject: String,
    pub text_body: String,
    pub to: NotifyRecipients,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotifyRecipients {
    pub reporter: bool,
    pub assignee: bool,
    pub users: Vec<AccountRef>,
}

/// `POST /rest/api/3/issue/{key}/transitions`
#[derive(Debug, Clone, Serialize)]
pub struct TransitionPayload {
    pub transition: TransitionRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionRef {
    pub id: String,
}

impl TransitionPayload {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            transition: TransitionRef { id: id.into() },
        }
    }
}

/// `POST /rest/api/3/issue`
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssuePayload {
    pub fields: NewIssueFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewIssueFields {
    pub project: ProjectRef,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Document>,
    pub issuetype: IssueTypeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueTypeRef {
    pub name: String,
}

/// `POST /rest/servicedeskapi/request`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDeskRequestPayload {
    pub service_desk_id: String,
    pub request_type_id: String,
    pub request_field_values: RequestFieldValues,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestFieldValues {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
