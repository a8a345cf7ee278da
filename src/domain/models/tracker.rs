//! Typed views of the remote service's responses.
//!
//! Only the fields the relay reads are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user record as returned by user search and issue people fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerUser {
    pub account_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Hidden by the remote service unless the profile is public
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// `GET /rest/api/3/issue/{key}` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEnvelope<F> {
    #[serde(default)]
    pub fields: Option<F>,
}

/// `fields=attachment`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentFields {
    /// Relayed verbatim, so kept untyped
    #[serde(default)]
    pub attachment: Option<Vec<Value>>,
}

/// `fields=reporter,assignee,creator,summary`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeopleFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub reporter: Option<TrackerUser>,
    #[serde(default)]
    pub assignee: Option<TrackerUser>,
    #[serde(default)]
    pub creator: Option<TrackerUser>,
}

impl PeopleFields {
    /// Field list sent as the `fields` query parameter
    pub const QUERY: &'static str = "reporter,assignee,creator,summary";
}

/// Paged listing used by the service desk API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,

    #[serde(default)]
    pub is_last_page: Option<bool>,
}

/// Service desk summary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDesk {
    pub id: String,
    pub project_key: String,
}
