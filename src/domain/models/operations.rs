//! Inbound request bodies and the reshaped results returned to callers.
//!
//! Every field of an inbound body is optional at the serde level so that a
//! missing field surfaces as a [`GatewayError::MissingField`] with the
//! relay's own error shape instead of a deserializer message.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::tracker::TrackerUser;
use crate::domain::error::GatewayError;

/// Extract a required, non-blank string field
pub fn required(value: Option<String>, field: &'static str) -> Result<String, GatewayError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(GatewayError::MissingField(field)),
    }
}

/// Accept `"31"` and `31` alike; browsers send identifiers either way.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueKeyRequest {
    #[serde(default)]
    pub issue_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[serde(default)]
    pub issue_key: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReporterRequest {
    #[serde(default)]
    pub issue_key: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    #[serde(default)]
    pub issue_key: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub notify_reporter: bool,
    #[serde(default)]
    pub notify_assignee: bool,
    #[serde(default)]
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    #[serde(default)]
    pub issue_key: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub transition_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub request_type_id: Option<String>,
}

/// Query string of the download operation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub auth: Option<String>,
}

/// Which creation flow a project uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Standard,
    ServiceDesk,
}

impl ProjectType {
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(f) if f.trim().eq_ignore_ascii_case("servicedesk") => Self::ServiceDesk,
            _ => Self::Standard,
        }
    }
}

/// Default issue type for standard projects
pub const DEFAULT_ISSUE_TYPE: &str = "Task";

/// Flat reshaping of an issue's people fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePeople {
    pub issue_key: String,
    pub summary: Option<String>,
    pub reporter: Option<TrackerUser>,
    pub assignee: Option<TrackerUser>,
    pub creator: Option<TrackerUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterUpdated {
    pub success: bool,
    pub issue_key: String,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSent {
    pub success: bool,
    pub notified_users: Vec<String>,
    pub skipped_emails: Vec<String>,
    /// Set when the follow-up audit comment could not be recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionApplied {
    pub success: bool,
    pub issue_key: String,
    pub transition_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required(Some(" ABC-1 ".to_string()), "issueKey").unwrap(), "ABC-1");
        assert!(matches!(
            required(Some("  ".to_string()), "issueKey"),
            Err(GatewayError::MissingField("issueKey"))
        ));
        assert!(matches!(
            required(None, "email"),
            Err(GatewayError::MissingField("email"))
        ));
    }

    #[test]
    fn test_transition_id_accepts_number_or_string() {
        let numeric: TransitionRequest =
            serde_json::from_value(json!({ "issueKey": "A-1", "transitionId": 31 })).unwrap();
        assert_eq!(numeric.transition_id.as_deref(), Some("31"));

        let text: TransitionRequest =
            serde_json::from_value(json!({ "issueKey": "A-1", "transitionId": "41" })).unwrap();
        assert_eq!(text.transition_id.as_deref(), Some("41"));

        let missing: TransitionRequest =
            serde_json::from_value(json!({ "issueKey": "A-1" })).unwrap();
        assert!(missing.transition_id.is_none());
    }

    #[test]
    fn test_notification_defaults() {
        let request: SendNotificationRequest =
            serde_json::from_value(json!({ "issueKey": "A-1" })).unwrap();
        assert!(!request.notify_reporter);
        assert!(!request.notify_assignee);
        assert!(request.emails.is_empty());
    }

    #[test]
    fn test_project_type_flag() {
        assert_eq!(ProjectType::from_flag(Some("servicedesk")), ProjectType::ServiceDesk);
        assert_eq!(ProjectType::from_flag(Some("ServiceDesk")), ProjectType::ServiceDesk);
        assert_eq!(ProjectType::from_flag(Some("software")), ProjectType::Standard);
        assert_eq!(ProjectType::from_flag(None), ProjectType::Standard);
    }

    #[test]
    fn test_people_serializes_nulls() {
        let people = IssuePeople {
            issue_key: "A-1".to_string(),
            summary: None,
            reporter: None,
            assignee: None,
            creator: None,
        };
        assert_eq!(
            serde_json::to_value(people).unwrap(),
            json!({
                "issueKey": "A-1",
                "summary": null,
                "reporter": null,
                "assignee": null,
                "creator": null
            })
        );
    }

    #[test]
    fn test_warning_omitted_when_absent() {
        let sent = NotificationSent {
            success: true,
            notified_users: vec![],
            skipped_emails: vec![],
            warning: None,
        };
        assert!(serde_json::to_value(sent).unwrap().get("warning").is_none());
    }
}
