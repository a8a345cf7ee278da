//! Remote responses as relayed back to the caller.

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::domain::error::GatewayError;

/// Body of a relayed response
#[derive(Debug, Clone, PartialEq)]
pub enum RelayBody {
    /// No content; the caller receives a bodiless response
    Empty,
    /// Parsed JSON, or raw text wrapped as `{"error": text}`
    Json(Value),
    /// Opaque bytes with the headers needed to save them
    Bytes {
        content_type: Option<String>,
        content_disposition: Option<String>,
        data: Vec<u8>,
    },
}

/// Status and body of one remote response
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    pub status: StatusCode,
    pub body: RelayBody,
}

impl RemoteResponse {
    pub fn new(status: StatusCode, body: RelayBody) -> Self {
        Self { status, body }
    }

    /// Apply the JSON relay rule to a fully read remote body.
    ///
    /// Statuses that never carry content, and empty bodies, become
    /// [`RelayBody::Empty`]. Anything else is parsed as JSON; text that is not
    /// JSON is wrapped rather than dropped.
    pub fn from_json_body(status: StatusCode, bytes: &[u8]) -> Self {
        if is_bodiless(status) || bytes.is_empty() {
            return Self::new(status, RelayBody::Empty);
        }

        let body = serde_json::from_slice::<Value>(bytes).unwrap_or_else(|_| {
            json!({ "error": String::from_utf8_lossy(bytes) })
        });
        Self::new(status, RelayBody::Json(body))
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            RelayBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Pass successful responses through, turn everything else into
    /// [`GatewayError::Remote`] carrying the remote status.
    pub fn into_success(self) -> Result<Self, GatewayError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    /// Rejection carrying the remote's own status and message
    pub fn into_error(self) -> GatewayError {
        let body = match self.body {
            RelayBody::Json(value) => value,
            RelayBody::Empty => json!({
                "error": format!("Remote service responded with {}", self.status)
            }),
            RelayBody::Bytes { data, .. } => json!({ "error": String::from_utf8_lossy(&data) }),
        };
        GatewayError::Remote {
            status: self.status,
            body,
        }
    }
}

fn is_bodiless(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED
    )
}
