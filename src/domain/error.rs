use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Every way an operation can fail.
///
/// Client-side variants are raised before any remote call is attempted.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Missing credential: an Authorization value is required")]
    MissingCredential,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Ambiguous(String),

    /// The remote service rejected the call; its status and body are relayed
    #[error("Remote service responded with {status}")]
    Remote { status: StatusCode, body: Value },

    /// The remote service could not be reached or its response not read
    #[error("Request to remote service failed: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl GatewayError {
    /// HTTP status reported to the caller
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCredential => StatusCode::UNAUTHORIZED,
            Self::MissingField(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Ambiguous(_) => StatusCode::CONFLICT,
            Self::Remote { status, .. } => *status,
            Self::Transport(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body reported to the caller
    pub fn body(&self) -> Value {
        match self {
            Self::Remote { body, .. } => body.clone(),
            Self::Transport(details) => json!({
                "error": "Request to remote service failed",
                "details": details,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}
