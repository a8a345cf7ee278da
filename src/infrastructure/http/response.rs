//! Mapping of relay results onto HTTP responses.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::domain::error::GatewayError;
use crate::domain::models::{RelayBody, RemoteResponse};
use crate::infrastructure::logging::scrub;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();

        match &self {
            Self::Remote { .. } => {
                warn!(status = %status, body = %scrub(&body.to_string()), "remote service rejected request");
            }
            Self::Transport(_) | Self::Io(_) => error!(error = %scrub(&self.to_string()), "request failed"),
            _ => warn!(status = %status, error = %self, "request rejected"),
        }

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for RemoteResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        match self.body {
            RelayBody::Empty => status.into_response(),
            RelayBody::Json(value) => (status, Json(value)).into_response(),
            RelayBody::Bytes {
                content_type,
                content_disposition,
                data,
            } => {
                let mut response = (status, data).into_response();
                let headers = response.headers_mut();
                headers.remove(CONTENT_TYPE);
                if let Some(value) = content_type.and_then(|v| HeaderValue::from_str(&v).ok()) {
                    headers.insert(CONTENT_TYPE, value);
                }
                if let Some(value) =
                    content_disposition.and_then(|v| HeaderValue::from_str(&v).ok())
                {
                    headers.insert(CONTENT_DISPOSITION, value);
                }
                response
            }
        }
    }
}
