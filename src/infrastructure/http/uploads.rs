//! Staging of multipart uploads on local disk.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::GatewayError;
use crate::domain::models::{StagedUpload, UploadConfig};

/// Multipart framing allowance on top of the file cap
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

const ISSUE_KEY_FIELD: &str = "issueKey";
const FILE_FIELD: &str = "file";

/// Fields of an attachment upload
#[derive(Debug)]
pub struct UploadForm {
    pub issue_key: Option<String>,
    pub file: StagedUpload,
}

/// Read an attachment upload, streaming its file into the staging directory.
///
/// Exactly one `file` field is accepted; it may not exceed
/// `config.max_file_bytes`. Anything staged is removed again if reading fails.
pub async fn stage_upload(
    mut multipart: Multipart,
    config: &UploadConfig,
) -> Result<UploadForm, GatewayError> {
    let limit = config.max_file_bytes;
    let mut issue_key = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(ISSUE_KEY_FIELD) => {
                issue_key = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            Some(FILE_FIELD) => {
                if file.is_some() {
                    return Err(GatewayError::InvalidRequest(
                        "Exactly one file may be uploaded".to_string(),
                    ));
                }
                file = Some(stage_field(field, &config.staging_dir(), limit).await?);
            }
            other => debug!(field = ?other, "ignoring multipart field"),
        }
    }

    let file = file.ok_or(GatewayError::MissingField("file"))?;
    Ok(UploadForm { issue_key, file })
}

async fn stage_field(
    mut field: Field<'_>,
    staging_dir: &Path,
    limit: u64,
) -> Result<StagedUpload, GatewayError> {
    let file_name = field
        .file_name()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("upload")
        .to_string();
    let content_type = field.content_type().map(str::to_string);
    let path = staging_dir.join(format!("jira-relay-{}", Uuid::new_v4()));

    let mut out = tokio::fs::File::create(&path).await?;
    // The guard owns the path from here on, so every early return removes it.
    let mut staged = StagedUpload::new(path, file_name, content_type, 0);

    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
        written += chunk.len() as u64;
        if written > limit {
            return Err(GatewayError::PayloadTooLarge { limit });
        }
        out.write_all(&chunk).await?;
    }
    out.flush().await?;
    drop(out);

    staged.set_size(written);
    debug!(file = %staged.file_name(), bytes = written, "upload staged");
    Ok(staged)
}

fn multipart_error(err: MultipartError, limit: u64) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge { limit }
    } else {
        GatewayError::InvalidRequest(err.body_text())
    }
}
