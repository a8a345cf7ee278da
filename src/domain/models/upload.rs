use std::path::{Path, PathBuf};

use tracing::warn;

/// A caller's file, staged on local disk until it has been re-sent.
///
/// The staged file is owned by this value: it is removed when the value is
/// discarded or dropped, whichever happens first, so every exit path of an
/// upload releases it.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    file_name: String,
    content_type: Option<String>,
    size: u64,
    removed: bool,
}

impl StagedUpload {
    /// Take ownership of a file already written at `path`
    pub fn new(
        path: PathBuf,
        file_name: impl Into<String>,
        content_type: Option<String>,
        size: u64,
    ) -> Self {
        Self {
            path,
            file_name: file_name.into(),
            content_type,
            size,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    /// Remove the staged file now
    pub async fn discard(mut self) {
        self.removed = true;
        if let Err(err) = tokio::fs::remove_file(&self.path).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "failed to remove staged upload");
            }
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "failed to remove staged upload");
            }
        }
    }
}
