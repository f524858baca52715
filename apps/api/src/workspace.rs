//! Per-request scratch directories for uploads and render artifacts.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// A directory owned by exactly one request, named by a fresh request id.
#[derive(Debug)]
pub struct RequestWorkspace {
    request_id: Uuid,
    dir: TempDir,
}

impl RequestWorkspace {
    pub async fn create(root: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(root).await?;
        let request_id = Uuid::new_v4();
        let dir = tempfile::Builder::new()
            .prefix(&format!("req-{request_id}-"))
            .tempdir_in(root)?;
        debug!(%request_id, path = %dir.path().display(), "request workspace created");
        Ok(Self { request_id, dir })
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path inside the workspace for `name`, with any directory components stripped.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(sanitize_file_name(name))
    }

    pub async fn write(&self, name: &str, contents: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.file_path(name);
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }

    /// Removes the directory. Failure is logged, never returned.
    pub fn close(self) {
        let request_id = self.request_id;
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!(%request_id, path = %path.display(), "failed to remove request workspace: {e}");
        }
    }
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`. Everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
