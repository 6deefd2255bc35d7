use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{Builder, TempPath};

use crate::error::{AppError, AppResult};

const ARTIFACT_PREFIX: &str = "anonymized-";
const ARTIFACT_SUFFIX: &str = ".pdf";

/// A regenerated document on disk, owned by exactly one request.
///
/// Dropping the artifact schedules removal of the file after `cleanup_delay`.
/// Outside a tokio runtime, or if the scheduled task never runs to completion,
/// the file is removed when the inner `TempPath` drops.
#[derive(Debug)]
pub struct TempArtifact {
    path: Option<TempPath>,
    cleanup_delay: Duration,
}

impl TempArtifact {
    /// Writes `content` to a fresh, uniquely named file. A partially written
    /// file is removed before the error is returned.
    pub fn write(dir: Option<&Path>, content: &[u8], cleanup_delay: Duration) -> AppResult<Self> {
        let mut builder = Builder::new();
        builder.prefix(ARTIFACT_PREFIX).suffix(ARTIFACT_SUFFIX);

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| AppError::filesystem(format!("Failed to create temporary file: {}", e)))?;

        file.write_all(content)
            .and_then(|_| file.flush())
            .map_err(|e| AppError::filesystem(format!("Failed to write PDF to temporary file: {}", e)))?;

        let path = file.into_temp_path();
        tracing::debug!(path = %path.display(), size_bytes = content.len(), "Temporary PDF written");

        Ok(Self {
            path: Some(path),
            cleanup_delay,
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    pub fn path_buf(&self) -> PathBuf {
        self.path().to_path_buf()
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let delay = self.cleanup_delay;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    remove(path);
                });
            }
            Err(_) => remove(path),
        }
    }
}

fn remove(path: TempPath) {
    let shown = path.display().to_string();
    match path.close() {
        Ok(()) => tracing::info!(path = %shown, "Temporary file cleaned up successfully"),
        Err(e) => tracing::warn!(path = %shown, "Failed to clean up temporary file: {}", e),
    }
}
