//! Script materialization.
//!
//! Writes the script body to `<dir>/retry-run-action-<uuid>.<ext>`. The
//! file is created fresh for every run and shared read-only by all attempts.

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Fixed prefix of every generated script file name.
pub const SCRIPT_FILE_PREFIX: &str = "retry-run-action";

/// The script could not be written.
#[derive(Debug, thiserror::Error)]
#[error("Failed to write script file {}: {source}", .path.display())]
pub struct MaterializeError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// A script body written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedScript {
    path: PathBuf,
    content: String,
}

impl MaterializedScript {
    /// Absolute path of the written file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content exactly as written.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Generate a collision-free file name carrying `extension`.
pub fn script_file_name(extension: &str) -> String {
    format!("{SCRIPT_FILE_PREFIX}-{}.{extension}", Uuid::new_v4())
}

/// Write `content` verbatim to a new file in `directory`.
///
/// The directory must already exist and be writable. The file is opened
/// with create-new semantics, so an existing file is never overwritten.
pub async fn materialize(
    content: &str,
    directory: &Path,
    extension: &str,
) -> Result<MaterializedScript, MaterializeError> {
    let path = directory.join(script_file_name(extension));
    let path = std::path::absolute(&path).map_err(|source| MaterializeError {
        path: path.clone(),
        source,
    })?;

    write_new(&path, content.as_bytes())
        .await
        .map_err(|source| MaterializeError {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Script materialized");

    Ok(MaterializedScript {
        path,
        content: content.to_string(),
    })
}

async fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
