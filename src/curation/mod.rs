//! Record of queries that matched nothing.
//!
//! Unmatched requests are appended to a plain text log so the catalogue can
//! be reviewed later (missing tracks, common misspellings). Recording is
//! best-effort: callers log failures and move on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Errors writing the unmatched-query log
#[derive(Debug, thiserror::Error)]
pub enum CurationError {
    #[error("Failed to write {0}: {1}")]
    Write(PathBuf, std::io::Error),
}

/// Sink for queries that found no track.
#[async_trait]
pub trait UnmatchedQueryLog: Send + Sync {
    async fn record(&self, username: &str, tokens: &[String]) -> Result<(), CurationError>;
}

/// Append-only file log, one line per unmatched query.
pub struct FileUnmatchedLog {
    path: PathBuf,
}

impl FileUnmatchedLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `[timestamp] user: tokens`
fn format_line(timestamp: &str, username: &str, tokens: &[String]) -> String {
    format!("[{}] {}: {}\n", timestamp, username, tokens.join(" "))
}

#[async_trait]
impl UnmatchedQueryLog for FileUnmatchedLog {
    async fn record(&self, username: &str, tokens: &[String]) -> Result<(), CurationError> {
        let write_err = |e: std::io::Error| CurationError::Write(self.path.clone(), e);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(write_err)?;
        }

        let line = format_line(&chrono::Utc::now().to_rfc3339(), username, tokens);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_err)?;
        file.write_all(line.as_bytes()).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)
    }
}
