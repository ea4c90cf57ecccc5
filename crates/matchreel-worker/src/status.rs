//! Task status store.
//!
//! Persists the task's current human-readable status as `status.json`
//! inside the task working directory, for polling observers. Reads
//! tolerate a missing or unreadable file by reporting the "initializing"
//! default, so polling before the first write is well-defined.

use std::path::{Path, PathBuf};

use tracing::warn;

use matchreel_models::StatusSnapshot;

use crate::error::WorkerResult;

/// Status store for one task.
#[derive(Debug, Clone)]
pub struct TaskStatusStore {
    path: PathBuf,
}

impl TaskStatusStore {
    /// Create a store writing `status.json` under the task directory.
    pub fn new(task_dir: impl AsRef<Path>) -> Self {
        Self {
            path: task_dir.as_ref().join("status.json"),
        }
    }

    /// Write a running status with no summary.
    pub async fn set_status(&self, status: impl Into<String>) -> WorkerResult<()> {
        self.write(&StatusSnapshot::running(status)).await
    }

    /// Write a terminal completion status with the summary filename.
    pub async fn set_complete(&self, summary_filename: impl Into<String>) -> WorkerResult<()> {
        self.write(&StatusSnapshot {
            status: "Complete".to_string(),
            summary_filename: Some(summary_filename.into()),
        })
        .await
    }

    /// Write the full snapshot atomically (temp file + rename), so a
    /// concurrent reader never sees a torn status.json.
    pub async fn write(&self, snapshot: &StatusSnapshot) -> WorkerResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read the current snapshot; missing or unreadable files report the
    /// "initializing" default.
    pub async fn read(&self) -> StatusSnapshot {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Unreadable status.json, reporting default"
                    );
                    StatusSnapshot::default()
                }
            },
            Err(_) => StatusSnapshot::default(),
        }
    }
}
