//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// Missing or unusable configuration (e.g. detector credential).
    /// Fatal at first use, surfaced verbatim.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pipeline stage failed; the cache entry was left untouched so a
    /// re-invocation resumes from this stage.
    #[error("Stage '{stage}' failed for task {task_id}: {message}")]
    StageFailed {
        task_id: String,
        stage: &'static str,
        message: String,
    },

    #[error("Event detection failed: {0}")]
    DetectionFailed(String),

    #[error("Media error: {0}")]
    Media(#[from] matchreel_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn detection_failed(msg: impl Into<String>) -> Self {
        Self::DetectionFailed(msg.into())
    }

    pub fn stage_failed(
        task_id: impl Into<String>,
        stage: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::StageFailed {
            task_id: task_id.into(),
            stage,
            message: message.into(),
        }
    }

    /// Check if this is a configuration error (fatal, never stage-tagged).
    pub fn is_config(&self) -> bool {
        matches!(self, WorkerError::Config(_))
    }
}
