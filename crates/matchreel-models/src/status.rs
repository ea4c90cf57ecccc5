//! Task status snapshot (status.json schema).
//!
//! This is the polling contract between the pipeline and external
//! observers: a human-readable status string plus, once complete, the
//! summary filename.

use serde::{Deserialize, Serialize};

/// Status string reported before any stage has written an update.
pub const STATUS_INITIALIZING: &str = "initializing";

/// Snapshot of a task's current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Human-readable status: a running-stage description, "Complete",
    /// "Complete: no highlights found", or "Error: ..."
    pub status: String,

    /// Summary video filename, set only on successful completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_filename: Option<String>,
}

impl StatusSnapshot {
    /// Create a running snapshot with no summary.
    pub fn running(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            summary_filename: None,
        }
    }

    /// Check if this snapshot represents a terminal error.
    pub fn is_error(&self) -> bool {
        self.status.starts_with("Error:")
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::running(STATUS_INITIALIZING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_initializing() {
        let snapshot = StatusSnapshot::default();
        assert_eq!(snapshot.status, "initializing");
        assert!(snapshot.summary_filename.is_none());
        assert!(!snapshot.is_error());
    }

    #[test]
    fn test_summary_filename_omitted_until_set() {
        let json = serde_json::to_string(&StatusSnapshot::running("Transcribing audio...")).unwrap();
        assert!(!json.contains("summary_filename"));

        let complete = StatusSnapshot {
            status: "Complete".to_string(),
            summary_filename: Some("summary.mp4".to_string()),
        };
        let json = serde_json::to_string(&complete).unwrap();
        assert!(json.contains("\"summary_filename\":\"summary.mp4\""));
    }

    #[test]
    fn test_error_detection() {
        assert!(StatusSnapshot::running("Error: event_detection: boom").is_error());
        assert!(!StatusSnapshot::running("Complete").is_error());
    }
}
