//! Structured task logging utilities.
//!
//! Consistent logging for pipeline runs with task and stage context,
//! mirroring what external observers see in the status store.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::WorkerError;

/// Logger carrying a task identifier and an operation/stage label.
#[derive(Debug, Clone)]
pub struct TaskLogger {
    task_id: String,
    operation: String,
}

impl TaskLogger {
    /// Create a logger for a task and operation.
    pub fn new(task_id: &str, operation: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of an operation.
    pub fn start(&self, message: &str) {
        info!(
            task_id = %self.task_id,
            operation = %self.operation,
            "{}", message
        );
    }

    /// Log a mid-operation progress note.
    pub fn progress(&self, message: &str) {
        info!(
            task_id = %self.task_id,
            operation = %self.operation,
            "{}", message
        );
    }

    /// Log a warning.
    pub fn warning(&self, message: &str) {
        warn!(
            task_id = %self.task_id,
            operation = %self.operation,
            "{}", message
        );
    }

    /// Log that cached outputs were reused.
    pub fn cache_hit(&self) {
        info!(
            task_id = %self.task_id,
            operation = %self.operation,
            "Cache hit, skipping stage"
        );
    }

    /// Log successful completion with the measured duration.
    pub fn completed(&self, elapsed: Duration) {
        info!(
            task_id = %self.task_id,
            operation = %self.operation,
            elapsed_secs = elapsed.as_secs_f64(),
            "Completed"
        );
    }

    /// Log a failure.
    pub fn failed(&self, err: &WorkerError) {
        error!(
            task_id = %self.task_id,
            operation = %self.operation,
            error = %err,
            "Failed"
        );
    }
}
