//! Task executor.
//!
//! One independent sequential worker per task: submission hands the video
//! off to a spawned worker and returns immediately; progress is observed
//! only by polling the task's status store. There is no mid-task
//! cancellation; a task runs to completion or terminal failure.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::logging::TaskLogger;
use crate::pipeline::{Pipeline, PipelineOutcome};
use crate::status::TaskStatusStore;

/// Spawns and tracks per-task pipeline workers.
pub struct TaskManager {
    config: WorkerConfig,
    pipeline: Arc<Pipeline>,
    task_semaphore: Arc<Semaphore>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskManager {
    /// Create a manager running at most `max_concurrent_tasks` workers.
    pub fn new(config: WorkerConfig, pipeline: Pipeline) -> Self {
        let task_semaphore = Arc::new(Semaphore::new(config.max_concurrent_tasks));
        Self {
            config,
            pipeline: Arc::new(pipeline),
            task_semaphore,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Submit a video for processing; returns the new task identifier
    /// immediately, without waiting for any stage.
    pub async fn submit(&self, video: PathBuf) -> WorkerResult<String> {
        let task_id = Uuid::new_v4().to_string();
        let task_dir = self.config.upload_dir.join(&task_id);
        tokio::fs::create_dir_all(&task_dir).await?;

        let status = TaskStatusStore::new(&task_dir);
        let pipeline = Arc::clone(&self.pipeline);
        let semaphore = Arc::clone(&self.task_semaphore);
        let id = task_id.clone();

        let handle = tokio::spawn(async move {
            // Semaphore is never closed, so acquisition only fails on
            // shutdown of the runtime itself
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };

            let logger = TaskLogger::new(&id, "task");
            match pipeline.run(&id, &video, &status).await {
                Ok(PipelineOutcome::Summary(summary)) => {
                    let filename = summary
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "summary.mp4".to_string());
                    if let Err(e) = status.set_complete(&filename).await {
                        logger.failed(&e);
                    } else {
                        logger.progress("Task complete");
                    }
                }
                Ok(PipelineOutcome::NoHighlights) => {
                    if let Err(e) = status.set_status("Complete: no highlights found").await {
                        logger.failed(&e);
                    } else {
                        logger.progress("Task complete with no highlights");
                    }
                }
                Err(e) => {
                    logger.failed(&e);
                    let _ = status.set_status(format!("Error: {}", e)).await;
                }
            }
        });

        self.handles.lock().await.push(handle);
        Ok(task_id)
    }

    /// Status store for a previously submitted task.
    pub fn status_store(&self, task_id: &str) -> TaskStatusStore {
        TaskStatusStore::new(self.config.upload_dir.join(task_id))
    }

    /// Wait for every submitted task to reach a terminal state.
    pub async fn join_all(&self) {
        let handles: Vec<_> = self.handles.lock().await.drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
    }
}
