//! Highlight pipeline worker binary.
//!
//! Submits each video path given on the command line as a task and waits
//! for all of them to reach a terminal state.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matchreel_worker::{
    ContentCache, FfmpegTranscoder, GeminiDetector, Pipeline, TaskManager, WhisperTranscriber,
    WorkerConfig,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("matchreel=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting matchreel-worker");

    let videos: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if videos.is_empty() {
        error!("Usage: matchreel-worker <video>...");
        std::process::exit(2);
    }

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let detector = match GeminiDetector::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to create event detector: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = Pipeline::new(
        ContentCache::new(config.cache_dir.clone()),
        Arc::new(FfmpegTranscoder),
        Arc::new(WhisperTranscriber::new(config.whisper_model.clone())),
        Arc::new(detector),
    );

    let manager = TaskManager::new(config, pipeline);

    let mut task_ids = Vec::new();
    for video in videos {
        match manager.submit(video.clone()).await {
            Ok(task_id) => {
                info!(task_id = %task_id, video = %video.display(), "Submitted task");
                task_ids.push(task_id);
            }
            Err(e) => {
                error!(video = %video.display(), "Failed to submit task: {}", e);
            }
        }
    }

    manager.join_all().await;

    let mut failed = false;
    for task_id in &task_ids {
        let snapshot = manager.status_store(task_id).read().await;
        info!(task_id = %task_id, status = %snapshot.status, "Task finished");
        if snapshot.is_error() {
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }

    info!("All tasks finished");
}
