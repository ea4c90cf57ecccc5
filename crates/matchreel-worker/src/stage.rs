//! Stage runner: cache-gated, atomic, uniformly failing stage execution.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::warn;
use uuid::Uuid;

use crate::cache::{artifact_is_valid, CacheEntry};
use crate::error::{WorkerError, WorkerResult};
use crate::logging::TaskLogger;

/// The five pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    AudioExtraction,
    Transcription,
    EventDetection,
    ClipGeneration,
    Stitching,
}

impl PipelineStage {
    /// Stage name used in logs and error tags.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AudioExtraction => "audio_extraction",
            Self::Transcription => "transcription",
            Self::EventDetection => "event_detection",
            Self::ClipGeneration => "clip_generation",
            Self::Stitching => "stitching",
        }
    }

    /// Human-readable running description written to the status store.
    pub fn running_status(&self) -> &'static str {
        match self {
            Self::AudioExtraction => "Extracting audio...",
            Self::Transcription => "Transcribing audio...",
            Self::EventDetection => "Detecting match events...",
            Self::ClipGeneration => "Cutting highlight clips...",
            Self::Stitching => "Stitching summary video...",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result of running (or skipping) one stage.
#[derive(Debug)]
pub struct StageOutcome {
    /// True when every declared output was already valid in the cache
    pub cache_hit: bool,
    /// Wall-clock duration of the stage function (zero on cache hit)
    pub elapsed: Duration,
}

/// Run one pipeline stage against the cache.
///
/// If every path in `outputs` is already a valid artifact, the stage is
/// skipped. Otherwise `produce` runs against a scratch directory inside
/// the cache entry (same filesystem) and returns the relative paths it
/// wrote; on success each is atomically moved to its final location, in
/// declared layout. On failure the scratch directory is discarded and the
/// cache entry is left untouched, so a retry re-attempts the stage.
///
/// Configuration errors pass through verbatim; everything else is tagged
/// with the stage name and task identifier.
pub async fn run_stage<F, Fut>(
    stage: PipelineStage,
    task_id: &str,
    entry: &CacheEntry,
    outputs: &[PathBuf],
    produce: F,
) -> WorkerResult<StageOutcome>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = WorkerResult<Vec<PathBuf>>>,
{
    let logger = TaskLogger::new(task_id, stage.name());

    if !outputs.is_empty() && outputs.iter().all(|p| artifact_is_valid(p)) {
        logger.cache_hit();
        return Ok(StageOutcome {
            cache_hit: true,
            elapsed: Duration::ZERO,
        });
    }

    let scratch = entry.dir().join(format!(".scratch-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&scratch).await?;

    let started = Instant::now();
    let produced = produce(scratch.clone()).await;
    let elapsed = started.elapsed();

    match produced {
        Ok(relative_paths) => {
            let mut published = Vec::with_capacity(relative_paths.len());
            for rel in &relative_paths {
                let src = scratch.join(rel);
                let dst = entry.dir().join(rel);
                if let Err(e) = matchreel_media::move_file(&src, &dst).await {
                    // Unpublish what this invocation already moved: the
                    // entry must never hold a partial stage result
                    unpublish(&published).await;
                    cleanup_scratch(&scratch).await;
                    let err = WorkerError::stage_failed(task_id, stage.name(), e.to_string());
                    logger.failed(&err);
                    return Err(err);
                }
                published.push(dst);
            }
            cleanup_scratch(&scratch).await;
            logger.completed(elapsed);
            Ok(StageOutcome {
                cache_hit: false,
                elapsed,
            })
        }
        Err(e) => {
            cleanup_scratch(&scratch).await;
            logger.failed(&e);
            if e.is_config() {
                Err(e)
            } else {
                Err(WorkerError::stage_failed(
                    task_id,
                    stage.name(),
                    e.to_string(),
                ))
            }
        }
    }
}

/// Remove outputs a failed invocation had already moved into the entry.
async fn unpublish(published: &[PathBuf]) {
    for path in published {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(
                "Could not remove partially published output {}: {}",
                path.display(),
                e
            );
        }
    }
}

/// Best-effort removal of a stage scratch directory.
async fn cleanup_scratch(scratch: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(scratch).await {
        warn!(
            "Could not remove stage scratch directory {}: {}",
            scratch.display(),
            e
        );
    }
}
