//! Pipeline orchestration.
//!
//! Drives the five stages for one task in strict forward order, each gated
//! by its own cache check, and writes a status update before every stage so
//! a polling observer always sees the most recent transition. A stage
//! failure is task-terminal: there is no rollback and no automatic retry;
//! resubmitting the same bytes resumes from the first invalid cache entry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use matchreel_models::{plan_clips, EventRecord, TranscriptSegment};

use crate::cache::ContentCache;
use crate::detector::EventDetector;
use crate::error::WorkerResult;
use crate::logging::TaskLogger;
use crate::stage::{run_stage, PipelineStage};
use crate::status::TaskStatusStore;
use crate::transcoder::MediaTranscoder;
use crate::transcriber::Transcriber;
use crate::transcript::{format_with_timestamps, plain_text};

/// Terminal result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Summary video produced at this path
    Summary(PathBuf),
    /// Detection succeeded but yielded no valid clips; this is a
    /// successful outcome with no summary artifact
    NoHighlights,
}

/// The pipeline engine: collaborators plus the shared content cache.
pub struct Pipeline {
    cache: ContentCache,
    transcoder: Arc<dyn MediaTranscoder>,
    transcriber: Arc<dyn Transcriber>,
    detector: Arc<dyn EventDetector>,
}

impl Pipeline {
    pub fn new(
        cache: ContentCache,
        transcoder: Arc<dyn MediaTranscoder>,
        transcriber: Arc<dyn Transcriber>,
        detector: Arc<dyn EventDetector>,
    ) -> Self {
        Self {
            cache,
            transcoder,
            transcriber,
            detector,
        }
    }

    /// Run the full pipeline for one task.
    ///
    /// Writes running statuses to `status`; terminal statuses are the
    /// caller's responsibility so this function has a single reporting
    /// path for success and failure alike.
    pub async fn run(
        &self,
        task_id: &str,
        video: &Path,
        status: &TaskStatusStore,
    ) -> WorkerResult<PipelineOutcome> {
        let logger = TaskLogger::new(task_id, "pipeline");
        logger.start("Pipeline started");

        status.set_status("Checking for cached results...").await?;
        let hash = self.cache.key_for(video).await?;
        let entry = self.cache.entry(&hash)?;

        // Stage 1: audio extraction
        status
            .set_status(PipelineStage::AudioExtraction.running_status())
            .await?;
        let audio_path = entry.audio_path();
        run_stage(
            PipelineStage::AudioExtraction,
            task_id,
            &entry,
            std::slice::from_ref(&audio_path),
            |scratch| async move {
                let out = scratch.join("audio.wav");
                self.transcoder.extract_audio(video, &out).await?;
                Ok(vec![PathBuf::from("audio.wav")])
            },
        )
        .await?;

        // Stage 2: transcription
        status
            .set_status(PipelineStage::Transcription.running_status())
            .await?;
        run_stage(
            PipelineStage::Transcription,
            task_id,
            &entry,
            &[entry.transcript_txt_path(), entry.transcript_json_path()],
            |scratch| {
                let audio_path = &audio_path;
                async move {
                    let segments = self.transcriber.transcribe(audio_path, &scratch).await?;
                    tokio::fs::write(scratch.join("transcript.txt"), plain_text(&segments))
                        .await?;
                    tokio::fs::write(
                        scratch.join("transcript.json"),
                        serde_json::to_vec_pretty(&segments)?,
                    )
                    .await?;
                    Ok(vec![
                        PathBuf::from("transcript.txt"),
                        PathBuf::from("transcript.json"),
                    ])
                }
            },
        )
        .await?;

        // Stage 3: event detection
        status
            .set_status(PipelineStage::EventDetection.running_status())
            .await?;
        let transcript_json = entry.transcript_json_path();
        run_stage(
            PipelineStage::EventDetection,
            task_id,
            &entry,
            std::slice::from_ref(&entry.events_path()),
            |scratch| {
                let transcript_json = &transcript_json;
                async move {
                    let raw = tokio::fs::read(transcript_json).await?;
                    let segments: Vec<TranscriptSegment> = serde_json::from_slice(&raw)?;
                    let formatted = format_with_timestamps(&segments);
                    let response = self.detector.detect(&formatted).await?;
                    let events = crate::protocol::parse_events(&response);
                    tokio::fs::write(
                        scratch.join("events.json"),
                        serde_json::to_vec_pretty(&events)?,
                    )
                    .await?;
                    Ok(vec![PathBuf::from("events.json")])
                }
            },
        )
        .await?;

        // Plan clips from the canonical event list
        let events: Vec<EventRecord> =
            serde_json::from_slice(&tokio::fs::read(entry.events_path()).await?)?;
        let plans = plan_clips(&events);
        info!(
            task_id = %task_id,
            events = events.len(),
            clips = plans.len(),
            "Planned clips from detected events"
        );

        if plans.is_empty() {
            logger.progress("No valid clips to render, finishing without summary");
            return Ok(PipelineOutcome::NoHighlights);
        }

        // Stage 4: clip generation
        status
            .set_status(PipelineStage::ClipGeneration.running_status())
            .await?;
        let clip_paths: Vec<PathBuf> = plans
            .iter()
            .map(|p| entry.clips_dir().join(&p.filename))
            .collect();
        run_stage(
            PipelineStage::ClipGeneration,
            task_id,
            &entry,
            &clip_paths,
            |scratch| {
                let plans = &plans;
                async move {
                    let mut produced = Vec::with_capacity(plans.len());
                    for plan in plans {
                        let rel = Path::new("clips").join(&plan.filename);
                        let out = scratch.join(&rel);
                        if let Some(parent) = out.parent() {
                            tokio::fs::create_dir_all(parent).await?;
                        }
                        self.transcoder
                            .cut_clip(
                                video,
                                &out,
                                plan.start_secs,
                                plan.duration_secs,
                                &plan.overlay,
                            )
                            .await?;
                        produced.push(rel);
                    }
                    Ok(produced)
                }
            },
        )
        .await?;

        // Stage 5: stitching
        status
            .set_status(PipelineStage::Stitching.running_status())
            .await?;
        let summary_path = entry.summary_path();
        run_stage(
            PipelineStage::Stitching,
            task_id,
            &entry,
            std::slice::from_ref(&summary_path),
            |scratch| {
                let clip_paths = &clip_paths;
                async move {
                    let out = scratch.join("summary.mp4");
                    self.transcoder.concat_clips(clip_paths, &out).await?;
                    Ok(vec![PathBuf::from("summary.mp4")])
                }
            },
        )
        .await?;

        logger.progress("Pipeline finished");
        Ok(PipelineOutcome::Summary(summary_path))
    }
}
