//! End-to-end pipeline tests against fake collaborators.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use matchreel_models::{OverlayStyle, TranscriptSegment};
use matchreel_worker::{
    ContentCache, EventDetector, MediaTranscoder, Pipeline, PipelineOutcome, TaskManager,
    TaskStatusStore, Transcriber, WorkerConfig, WorkerError, WorkerResult,
};

/// Writes deterministic bytes instead of invoking ffmpeg.
#[derive(Default)]
struct FakeTranscoder {
    extract_calls: AtomicUsize,
    cut_calls: AtomicUsize,
    concat_calls: AtomicUsize,
    fail_cuts: bool,
}

#[async_trait]
impl MediaTranscoder for FakeTranscoder {
    async fn extract_audio(&self, _video: &Path, output: &Path) -> WorkerResult<()> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(output, b"fake pcm audio").await?;
        Ok(())
    }

    async fn cut_clip(
        &self,
        _video: &Path,
        output: &Path,
        start_secs: u64,
        duration_secs: u64,
        overlay: &OverlayStyle,
    ) -> WorkerResult<()> {
        self.cut_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_cuts {
            return Err(WorkerError::detection_failed("ffmpeg exploded"));
        }
        let bytes = format!("clip {}+{} {}", start_secs, duration_secs, overlay.text);
        tokio::fs::write(output, bytes).await?;
        Ok(())
    }

    async fn concat_clips(&self, clips: &[PathBuf], output: &Path) -> WorkerResult<()> {
        self.concat_calls.fetch_add(1, Ordering::SeqCst);
        let mut joined = Vec::new();
        for clip in clips {
            joined.extend(tokio::fs::read(clip).await?);
            joined.push(b'\n');
        }
        tokio::fs::write(output, joined).await?;
        Ok(())
    }
}

struct FakeTranscriber {
    calls: AtomicUsize,
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(
        &self,
        _audio: &Path,
        _scratch_dir: &Path,
    ) -> WorkerResult<Vec<TranscriptSegment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            TranscriptSegment {
                start: 0.0,
                text: " Kick off.".to_string(),
            },
            TranscriptSegment {
                start: 723.0,
                text: " And it's a goal!".to_string(),
            },
        ])
    }
}

struct FakeDetector {
    response: String,
    calls: AtomicUsize,
}

impl FakeDetector {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EventDetector for FakeDetector {
    async fn detect(&self, _formatted_transcript: &str) -> WorkerResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Two good lines, one malformed line, one with an inverted span.
const DETECTOR_RESPONSE: &str = "\
00:12:03 - 00:12:25 - Argentina - goal - Header Goal by Messi
bad - line
00:30:00 - 00:29:00 - France - foul - Inverted span
00:45:10 - 00:45:40 - France - missed goal - Shot off the post
";

struct Harness {
    _root: TempDir,
    video: PathBuf,
    task_dir: PathBuf,
    transcoder: Arc<FakeTranscoder>,
    transcriber: Arc<FakeTranscriber>,
    detector: Arc<FakeDetector>,
    pipeline: Pipeline,
}

fn harness(detector_response: &str, fail_cuts: bool) -> Harness {
    let root = TempDir::new().unwrap();
    let video = root.path().join("match.mp4");
    std::fs::write(&video, b"full broadcast bytes").unwrap();
    let task_dir = root.path().join("task");
    std::fs::create_dir_all(&task_dir).unwrap();

    let transcoder = Arc::new(FakeTranscoder {
        fail_cuts,
        ..FakeTranscoder::default()
    });
    let transcriber = Arc::new(FakeTranscriber {
        calls: AtomicUsize::new(0),
    });
    let detector = Arc::new(FakeDetector::new(detector_response));

    let pipeline = Pipeline::new(
        ContentCache::new(root.path().join("cache")),
        transcoder.clone(),
        transcriber.clone(),
        detector.clone(),
    );

    Harness {
        _root: root,
        video,
        task_dir,
        transcoder,
        transcriber,
        detector,
        pipeline,
    }
}

#[tokio::test]
async fn full_pipeline_produces_summary() {
    let h = harness(DETECTOR_RESPONSE, false);
    let status = TaskStatusStore::new(&h.task_dir);

    let outcome = h.pipeline.run("task-1", &h.video, &status).await.unwrap();

    let PipelineOutcome::Summary(summary) = outcome else {
        panic!("expected a summary");
    };
    assert!(summary.ends_with("summary.mp4"));
    assert!(summary.exists());

    // Canonical events keep the inverted-span record; the malformed line
    // is gone at parse time.
    let entry_dir = summary.parent().unwrap();
    let events: Vec<serde_json::Value> =
        serde_json::from_slice(&std::fs::read(entry_dir.join("events.json")).unwrap()).unwrap();
    assert_eq!(events.len(), 3);

    // Only the two valid spans became clips, with deterministic names
    assert!(entry_dir.join("clips/clip_1_goal.mp4").exists());
    assert!(entry_dir.join("clips/clip_3_missed_goal.mp4").exists());
    assert_eq!(h.transcoder.cut_calls.load(Ordering::SeqCst), 2);

    // The summary stitches the clips in plan order
    let summary_bytes = std::fs::read(&summary).unwrap();
    let text = String::from_utf8(summary_bytes).unwrap();
    assert!(text.starts_with("clip 723+22 GOAL by ARGENTINA"));
    assert!(text.contains("MISSED CHANCE: FRANCE"));

    // The last running status written by the pipeline itself
    assert_eq!(status.read().await.status, "Stitching summary video...");
}

#[tokio::test]
async fn rerun_resumes_from_cache() {
    let h = harness(DETECTOR_RESPONSE, false);
    let status = TaskStatusStore::new(&h.task_dir);

    let first = h.pipeline.run("task-1", &h.video, &status).await.unwrap();
    let second = h.pipeline.run("task-2", &h.video, &status).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.transcoder.extract_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.transcriber.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.detector.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.transcoder.cut_calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.transcoder.concat_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn corrupt_cached_artifact_is_regenerated() {
    let h = harness(DETECTOR_RESPONSE, false);
    let status = TaskStatusStore::new(&h.task_dir);

    let PipelineOutcome::Summary(summary) =
        h.pipeline.run("task-1", &h.video, &status).await.unwrap()
    else {
        panic!("expected a summary");
    };

    // Truncate events.json: non-empty but invalid JSON must be a miss
    let events_path = summary.parent().unwrap().join("events.json");
    std::fs::write(&events_path, b"[{\"start_timestamp\":").unwrap();

    h.pipeline.run("task-2", &h.video, &status).await.unwrap();

    assert_eq!(h.detector.calls.load(Ordering::SeqCst), 2);
    // Upstream stages were still cache hits
    assert_eq!(h.transcoder.extract_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.transcriber.calls.load(Ordering::SeqCst), 1);
    // The regenerated file parses again
    let events: Vec<serde_json::Value> =
        serde_json::from_slice(&std::fs::read(&events_path).unwrap()).unwrap();
    assert_eq!(events.len(), 3);
}

#[tokio::test]
async fn zero_valid_events_completes_without_summary() {
    let h = harness("The transcript contains no notable events.", false);
    let status = TaskStatusStore::new(&h.task_dir);

    let outcome = h.pipeline.run("task-1", &h.video, &status).await.unwrap();
    assert_eq!(outcome, PipelineOutcome::NoHighlights);

    let cache = ContentCache::new(h._root.path().join("cache"));
    let hash = cache.key_for(&h.video).await.unwrap();
    let entry = cache.entry(&hash).unwrap();
    assert!(!entry.summary_path().exists());
    assert_eq!(h.transcoder.cut_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stage_failure_is_tagged_and_leaves_cache_resumable() {
    let h = harness(DETECTOR_RESPONSE, true);
    let status = TaskStatusStore::new(&h.task_dir);

    let err = h.pipeline.run("task-1", &h.video, &status).await.unwrap_err();
    assert!(matches!(
        err,
        WorkerError::StageFailed {
            stage: "clip_generation",
            ..
        }
    ));

    // Earlier stages are cached; the failed stage left nothing behind
    let cache = ContentCache::new(h._root.path().join("cache"));
    let hash = cache.key_for(&h.video).await.unwrap();
    let entry = cache.entry(&hash).unwrap();
    assert!(entry.audio_path().exists());
    assert!(entry.events_path().exists());
    assert!(!entry.clips_dir().join("clip_1_goal.mp4").exists());
    assert!(!entry.summary_path().exists());
}

fn manager(root: &Path, detector_response: &str) -> TaskManager {
    let config = WorkerConfig {
        upload_dir: root.join("uploads"),
        cache_dir: root.join("cache"),
        max_concurrent_tasks: 4,
        ..WorkerConfig::default()
    };
    let pipeline = Pipeline::new(
        ContentCache::new(config.cache_dir.clone()),
        Arc::new(FakeTranscoder::default()),
        Arc::new(FakeTranscriber {
            calls: AtomicUsize::new(0),
        }),
        Arc::new(FakeDetector::new(detector_response)),
    );
    TaskManager::new(config, pipeline)
}

#[tokio::test]
async fn executor_writes_terminal_status() {
    let root = TempDir::new().unwrap();
    let video = root.path().join("match.mp4");
    std::fs::write(&video, b"broadcast").unwrap();

    let manager = manager(root.path(), DETECTOR_RESPONSE);
    let task_id = manager.submit(video).await.unwrap();

    // Polling before any status write is well-defined
    let early = manager.status_store(&task_id).read().await;
    assert!(!early.is_error());

    manager.join_all().await;

    let snapshot = manager.status_store(&task_id).read().await;
    assert_eq!(snapshot.status, "Complete");
    assert_eq!(snapshot.summary_filename.as_deref(), Some("summary.mp4"));
}

#[tokio::test]
async fn executor_reports_no_highlights_as_success() {
    let root = TempDir::new().unwrap();
    let video = root.path().join("match.mp4");
    std::fs::write(&video, b"broadcast").unwrap();

    let manager = manager(root.path(), "nothing here");
    let task_id = manager.submit(video).await.unwrap();
    manager.join_all().await;

    let snapshot = manager.status_store(&task_id).read().await;
    assert_eq!(snapshot.status, "Complete: no highlights found");
    assert!(snapshot.summary_filename.is_none());
}

#[tokio::test]
async fn concurrent_identical_submissions_share_one_cache_entry() {
    let root = TempDir::new().unwrap();
    let video = root.path().join("match.mp4");
    std::fs::write(&video, b"broadcast").unwrap();

    let manager = manager(root.path(), DETECTOR_RESPONSE);
    let first = manager.submit(video.clone()).await.unwrap();
    let second = manager.submit(video).await.unwrap();
    assert_ne!(first, second);

    manager.join_all().await;

    for task_id in [&first, &second] {
        let snapshot = manager.status_store(task_id).read().await;
        assert_eq!(snapshot.status, "Complete");
        assert_eq!(snapshot.summary_filename.as_deref(), Some("summary.mp4"));
    }

    // One cache entry, with a readable summary
    let entries: Vec<_> = std::fs::read_dir(root.path().join("cache"))
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(entries.len(), 1);
    let summary = entries[0].path().join("summary.mp4");
    let text = String::from_utf8(std::fs::read(summary).unwrap()).unwrap();
    assert!(text.contains("GOAL by ARGENTINA"));
}
