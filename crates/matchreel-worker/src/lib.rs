//! Highlight pipeline orchestration and caching engine.
//!
//! Turns a long-form match broadcast into a highlight reel through five
//! cached stages: audio extraction, transcription, event detection, clip
//! cutting, and stitching. Every stage is idempotent through a
//! content-addressable cache keyed by the video's SHA-256, so retries and
//! duplicate submissions resume instead of redoing expensive work.

pub mod cache;
pub mod config;
pub mod detector;
pub mod error;
pub mod executor;
pub mod logging;
pub mod pipeline;
pub mod protocol;
pub mod stage;
pub mod status;
pub mod transcoder;
pub mod transcriber;
pub mod transcript;

pub use cache::{ContentCache, CacheEntry};
pub use config::WorkerConfig;
pub use detector::{EventDetector, GeminiDetector};
pub use error::{WorkerError, WorkerResult};
pub use executor::TaskManager;
pub use pipeline::{Pipeline, PipelineOutcome};
pub use stage::PipelineStage;
pub use status::TaskStatusStore;
pub use transcoder::{FfmpegTranscoder, MediaTranscoder};
pub use transcriber::{Transcriber, WhisperTranscriber};
