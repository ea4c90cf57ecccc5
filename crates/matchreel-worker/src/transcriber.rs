//! Transcriber collaborator.

use std::path::Path;

use async_trait::async_trait;

use matchreel_models::TranscriptSegment;

use crate::error::WorkerResult;

/// Opaque speech-to-text capability returning timestamped segments,
/// ordered by start offset.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: &Path,
        scratch_dir: &Path,
    ) -> WorkerResult<Vec<TranscriptSegment>>;
}

/// Whisper-CLI-backed transcriber.
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    model: String,
}

impl WhisperTranscriber {
    /// Create a transcriber using the given Whisper model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(
        &self,
        audio: &Path,
        scratch_dir: &Path,
    ) -> WorkerResult<Vec<TranscriptSegment>> {
        let segments = matchreel_media::transcribe(audio, &self.model, scratch_dir).await?;
        Ok(segments)
    }
}
