//! Media transcoder collaborator.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use matchreel_models::OverlayStyle;

use crate::error::WorkerResult;

/// Opaque media transcoder capability: audio extraction, clip cutting with
/// overlay, and clip concatenation, all on local filesystem paths.
#[async_trait]
pub trait MediaTranscoder: Send + Sync {
    async fn extract_audio(&self, video: &Path, output: &Path) -> WorkerResult<()>;

    async fn cut_clip(
        &self,
        video: &Path,
        output: &Path,
        start_secs: u64,
        duration_secs: u64,
        overlay: &OverlayStyle,
    ) -> WorkerResult<()>;

    async fn concat_clips(&self, clips: &[PathBuf], output: &Path) -> WorkerResult<()>;
}

/// FFmpeg-backed transcoder.
#[derive(Debug, Default, Clone)]
pub struct FfmpegTranscoder;

#[async_trait]
impl MediaTranscoder for FfmpegTranscoder {
    async fn extract_audio(&self, video: &Path, output: &Path) -> WorkerResult<()> {
        matchreel_media::extract_audio(video, output).await?;
        Ok(())
    }

    async fn cut_clip(
        &self,
        video: &Path,
        output: &Path,
        start_secs: u64,
        duration_secs: u64,
        overlay: &OverlayStyle,
    ) -> WorkerResult<()> {
        matchreel_media::cut_clip(
            video,
            output,
            start_secs,
            duration_secs,
            &overlay.text,
            &overlay.box_color,
        )
        .await?;
        Ok(())
    }

    async fn concat_clips(&self, clips: &[PathBuf], output: &Path) -> WorkerResult<()> {
        matchreel_media::concat_clips(clips, output).await?;
        Ok(())
    }
}
