//! Audio extraction, clip cutting and stitching.

use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};

/// How long the overlay stays visible at the start of a clip (seconds).
const OVERLAY_VISIBLE_SECS: u32 = 2;

/// Extract the audio track of a video to a WAV file.
pub async fn extract_audio(video: impl AsRef<Path>, output: impl AsRef<Path>) -> MediaResult<()> {
    let video = video.as_ref();
    let output = output.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    info!(
        "Extracting audio: {} -> {}",
        video.display(),
        output.display()
    );

    FfmpegCommand::new(video, output)
        .output_args(["-q:a", "0", "-map", "a"])
        .run()
        .await
}

/// Cut a clip from a video, burning a boxed text overlay into the first
/// seconds of the clip.
pub async fn cut_clip(
    video: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start_secs: u64,
    duration_secs: u64,
    overlay_text: &str,
    box_color: &str,
) -> MediaResult<()> {
    let video = video.as_ref();
    let output = output.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    info!(
        "Cutting clip: {} -> {} (start: {}s, duration: {}s)",
        video.display(),
        output.display(),
        start_secs,
        duration_secs
    );

    FfmpegCommand::new(video, output)
        .seek(start_secs)
        .duration(duration_secs)
        .video_filter(drawtext_filter(overlay_text, box_color))
        .video_codec("libx264")
        .output_args(["-b:v", "5M"])
        .audio_codec("copy")
        .output_args(["-movflags", "+faststart"])
        .run()
        .await
}

/// Concatenate clips, in order, into a single output video.
///
/// Uses the concat demuxer with stream copy; the clips all come from the
/// cutting stage so their codecs match.
pub async fn concat_clips(
    clips: &[impl AsRef<Path>],
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let output = output.as_ref();

    info!(
        "Stitching {} clips into {}",
        clips.len(),
        output.display()
    );

    let mut list = String::new();
    for clip in clips {
        let clip = clip.as_ref();
        if !clip.exists() {
            return Err(MediaError::FileNotFound(clip.to_path_buf()));
        }
        // Concat demuxer 'file' directive; quotes handle spaces in paths
        list.push_str(&format!(
            "file '{}'\n",
            clip.as_os_str().to_string_lossy().replace('\'', "'\\''")
        ));
    }

    let concat_list = output.with_extension("concat.txt");
    fs::write(&concat_list, list).await?;

    let result = FfmpegCommand::new(&concat_list, output)
        .input_arg("-f")
        .input_arg("concat")
        .input_arg("-safe")
        .input_arg("0")
        .output_args(["-c", "copy", "-movflags", "+faststart"])
        .run()
        .await;

    if let Err(e) = fs::remove_file(&concat_list).await {
        warn!(
            "Could not remove temporary concat file {}: {}",
            concat_list.display(),
            e
        );
    }

    result
}

/// Build the drawtext filter for a centered, boxed overlay shown for the
/// first seconds of the clip.
fn drawtext_filter(text: &str, box_color: &str) -> String {
    format!(
        "drawtext=text='{}':fontsize=90:fontcolor=white:box=1:boxcolor={}:boxborderw=10:\
         x=(w-text_w)/2:y=(h-text_h)/2:enable='between(t,0,{})'",
        escape_drawtext(text),
        box_color,
        OVERLAY_VISIBLE_SECS
    )
}

/// Escape characters that are special inside a quoted drawtext value.
fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
        .replace('%', "\\%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_drawtext() {
        assert_eq!(escape_drawtext("GOAL by ARGENTINA"), "GOAL by ARGENTINA");
        assert_eq!(escape_drawtext("FOUL: handball"), "FOUL\\: handball");
        assert_eq!(escape_drawtext("it's in"), "it\\'s in");
    }

    #[test]
    fn test_drawtext_filter_shape() {
        let filter = drawtext_filter("GOAL by ARGENTINA", "red@0.5");
        assert!(filter.starts_with("drawtext=text='GOAL by ARGENTINA'"));
        assert!(filter.contains("boxcolor=red@0.5"));
        assert!(filter.contains("fontsize=90"));
        assert!(filter.contains("enable='between(t,0,2)'"));
    }

    #[tokio::test]
    async fn test_missing_input_is_reported() {
        let err = extract_audio("/nonexistent/video.mp4", "/tmp/audio.wav")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
