//! Whisper CLI transcription wrapper.

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use matchreel_models::TranscriptSegment;

use crate::command::check_whisper;
use crate::error::{MediaError, MediaResult};

/// Whisper JSON output file shape (the fields we consume).
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    text: String,
}

/// Transcribe an audio file with the Whisper CLI.
///
/// Runs `whisper` with JSON output into `scratch_dir` and parses the
/// emitted segment list. Segments come back ordered by start offset.
pub async fn transcribe(
    audio: impl AsRef<Path>,
    model: &str,
    scratch_dir: impl AsRef<Path>,
) -> MediaResult<Vec<TranscriptSegment>> {
    let audio = audio.as_ref();
    let scratch_dir = scratch_dir.as_ref();

    if !audio.exists() {
        return Err(MediaError::FileNotFound(audio.to_path_buf()));
    }
    check_whisper()?;

    info!(
        "Transcribing {} with Whisper model '{}'",
        audio.display(),
        model
    );

    let output = Command::new("whisper")
        .arg(audio)
        .args(["--model", model])
        .args(["--output_format", "json"])
        .args(["--output_dir", &scratch_dir.to_string_lossy()])
        .args(["--fp16", "False"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::whisper_failed(format!(
            "whisper exited with {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    // Whisper writes <audio stem>.json into the output directory
    let stem = audio
        .file_stem()
        .ok_or_else(|| MediaError::FileNotFound(audio.to_path_buf()))?;
    let json_path = scratch_dir.join(stem).with_extension("json");
    debug!("Reading Whisper output from {}", json_path.display());

    let raw = tokio::fs::read_to_string(&json_path).await?;
    let parsed: WhisperOutput = serde_json::from_str(&raw)?;

    let mut segments: Vec<TranscriptSegment> = parsed
        .segments
        .into_iter()
        .map(|s| TranscriptSegment {
            start: s.start,
            text: s.text,
        })
        .collect();
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_output_parsing() {
        let raw = r#"{
            "text": " Kick off. And it's a goal!",
            "segments": [
                {"id": 0, "start": 0.0, "end": 4.2, "text": " Kick off."},
                {"id": 1, "start": 4.2, "end": 9.8, "text": " And it's a goal!"}
            ],
            "language": "en"
        }"#;
        let parsed: WhisperOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.segments[1].text, " And it's a goal!");
        assert!((parsed.segments[1].start - 4.2).abs() < 1e-9);
    }
}
