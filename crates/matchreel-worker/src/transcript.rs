//! Transcript text rendering.

use matchreel_models::{format_seconds, TranscriptSegment};

/// Render segments as the timestamped text handed to the event detector:
/// one `[hh:mm:ss] text` line per segment, in segment order.
pub fn format_with_timestamps(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("[{}] {}", format_seconds(s.start_secs()), s.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render segments as the plain transcript text (transcript.txt).
pub fn plain_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
