//! Transcript segment model.

use serde::{Deserialize, Serialize};

/// One timestamped segment produced by the transcriber.
///
/// Segments are ordered by start offset and persisted as `transcript.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start offset in seconds from the beginning of the audio
    pub start: f64,
    /// Spoken text for this segment
    pub text: String,
}

impl TranscriptSegment {
    /// Start offset truncated to whole seconds for display timecodes.
    pub fn start_secs(&self) -> u64 {
        self.start.max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_serde() {
        let segment: TranscriptSegment =
            serde_json::from_str(r#"{"start": 12.34, "text": " And it's a goal!"}"#).unwrap();
        assert_eq!(segment.start_secs(), 12);
        assert_eq!(segment.text, " And it's a goal!");
    }
}
