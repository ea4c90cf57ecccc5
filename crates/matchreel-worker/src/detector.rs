//! Event detector collaborators.
//!
//! The production detector sends the timestamped transcript to the Gemini
//! API and returns the raw line-protocol response for
//! [`crate::protocol::parse_events`] to defuse.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{WorkerError, WorkerResult};

/// Detects match events in a timestamped transcript, returning the raw
/// line-protocol text.
#[async_trait]
pub trait EventDetector: Send + Sync {
    async fn detect(&self, formatted_transcript: &str) -> WorkerResult<String>;
}

/// Instruction block sent ahead of the transcript.
const EVENT_PROMPT: &str = r#"Extract all instances of the following events from the provided match transcript, and return only the output in the format specified below. Do not include any explanatory text, metadata, or commentary outside the specified format.

Events to extract:
- Goal: a goal is scored (including penalties, free kicks, own goals)
- Foul: a foul is committed (including yellow/red card incidents)
- Replacement: a player substitution occurs
- Missed Goal: a clear scoring opportunity is missed (shots wide, saved, hit post/crossbar)
- Prologue: beginning of match coverage (team introductions, formations, pre-match analysis)
- Epilogue: end of match coverage (final whistle, celebrations, post-match analysis)

Timestamp rules:
- The start timestamp must be the earlier of 8 seconds before the event or the beginning of meaningful build-up play.
- The end timestamp must extend until all related context concludes (celebrations, replays, VAR reviews, substitution process, commentary aftermath).

Output format, one event per line:
[start timestamp] - [end timestamp] - [team name] - [type] - [short description]

Format requirements:
- Timestamps in hh:mm:ss format
- Team name: actual team names (e.g., "Argentina", "France") or "N/A" for neutral events
- Type: exactly one of "goal", "foul", "replacement", "missed goal", "prologue", "epilogue"
- Description: brief, meaningful phrase (e.g., "Header Goal by Messi", "Foul on Mbappe")"#;

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Gemini-backed event detector.
pub struct GeminiDetector {
    api_key: String,
    model: String,
    client: Client,
}

// Manual impl so the credential never reaches logs or test output
impl std::fmt::Debug for GeminiDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiDetector")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiDetector {
    /// Create a detector with an explicit credential.
    ///
    /// A missing credential is a configuration error up front rather than
    /// a stage failure mid-pipeline.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> WorkerResult<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| WorkerError::config_error("Gemini API key not configured"))?;

        Ok(Self {
            api_key,
            model: model.into(),
            client: Client::new(),
        })
    }

    fn build_prompt(&self, formatted_transcript: &str) -> String {
        format!(
            "{EVENT_PROMPT}\n\n--- TRANSCRIPT BEGINS ---\n{formatted_transcript}\n--- TRANSCRIPT ENDS ---\n"
        )
    }
}

#[async_trait]
impl EventDetector for GeminiDetector {
    async fn detect(&self, formatted_transcript: &str) -> WorkerResult<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: self.build_prompt(formatted_transcript),
                }],
            }],
        };

        info!(model = %self.model, "Sending transcript to Gemini for event detection");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WorkerError::detection_failed(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WorkerError::detection_failed(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            WorkerError::detection_failed(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| WorkerError::detection_failed("No content in Gemini response"))?;

        debug!(chars = text.len(), "Received detector response");
        Ok(strip_code_fences(text).to_string())
    }
}

/// Strip a surrounding markdown code fence, if the model added one.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```")
        .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
