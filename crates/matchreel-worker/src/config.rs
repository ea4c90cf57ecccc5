//! Worker configuration.

use std::path::PathBuf;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root directory for per-task working directories (status.json lives here)
    pub upload_dir: PathBuf,
    /// Root directory of the content cache
    pub cache_dir: PathBuf,
    /// Maximum concurrently running tasks
    pub max_concurrent_tasks: usize,
    /// Whisper model name
    pub whisper_model: String,
    /// Gemini API key; missing key is a configuration error at detector construction
    pub gemini_api_key: Option<String>,
    /// Gemini model used for event detection
    pub gemini_model: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            cache_dir: PathBuf::from("uploads/cache"),
            max_concurrent_tasks: 2,
            whisper_model: "small".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            upload_dir: std::env::var("MATCHREEL_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            cache_dir: std::env::var("MATCHREEL_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads/cache")),
            max_concurrent_tasks: std::env::var("MATCHREEL_MAX_TASKS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            whisper_model: std::env::var("WHISPER_MODEL").unwrap_or_else(|_| "small".to_string()),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
        }
    }
}
