//! Content-addressable cache for pipeline artifacts.
//!
//! Identical video bytes map to the same cache entry regardless of task
//! identifier, so retries and duplicate submissions skip every stage whose
//! durable outputs already exist. Entries are populated only by atomic
//! moves; a crash mid-stage never leaves a partial file under a final path.

use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{WorkerError, WorkerResult};

/// Block size for streaming the video through the hasher.
const HASH_BLOCK_SIZE: usize = 64 * 1024;

/// Content cache rooted at a directory, keyed by video content hash.
#[derive(Debug, Clone)]
pub struct ContentCache {
    root: PathBuf,
}

impl ContentCache {
    /// Create a cache rooted at `root` (created lazily per entry).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Compute the cache key for a video: SHA-256 over the full file bytes,
    /// streamed in fixed-size blocks.
    pub async fn key_for(&self, video: impl AsRef<Path>) -> WorkerResult<String> {
        let video = video.as_ref().to_path_buf();
        let hash = tokio::task::spawn_blocking(move || -> std::io::Result<String> {
            let mut file = std::fs::File::open(&video)?;
            let mut hasher = Sha256::new();
            let mut block = vec![0u8; HASH_BLOCK_SIZE];
            loop {
                let n = file.read(&mut block)?;
                if n == 0 {
                    break;
                }
                hasher.update(&block[..n]);
            }
            Ok(format!("{:x}", hasher.finalize()))
        })
        .await
        .map_err(|e| WorkerError::Io(std::io::Error::other(e)))??;

        debug!(hash = %hash, "Computed content hash");
        Ok(hash)
    }

    /// Open (creating if absent) the cache entry for a content hash.
    pub fn entry(&self, hash: &str) -> WorkerResult<CacheEntry> {
        let dir = self.root.join(hash);
        std::fs::create_dir_all(&dir)?;
        Ok(CacheEntry { dir })
    }
}

/// One cache entry: the directory holding every stage's durable outputs
/// for a single content hash.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    dir: PathBuf,
}

impl CacheEntry {
    /// The entry directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn audio_path(&self) -> PathBuf {
        self.dir.join("audio.wav")
    }

    pub fn transcript_txt_path(&self) -> PathBuf {
        self.dir.join("transcript.txt")
    }

    pub fn transcript_json_path(&self) -> PathBuf {
        self.dir.join("transcript.json")
    }

    pub fn events_path(&self) -> PathBuf {
        self.dir.join("events.json")
    }

    pub fn clips_dir(&self) -> PathBuf {
        self.dir.join("clips")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join("summary.mp4")
    }
}

/// Check whether an artifact may be treated as a cache hit.
///
/// A file counts only if it exists, is non-empty, and (for `.json` files)
/// parses; a zero-byte or corrupt file is a cache miss, never a hit.
pub fn artifact_is_valid(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() || meta.len() == 0 {
        return false;
    }

    if path.extension().is_some_and(|ext| ext == "json") {
        match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice::<serde_json::Value>(&bytes).is_ok(),
            Err(_) => false,
        }
    } else {
        true
    }
}
