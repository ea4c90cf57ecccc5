//! FFmpeg and Whisper CLI wrappers for the MatchReel pipeline.
//!
//! All video/audio work goes through external tools on local filesystem
//! paths; this crate builds the commands, runs them, and normalizes
//! failures into [`MediaError`].

pub mod command;
pub mod error;
pub mod fs_utils;
pub mod transcode;
pub mod transcribe;

pub use command::{check_ffmpeg, check_whisper, FfmpegCommand};
pub use error::{MediaError, MediaResult};
pub use fs_utils::move_file;
pub use transcode::{concat_clips, cut_clip, extract_audio};
pub use transcribe::transcribe;
