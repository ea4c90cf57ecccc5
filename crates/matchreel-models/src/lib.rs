//! Shared data models for the MatchReel pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Match events and their closed type set
//! - Transcript segments
//! - Clip plans and overlay styles
//! - Task status snapshots (status.json schema)
//! - Timestamp parsing/formatting

pub mod clip;
pub mod event;
pub mod overlay;
pub mod status;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use clip::{plan_clips, ClipPlan};
pub use event::{EventRecord, EventType};
pub use overlay::OverlayStyle;
pub use status::StatusSnapshot;
pub use timestamp::{format_seconds, parse_timestamp, TimestampError};
pub use transcript::TranscriptSegment;
