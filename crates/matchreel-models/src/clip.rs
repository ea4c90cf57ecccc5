//! Clip planning.
//!
//! Derives the render plan for each valid event record: cut boundaries,
//! a deterministic output filename, and the overlay style. The plan order
//! is the stitching order.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event::EventRecord;
use crate::overlay::OverlayStyle;
use crate::timestamp::parse_timestamp;

/// Render plan for a single clip, derived deterministically from an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipPlan {
    /// Index of the source event in the canonical events list
    pub event_index: usize,
    /// Output filename within the cache entry's clips directory
    pub filename: String,
    /// Cut start offset in seconds
    pub start_secs: u64,
    /// Cut duration in seconds
    pub duration_secs: u64,
    /// Overlay burned into the clip
    pub overlay: OverlayStyle,
}

/// Plan clips for an ordered event list.
///
/// Events whose timestamps fail to parse or whose span is not strictly
/// positive are dropped with a warning; a zero or negative span indicates
/// a detector timing defect and must never reach the transcoder.
pub fn plan_clips(events: &[EventRecord]) -> Vec<ClipPlan> {
    let mut plans = Vec::with_capacity(events.len());

    for (i, event) in events.iter().enumerate() {
        let (start_secs, end_secs) = match (
            parse_timestamp(&event.start_timestamp),
            parse_timestamp(&event.end_timestamp),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            (start, end) => {
                warn!(
                    event_index = i,
                    start = %event.start_timestamp,
                    end = %event.end_timestamp,
                    error = ?start.err().or(end.err()),
                    "Skipping event with unparseable timestamps"
                );
                continue;
            }
        };

        if end_secs <= start_secs {
            warn!(
                event_index = i,
                event_type = %event.event_type,
                start = %event.start_timestamp,
                end = %event.end_timestamp,
                "Skipping event with non-positive duration"
            );
            continue;
        }

        plans.push(ClipPlan {
            event_index: i,
            filename: format!("clip_{}_{}.mp4", i + 1, event.kind().slug()),
            start_secs,
            duration_secs: end_secs - start_secs,
            overlay: OverlayStyle::for_event(event),
        });
    }

    plans
}
