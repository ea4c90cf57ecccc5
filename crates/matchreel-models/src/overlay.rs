//! Overlay text/color selection for clip rendering.

use serde::{Deserialize, Serialize};

use crate::event::{EventRecord, EventType};

/// Drawtext overlay configuration for a clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Text burned into the first seconds of the clip
    pub text: String,
    /// FFmpeg box color spec, e.g. `red@0.5`
    pub box_color: String,
}

impl OverlayStyle {
    fn new(text: String, box_color: &str) -> Self {
        Self {
            text,
            box_color: box_color.to_string(),
        }
    }

    /// Select the overlay for an event from the fixed lookup table.
    ///
    /// Goal, foul, replacement and missed-goal each get a distinct color
    /// and templated text; every other type (prologue, epilogue, unknown)
    /// uses the generic template on a neutral color.
    pub fn for_event(event: &EventRecord) -> Self {
        match event.kind() {
            EventType::Goal => Self::new(
                format!("GOAL by {}", event.team.to_uppercase()),
                "red@0.5",
            ),
            EventType::Foul => Self::new(format!("FOUL: {}", event.description), "yellow@0.5"),
            EventType::Replacement => {
                Self::new(format!("SUBSTITUTION: {}", event.description), "blue@0.5")
            }
            EventType::MissedGoal => Self::new(
                format!("MISSED CHANCE: {}", event.team.to_uppercase()),
                "orange@0.5",
            ),
            other => Self::new(
                format!("{}: {}", other.label().to_uppercase(), event.description),
                "white@0.5",
            ),
        }
    }
}
