//! Match event records.

use serde::{Deserialize, Serialize};

/// Event categories the detector is asked to find.
///
/// The detector returns free text, so anything outside the closed set is
/// preserved as [`EventType::Other`] rather than rejected; unknown types
/// fall back to the generic overlay downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Goal,
    Foul,
    Replacement,
    MissedGoal,
    Prologue,
    Epilogue,
    #[serde(untagged)]
    Other(String),
}

impl EventType {
    /// Normalize a raw detector label into an event type.
    ///
    /// Matching is case-insensitive and tolerates `-`/`_` separators
    /// ("Missed Goal", "missed-goal" and "missed_goal" are the same type).
    pub fn from_label(label: &str) -> Self {
        let normalized = label
            .trim()
            .to_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "goal" => Self::Goal,
            "foul" => Self::Foul,
            "replacement" | "substitution" => Self::Replacement,
            "missed goal" => Self::MissedGoal,
            "prologue" => Self::Prologue,
            "epilogue" => Self::Epilogue,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Human-readable label (original casing for `Other`).
    pub fn label(&self) -> &str {
        match self {
            Self::Goal => "goal",
            Self::Foul => "foul",
            Self::Replacement => "replacement",
            Self::MissedGoal => "missed goal",
            Self::Prologue => "prologue",
            Self::Epilogue => "epilogue",
            Self::Other(label) => label,
        }
    }

    /// Filename-safe slug: lower-cased with spaces replaced by underscores.
    pub fn slug(&self) -> String {
        self.label().to_lowercase().replace(' ', "_")
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single match event parsed from the detector response.
///
/// Immutable once created; the ordered list is persisted as the task's
/// canonical `events.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Start timestamp (HH:MM:SS)
    pub start_timestamp: String,
    /// End timestamp (HH:MM:SS)
    pub end_timestamp: String,
    /// Team name, or "N/A" for neutral events
    pub team: String,
    /// Raw event type label as returned by the detector
    pub event_type: String,
    /// Short description of the event
    pub description: String,
}

impl EventRecord {
    /// Normalized event type for overlay and filename selection.
    pub fn kind(&self) -> EventType {
        EventType::from_label(&self.event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_closed_set() {
        assert_eq!(EventType::from_label("goal"), EventType::Goal);
        assert_eq!(EventType::from_label("Goal"), EventType::Goal);
        assert_eq!(EventType::from_label(" FOUL "), EventType::Foul);
        assert_eq!(EventType::from_label("missed goal"), EventType::MissedGoal);
        assert_eq!(EventType::from_label("Missed-Goal"), EventType::MissedGoal);
        assert_eq!(EventType::from_label("missed_goal"), EventType::MissedGoal);
        assert_eq!(EventType::from_label("prologue"), EventType::Prologue);
        assert_eq!(EventType::from_label("epilogue"), EventType::Epilogue);
        assert_eq!(EventType::from_label("substitution"), EventType::Replacement);
    }

    #[test]
    fn test_from_label_unknown_preserved() {
        let kind = EventType::from_label("corner kick");
        assert_eq!(kind, EventType::Other("corner kick".to_string()));
        assert_eq!(kind.label(), "corner kick");
    }

    #[test]
    fn test_slug() {
        assert_eq!(EventType::Goal.slug(), "goal");
        assert_eq!(EventType::MissedGoal.slug(), "missed_goal");
        assert_eq!(
            EventType::Other("Corner Kick".to_string()).slug(),
            "corner_kick"
        );
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = EventRecord {
            start_timestamp: "00:12:03".to_string(),
            end_timestamp: "00:12:25".to_string(),
            team: "Argentina".to_string(),
            event_type: "goal".to_string(),
            description: "Header Goal by Messi".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.kind(), EventType::Goal);
    }
}
