//! Detector response protocol parser.
//!
//! The event detector returns free-form model output that is supposed to
//! be one event per line in the fixed format
//!
//! ```text
//! [start timestamp] - [end timestamp] - [team name] - [type] - [short description]
//! ```
//!
//! This is an external wire format and is parsed defensively: the split is
//! bounded so separators embedded in the description survive, and a line
//! with the wrong field count is skipped with a warning instead of
//! aborting the batch.

use tracing::warn;

use matchreel_models::EventRecord;

/// Field separator in the detector line protocol.
const FIELD_SEPARATOR: &str = " - ";

/// Number of fields in a well-formed event line.
const FIELD_COUNT: usize = 5;

/// Parse a raw detector response into an ordered event list.
///
/// Input line order is preserved. An empty result is a valid outcome,
/// not an error: it means the detector found nothing usable.
pub fn parse_events(response: &str) -> Vec<EventRecord> {
    let mut events = Vec::new();

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Some(event) => events.push(event),
            None => {
                warn!(line = %line, "Skipping malformed detector line");
            }
        }
    }

    events
}

/// Parse a single event line, or `None` if it is malformed.
fn parse_line(line: &str) -> Option<EventRecord> {
    // Bounded split: at most four separators count, the rest stay in the
    // description field.
    let parts: Vec<&str> = line.splitn(FIELD_COUNT, FIELD_SEPARATOR).collect();
    if parts.len() != FIELD_COUNT {
        return None;
    }

    Some(EventRecord {
        start_timestamp: trim_timestamp(parts[0]),
        end_timestamp: trim_timestamp(parts[1]),
        team: parts[2].trim().to_string(),
        event_type: parts[3].trim().to_string(),
        description: parts[4].trim().to_string(),
    })
}

/// Strip surrounding brackets and whitespace from a timestamp field.
fn trim_timestamp(field: &str) -> String {
    field
        .trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example_line() {
        let events =
            parse_events("00:12:03 - 00:12:25 - Argentina - goal - Header Goal by Messi");
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.start_timestamp, "00:12:03");
        assert_eq!(event.end_timestamp, "00:12:25");
        assert_eq!(event.team, "Argentina");
        assert_eq!(event.event_type, "goal");
        assert_eq!(event.description, "Header Goal by Messi");
    }

    #[test]
    fn test_bracketed_timestamps_are_trimmed() {
        let events =
            parse_events("[00:12:03] - [00:12:25] - Argentina - goal - Header Goal by Messi");
        assert_eq!(events[0].start_timestamp, "00:12:03");
        assert_eq!(events[0].end_timestamp, "00:12:25");
    }

    #[test]
    fn test_separator_inside_description_is_kept() {
        let events = parse_events(
            "00:30:00 - 00:30:40 - N/A - replacement - Benzema OUT - Giroud IN",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "Benzema OUT - Giroud IN");
    }

    #[test]
    fn test_two_field_line_is_skipped() {
        assert!(parse_events("bad - line").is_empty());
    }

    #[test]
    fn test_malformed_line_does_not_affect_subsequent_lines() {
        let mut response = String::new();
        for i in 0..5 {
            response.push_str(&format!(
                "00:0{i}:00 - 00:0{i}:30 - Argentina - goal - Goal number {i}\n"
            ));
        }
        response.push_str("bad - line\n");
        for i in 5..9 {
            response.push_str(&format!(
                "00:0{i}:00 - 00:0{i}:30 - France - foul - Foul number {i}\n"
            ));
        }

        // Ten lines in, one malformed, nine records out
        assert_eq!(response.lines().count(), 10);
        let events = parse_events(&response);
        assert_eq!(events.len(), 9);
        assert_eq!(events[5].team, "France");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let events = parse_events(
            "\n00:01:00 - 00:01:30 - Argentina - goal - Opener\n\n   \n00:02:00 - 00:02:20 - N/A - foul - Handball\n",
        );
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_empty_response_is_not_an_error() {
        assert!(parse_events("").is_empty());
        assert!(parse_events("\n\n").is_empty());
    }

    #[test]
    fn test_entirely_malformed_response_yields_empty() {
        let events = parse_events("I could not find any events in this transcript.");
        assert!(events.is_empty());
    }

    #[test]
    fn test_line_order_preserved() {
        let events = parse_events(
            "00:05:00 - 00:05:30 - France - foul - First\n00:01:00 - 00:01:30 - Argentina - goal - Second",
        );
        assert_eq!(events[0].description, "First");
        assert_eq!(events[1].description, "Second");
    }

    #[test]
    fn test_unknown_event_type_is_preserved() {
        let events = parse_events("00:01:00 - 00:01:30 - N/A - corner kick - Near miss");
        assert_eq!(events[0].event_type, "corner kick");
    }
}
