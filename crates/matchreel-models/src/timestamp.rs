//! Timestamp parsing and formatting utilities.
//!
//! The detector protocol and all persisted artifacts use whole-second
//! `HH:MM:SS` timecodes. Parsing also tolerates `MM:SS` and bare `SS`
//! since models occasionally drop leading components.

/// Parse a timestamp string to total seconds.
///
/// Supports `HH:MM:SS`, `MM:SS`, and `SS`.
///
/// # Examples
/// ```
/// use matchreel_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("00:12:03").unwrap(), 723);
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330);
/// assert_eq!(parse_timestamp("90").unwrap(), 90);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<u64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    let mut total: u64 = 0;
    for (i, part) in parts.iter().enumerate() {
        let component = match (parts.len(), i) {
            (3, 0) => "hours",
            (3, 1) | (2, 0) => "minutes",
            _ => "seconds",
        };
        let value: u64 = part
            .trim()
            .parse()
            .map_err(|_| TimestampError::InvalidValue(component, part.to_string()))?;
        total = total * 60 + value;
    }

    Ok(total)
}

/// Format total seconds as an `HH:MM:SS` string.
///
/// # Examples
/// ```
/// use matchreel_models::timestamp::format_seconds;
/// assert_eq!(format_seconds(723), "00:12:03");
/// ```
pub fn format_seconds(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,

    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("Invalid timestamp format '{0}'. Use HH:MM:SS, MM:SS, or SS")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_hh_mm_ss() {
        assert_eq!(parse_timestamp("00:00:00").unwrap(), 0);
        assert_eq!(parse_timestamp("00:01:00").unwrap(), 60);
        assert_eq!(parse_timestamp("01:00:00").unwrap(), 3600);
        assert_eq!(parse_timestamp("00:12:03").unwrap(), 723);
        assert_eq!(parse_timestamp("01:30:45").unwrap(), 5445);
    }

    #[test]
    fn test_parse_timestamp_short_forms() {
        assert_eq!(parse_timestamp("05:30").unwrap(), 330);
        assert_eq!(parse_timestamp("90").unwrap(), 90);
        assert_eq!(parse_timestamp("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_timestamp_trims_whitespace() {
        assert_eq!(parse_timestamp(" 00:12:03 ").unwrap(), 723);
    }

    #[test]
    fn test_parse_timestamp_errors() {
        assert!(matches!(parse_timestamp(""), Err(TimestampError::Empty)));
        assert!(matches!(parse_timestamp("  "), Err(TimestampError::Empty)));
        assert!(matches!(
            parse_timestamp("abc"),
            Err(TimestampError::InvalidValue(_, _))
        ));
        assert!(matches!(
            parse_timestamp("-5"),
            Err(TimestampError::InvalidValue(_, _))
        ));
        assert!(matches!(
            parse_timestamp("1:2:3:4"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "00:00:00");
        assert_eq!(format_seconds(90), "00:01:30");
        assert_eq!(format_seconds(723), "00:12:03");
        assert_eq!(format_seconds(3661), "01:01:01");
    }

    #[test]
    fn test_round_trip() {
        for ts in ["00:00:00", "00:12:03", "01:30:45", "23:59:59"] {
            let secs = parse_timestamp(ts).unwrap();
            assert_eq!(parse_timestamp(&format_seconds(secs)).unwrap(), secs);
            assert_eq!(format_seconds(secs), ts);
        }
    }
}
