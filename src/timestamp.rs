//! Timestamp normalization for transcript parsing.
//!
//! Interview transcripts arrive with timestamps in several shapes: `MM:SS`,
//! `HH:MM:SS`, bracketed `[1:30]`, parenthetical `(00:01:10)`. Everything is
//! normalized to a canonical `HH:MM:SS` string before further processing.

use tracing::warn;

/// Normalize a raw timestamp string to canonical `HH:MM:SS`.
///
/// Two colon-separated parts are treated as `MM:SS` (hours forced to `00`),
/// three parts as `HH:MM:SS`. Each component is left-zero-padded to width 2.
/// Returns `None` for anything else.
///
/// Component values are not range-checked (`MM` > 59 passes through); callers
/// must treat `None` as "unknown", never as zero.
pub fn normalize(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '(' | ')'))
        .collect();
    let cleaned = cleaned.trim();

    let parts: Vec<&str> = cleaned.split(':').collect();

    let components: Option<Vec<u32>> = parts
        .iter()
        .map(|p| p.trim().parse::<u32>().ok())
        .collect();

    let components = match components {
        Some(c) => c,
        None => {
            warn!("Unparseable timestamp: {:?}", raw);
            return None;
        }
    };

    match components.as_slice() {
        [minutes, seconds] => Some(format!("00:{:02}:{:02}", minutes, seconds)),
        [hours, minutes, seconds] => Some(format!("{:02}:{:02}:{:02}", hours, minutes, seconds)),
        _ => {
            warn!("Unparseable timestamp: {:?}", raw);
            None
        }
    }
}

/// Interpret a canonical timestamp as a duration in seconds.
///
/// Used for ordering comparisons; returns `None` if the string is not a
/// well-formed `HH:MM:SS` value.
pub fn timestamp_seconds(timestamp: &str) -> Option<u32> {
    let parts: Vec<&str> = timestamp.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: u32 = parts[0].parse().ok()?;
    let minutes: u32 = parts[1].parse().ok()?;
    let seconds: u32 = parts[2].parse().ok()?;

    Some(hours * 3600 + minutes * 60 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mm_ss() {
        assert_eq!(normalize("1:30"), Some("00:01:30".to_string()));
        assert_eq!(normalize("12:05"), Some("00:12:05".to_string()));
    }

    #[test]
    fn test_normalize_hh_mm_ss() {
        assert_eq!(normalize("00:01:10"), Some("00:01:10".to_string()));
        assert_eq!(normalize("1:2:3"), Some("01:02:03".to_string()));
    }

    #[test]
    fn test_normalize_strips_brackets() {
        assert_eq!(normalize("[1:30]"), Some("00:01:30".to_string()));
        assert_eq!(normalize("(00:01:10)"), Some("00:01:10".to_string()));
    }

    #[test]
    fn test_normalize_invalid() {
        assert_eq!(normalize("invalid"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("1:2:3:4"), None);
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in ["1:30", "00:01:10", "12:05:59"] {
            let once = normalize(input).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_canonical_width() {
        let pattern = regex::Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap();
        for input in ["1:30", "9:5", "01:02:03", "[7:45]"] {
            let out = normalize(input).unwrap();
            assert!(pattern.is_match(&out), "not canonical: {}", out);
        }
    }

    #[test]
    fn test_out_of_range_passes_through() {
        // Looseness preserved: minutes > 59 are not rejected.
        assert_eq!(normalize("99:99"), Some("00:99:99".to_string()));
    }

    #[test]
    fn test_timestamp_seconds() {
        assert_eq!(timestamp_seconds("00:01:30"), Some(90));
        assert_eq!(timestamp_seconds("01:00:00"), Some(3600));
        assert_eq!(timestamp_seconds("1:30"), None);
    }
}
