//! Transcript parsing for Sitat.
//!
//! Handles the path from raw transcript text to an ordered sequence of speaker
//! segments: format detection, line-by-line segment parsing, end-timestamp
//! inference, and question/answer pairing.

mod format;
mod parser;
mod qa;

pub use format::{detect_format, FormatTag, LineParser, ParsedLine};
pub use parser::{infer_missing_ends, parse, SegmentParser};
pub use qa::{find_pairs, QaPair};

use serde::{Deserialize, Serialize};

/// A contiguous span of transcript attributed to one speaker.
///
/// Created when a line matches a speaker/timestamp pattern and grown by
/// appending continuation lines until the next speaker line. End timestamps
/// are back-filled by [`infer_missing_ends`] after the full sequence is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segment {
    /// Spoken content, space-joined across continuation lines.
    pub text: String,
    /// Speaker label as it appears in the source, if any.
    pub speaker: Option<String>,
    /// Canonical `HH:MM:SS` start, when the segment began with a timestamp.
    pub start_timestamp: Option<String>,
    /// Canonical `HH:MM:SS` end; absent until back-filled.
    pub end_timestamp: Option<String>,
    /// Every canonicalized timestamp seen while building this segment,
    /// including inline ones. Fallback source for the end timestamp.
    pub raw_timestamps: Vec<String>,
}

impl Segment {
    /// Append a continuation line's text, space-joined.
    pub fn append_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }

    /// Format the segment for display, e.g. `Speaker 1 (00:01:00 - 00:01:10): text`.
    pub fn format_display(&self) -> String {
        let speaker = self.speaker.as_deref().unwrap_or("(unattributed)");
        match (&self.start_timestamp, &self.end_timestamp) {
            (Some(start), Some(end)) => format!("{} ({} - {}): {}", speaker, start, end, self.text),
            (Some(start), None) => format!("{} ({}): {}", speaker, start, self.text),
            _ => format!("{}: {}", speaker, self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_text() {
        let mut segment = Segment {
            text: "Hello".to_string(),
            ..Default::default()
        };
        segment.append_text("  world  ");
        segment.append_text("");
        assert_eq!(segment.text, "Hello world");
    }

    #[test]
    fn test_format_display() {
        let segment = Segment {
            text: "Nice to meet you.".to_string(),
            speaker: Some("Adri".to_string()),
            start_timestamp: Some("00:00:38".to_string()),
            end_timestamp: Some("00:00:39".to_string()),
            raw_timestamps: vec![],
        };
        assert_eq!(
            segment.format_display(),
            "Adri (00:00:38 - 00:00:39): Nice to meet you."
        );
    }
}
