//! Transcript format detection and per-format line parsing.
//!
//! Interview transcripts come from several sources, each with its own
//! speaker/timestamp layout. Detection runs once over a prefix of the
//! transcript; the detected tag selects a line-parsing strategy that is then
//! applied to every line, rather than re-testing every pattern per line.

use crate::timestamp;
use regex::Regex;

/// Number of characters of the transcript inspected during detection.
const DETECTION_SAMPLE_CHARS: usize = 1000;

/// Known transcript layout patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    /// `Name (HH:MM:SS - HH:MM:SS) text` - explicit start and end per turn.
    Ranged,
    /// `Speaker N (HH:MM:SS): text` - numbered speakers, full timestamps.
    NumberedFull,
    /// `Speaker N (H:MM): text` - numbered speakers, minute-level timestamps.
    NumberedShort,
    /// `Name (HH:MM:SS): text` - free-text speaker names.
    Named,
    /// Inline `[H:MM]` / `[H:MM:SS]` tokens with no speaker headers.
    Inline,
    /// Nothing recognized; parsing falls back to the named-speaker pattern.
    Unknown,
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormatTag::Ranged => "ranged",
            FormatTag::NumberedFull => "numbered-full",
            FormatTag::NumberedShort => "numbered-short",
            FormatTag::Named => "named",
            FormatTag::Inline => "inline",
            FormatTag::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for FormatTag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ranged" => Ok(FormatTag::Ranged),
            "numbered-full" => Ok(FormatTag::NumberedFull),
            "numbered-short" => Ok(FormatTag::NumberedShort),
            "named" => Ok(FormatTag::Named),
            "inline" => Ok(FormatTag::Inline),
            "unknown" => Ok(FormatTag::Unknown),
            _ => Err(format!("Unknown transcript format: {}", s)),
        }
    }
}

/// Detect the transcript layout from a sample of its text.
///
/// Tests an ordered list of patterns against the first ~1000 characters and
/// returns the first match. Order matters: the multi-group ranged pattern is
/// tried before the single-timestamp ones that would otherwise shadow it.
/// Pure function; same input always yields the same tag.
pub fn detect_format(transcript: &str) -> FormatTag {
    let sample: &str = match transcript.char_indices().nth(DETECTION_SAMPLE_CHARS) {
        Some((byte_idx, _)) => &transcript[..byte_idx],
        None => transcript,
    };

    let ordered: &[(FormatTag, &str)] = &[
        (
            FormatTag::Ranged,
            r"(?m)^.+?\(\d{1,2}:\d{2}:\d{2}\s*-\s*\d{1,2}:\d{2}:\d{2}\)",
        ),
        (FormatTag::NumberedFull, r"(?m)^Speaker \d+\s*\(\d{1,2}:\d{2}:\d{2}\):"),
        (FormatTag::NumberedShort, r"(?m)^Speaker \d+\s*\(\d{1,2}:\d{2}\):"),
        (
            FormatTag::Named,
            r"(?m)^[A-Za-z][^()\n]*\(\d{1,2}:\d{2}(?::\d{2})?\):",
        ),
        (FormatTag::Inline, r"\[\d{1,2}:\d{2}(?::\d{2})?\]"),
    ];

    for (tag, pattern) in ordered {
        let re = Regex::new(pattern).expect("Invalid format detection regex");
        if re.is_match(sample) {
            return *tag;
        }
    }

    FormatTag::Unknown
}

/// A speaker line split into its parts, timestamps already canonicalized.
#[derive(Debug, Clone)]
pub struct ParsedLine {
    pub speaker: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub text: String,
}

/// Line-parsing strategy for one transcript layout.
pub trait LineParser: Send + Sync {
    /// Parse a line that starts a new speaker turn, or `None` for
    /// continuation lines.
    fn parse_line(&self, line: &str) -> Option<ParsedLine>;
}

/// Select the line parser for a detected format.
///
/// `Inline` transcripts have no speaker headers, so they use the named
/// pattern too; their lines accumulate as continuations and inline timestamps
/// are harvested separately. `Unknown` also falls back to the named pattern,
/// which may legitimately match nothing.
pub fn parser_for(tag: FormatTag) -> Box<dyn LineParser> {
    match tag {
        FormatTag::Ranged => Box::new(RangedLineParser::new()),
        FormatTag::NumberedFull | FormatTag::NumberedShort => Box::new(NumberedLineParser::new()),
        FormatTag::Named | FormatTag::Inline | FormatTag::Unknown => {
            Box::new(NamedLineParser::new())
        }
    }
}

/// Parses `Name (HH:MM:SS - HH:MM:SS) text`.
pub struct RangedLineParser {
    pattern: Regex,
}

impl RangedLineParser {
    pub fn new() -> Self {
        let pattern = Regex::new(
            r"^(.+?)\s*\((\d{1,2}:\d{2}(?::\d{2})?)\s*-\s*(\d{1,2}:\d{2}(?::\d{2})?)\)\s*(.*)$",
        )
        .expect("Invalid regex");
        Self { pattern }
    }
}

impl Default for RangedLineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for RangedLineParser {
    fn parse_line(&self, line: &str) -> Option<ParsedLine> {
        let caps = self.pattern.captures(line)?;
        Some(ParsedLine {
            speaker: caps[1].trim().to_string(),
            start: timestamp::normalize(&caps[2]),
            end: timestamp::normalize(&caps[3]),
            text: caps[4].trim().to_string(),
        })
    }
}

/// Parses `Speaker N (HH:MM:SS): text` and the minute-level variant.
pub struct NumberedLineParser {
    pattern: Regex,
}

impl NumberedLineParser {
    pub fn new() -> Self {
        let pattern = Regex::new(r"^(Speaker \d+)\s*\((\d{1,2}:\d{2}(?::\d{2})?)\):\s*(.*)$")
            .expect("Invalid regex");
        Self { pattern }
    }
}

impl Default for NumberedLineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for NumberedLineParser {
    fn parse_line(&self, line: &str) -> Option<ParsedLine> {
        let caps = self.pattern.captures(line)?;
        Some(ParsedLine {
            speaker: caps[1].to_string(),
            start: timestamp::normalize(&caps[2]),
            end: None,
            text: caps[3].trim().to_string(),
        })
    }
}

/// Parses `Name (HH:MM:SS): text` with a free-text speaker name.
pub struct NamedLineParser {
    pattern: Regex,
}

impl NamedLineParser {
    pub fn new() -> Self {
        let pattern = Regex::new(r"^([A-Za-z][^()\n]*?)\s*\((\d{1,2}:\d{2}(?::\d{2})?)\):\s*(.*)$")
            .expect("Invalid regex");
        Self { pattern }
    }
}

impl Default for NamedLineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for NamedLineParser {
    fn parse_line(&self, line: &str) -> Option<ParsedLine> {
        let caps = self.pattern.captures(line)?;
        Some(ParsedLine {
            speaker: caps[1].trim().to_string(),
            start: timestamp::normalize(&caps[2]),
            end: None,
            text: caps[3].trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_ranged() {
        let sample = "Adri (00:00:38 - 00:00:39) Nice to meet you.";
        assert_eq!(detect_format(sample), FormatTag::Ranged);
    }

    #[test]
    fn test_detect_numbered_full() {
        let sample = "Speaker 1 (00:01:00): Hi Brian.";
        assert_eq!(detect_format(sample), FormatTag::NumberedFull);
    }

    #[test]
    fn test_detect_numbered_short() {
        let sample = "Speaker 2 (1:05): We had our own warehouse.";
        assert_eq!(detect_format(sample), FormatTag::NumberedShort);
    }

    #[test]
    fn test_detect_named() {
        let sample = "Brian Chesky (00:02:10): So the first thing we did was...";
        assert_eq!(detect_format(sample), FormatTag::Named);
    }

    #[test]
    fn test_detect_inline() {
        let sample = "We talked about pricing [1:30] and then moved on [2:45] to onboarding.";
        assert_eq!(detect_format(sample), FormatTag::Inline);
    }

    #[test]
    fn test_detect_unknown() {
        let sample = "Just a plain paragraph of prose with no markers at all.";
        assert_eq!(detect_format(sample), FormatTag::Unknown);
    }

    #[test]
    fn test_detect_is_deterministic() {
        let sample = "Speaker 1 (00:01:00): Hi.\nSpeaker 2 (00:01:10): Hello.";
        let first = detect_format(sample);
        for _ in 0..3 {
            assert_eq!(detect_format(sample), first);
        }
    }

    #[test]
    fn test_ranged_shadows_named() {
        // A ranged line also matches the named single-timestamp pattern up to
        // the dash; ordering must pick the ranged tag.
        let sample = "Adri (00:00:38 - 00:00:39) Nice to meet you.\nBo (00:00:40): Likewise.";
        assert_eq!(detect_format(sample), FormatTag::Ranged);
    }

    #[test]
    fn test_ranged_line_parser() {
        let parser = RangedLineParser::new();
        let parsed = parser
            .parse_line("Adri (00:00:38 - 00:00:39) Nice to meet you.")
            .unwrap();
        assert_eq!(parsed.speaker, "Adri");
        assert_eq!(parsed.start.as_deref(), Some("00:00:38"));
        assert_eq!(parsed.end.as_deref(), Some("00:00:39"));
        assert_eq!(parsed.text, "Nice to meet you.");
    }

    #[test]
    fn test_numbered_line_parser() {
        let parser = NumberedLineParser::new();
        let parsed = parser
            .parse_line("Speaker 1 (00:01:00): Hi Brian. What was your current solution?")
            .unwrap();
        assert_eq!(parsed.speaker, "Speaker 1");
        assert_eq!(parsed.start.as_deref(), Some("00:01:00"));
        assert_eq!(parsed.end, None);
    }

    #[test]
    fn test_numbered_line_parser_short_timestamp() {
        let parser = NumberedLineParser::new();
        let parsed = parser.parse_line("Speaker 2 (1:05): Sure.").unwrap();
        assert_eq!(parsed.start.as_deref(), Some("00:01:05"));
    }

    #[test]
    fn test_named_line_parser() {
        let parser = NamedLineParser::new();
        let parsed = parser
            .parse_line("Mary Jo (00:12:01): We looked at three vendors.")
            .unwrap();
        assert_eq!(parsed.speaker, "Mary Jo");
        assert_eq!(parsed.start.as_deref(), Some("00:12:01"));
    }

    #[test]
    fn test_continuation_line_is_not_a_speaker_line() {
        let parser = NumberedLineParser::new();
        assert!(parser.parse_line("and that was really the whole story.").is_none());
    }
}
