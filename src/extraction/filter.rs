//! Pre-extraction chunk filtering and cleaning.
//!
//! Chunks that are not real Q&A exchanges, or that boil down to pure
//! acknowledgments, are rejected before any LLM call is spent on them.

use crate::timestamp;
use regex::Regex;

/// Minimum chunk length (characters) for the Q&A filter.
const MIN_QA_CHUNK_LEN: usize = 40;

/// Minimum cleaned-text length (characters) to be worth extracting.
const MIN_VALUE_LEN: usize = 20;

/// Interrogative cues used by the Q&A filter.
const INTERROGATIVE_CUES: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "which", "can you", "could you", "would you",
];

/// Pure-acknowledgment phrases that carry no extractable content.
const ACKNOWLEDGMENTS: &[&str] = &[
    "yeah",
    "yes",
    "no",
    "ok",
    "okay",
    "sure",
    "right",
    "mhm",
    "uh-huh",
    "got it",
    "not sure",
    "that's it",
    "i don't know",
    "thanks",
    "thank you",
];

/// Timestamps carved out of a chunk during cleaning.
#[derive(Debug, Clone, Default)]
pub struct TimestampInfo {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Lightweight "is this a real Q&A exchange" check: long enough, and either
/// a question mark or an interrogative cue present.
///
/// Only meaningful for transcripts where Q&A markers were found; speaker-turn
/// transcripts cannot be judged by these cues and bypass the filter.
pub fn looks_like_qa(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.len() < MIN_QA_CHUNK_LEN {
        return false;
    }
    if trimmed.contains('?') {
        return true;
    }
    let lowered = trimmed.to_lowercase();
    INTERROGATIVE_CUES.iter().any(|cue| lowered.contains(cue))
}

/// Strip speaker/timestamp markup from a chunk, harvesting its timestamps.
///
/// Returns the cleaned text and the first/last timestamps seen, which the
/// orchestrator uses to backfill rows where the model supplies none.
pub fn clean_chunk(text: &str) -> (String, TimestampInfo) {
    let timestamp_pattern =
        Regex::new(r"[\[(](\d{1,2}:\d{2}(?::\d{2})?(?:\s*-\s*\d{1,2}:\d{2}(?::\d{2})?)?)[\])]")
            .expect("Invalid regex");
    // The colon is optional only after a timestamp-range paren group, since
    // the ranged layout has none. Any other paren group must be followed by
    // punctuation so a capitalized sentence with a parenthetical survives.
    let speaker_prefix = Regex::new(
        r"(?m)^\s*(?:Speaker \d+|Q|A|Question|Answer|Interviewer|Interviewee|Moderator|[A-Z][A-Za-z .'-]{0,40})\s*(?:\(\d{1,2}:\d{2}(?::\d{2})?\s*-\s*\d{1,2}:\d{2}(?::\d{2})?\)\s*:?|\([^)]*\)\s*[:.]|[:.])\s*",
    )
    .expect("Invalid regex");

    let mut seen: Vec<String> = Vec::new();
    for caps in timestamp_pattern.captures_iter(text) {
        // Ranged markers contribute both ends.
        for part in caps[1].split('-') {
            if let Some(canonical) = timestamp::normalize(part) {
                seen.push(canonical);
            }
        }
    }

    let info = TimestampInfo {
        start: seen.first().cloned(),
        end: if seen.len() > 1 { seen.last().cloned() } else { None },
    };

    let without_speakers = speaker_prefix.replace_all(text, "");
    let without_timestamps = timestamp_pattern.replace_all(&without_speakers, "");

    let cleaned = without_timestamps
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (cleaned, info)
}

/// True when cleaned text is too short or is a pure acknowledgment.
pub fn is_low_value(cleaned: &str) -> bool {
    let trimmed = cleaned.trim();
    if trimmed.len() < MIN_VALUE_LEN {
        return true;
    }

    let normalized: String = trimmed
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'' || *c == '-')
        .collect();
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

    ACKNOWLEDGMENTS.contains(&normalized.as_str())
}

/// Whitespace-delimited word count, for the cleaning quality grade.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_qa() {
        assert!(looks_like_qa(
            "Q: What was your current solution before you switched over to us?"
        ));
        assert!(!looks_like_qa("Too short?"));
        assert!(!looks_like_qa(
            "A statement about logistics and operations with no cue at all, just facts."
        ));
    }

    #[test]
    fn test_clean_chunk_strips_markup() {
        let text = "Speaker 1 (00:01:00): Hi Brian. What was your current solution?\n\
                    Speaker 2 (00:01:10): We had our own warehouse.";
        let (cleaned, info) = clean_chunk(text);

        assert!(!cleaned.contains("Speaker"));
        assert!(!cleaned.contains("00:01:00"));
        assert!(cleaned.contains("What was your current solution?"));
        assert!(cleaned.contains("We had our own warehouse."));
        assert_eq!(info.start.as_deref(), Some("00:01:00"));
        assert_eq!(info.end.as_deref(), Some("00:01:10"));
    }

    #[test]
    fn test_clean_chunk_single_timestamp_has_no_end() {
        let (_, info) = clean_chunk("Speaker 1 (00:01:00): Only one marker here.");
        assert_eq!(info.start.as_deref(), Some("00:01:00"));
        assert_eq!(info.end, None);
    }

    #[test]
    fn test_clean_chunk_ranged_timestamps() {
        let (cleaned, info) = clean_chunk("Adri (00:00:38 - 00:00:39) Nice to meet you.");
        assert_eq!(info.start.as_deref(), Some("00:00:38"));
        assert_eq!(info.end.as_deref(), Some("00:00:39"));
        assert_eq!(cleaned, "Nice to meet you.");
    }

    #[test]
    fn test_clean_chunk_keeps_plain_parenthetical() {
        let (cleaned, _) = clean_chunk("The (new) warehouse system worked well for us overall.");
        assert_eq!(
            cleaned,
            "The (new) warehouse system worked well for us overall."
        );
    }

    #[test]
    fn test_is_low_value() {
        assert!(is_low_value("yeah"));
        assert!(is_low_value("Not sure."));
        assert!(is_low_value("That's it"));
        assert!(is_low_value("short"));
        assert!(!is_low_value(
            "We had our own warehouse and it was costing us a fortune to run."
        ));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three"), 3);
        assert_eq!(word_count(""), 0);
    }
}
