//! Segment parser and end-timestamp inference.

use super::format::{parser_for, FormatTag, LineParser};
use super::Segment;
use crate::timestamp;
use regex::Regex;
use tracing::debug;

/// Walks transcript lines with a format-specific line parser, emitting an
/// ordered sequence of [`Segment`] records.
pub struct SegmentParser {
    line_parser: Box<dyn LineParser>,
    inline_pattern: Regex,
}

impl SegmentParser {
    /// Create a parser for the given (detected or forced) format.
    pub fn new(format: FormatTag) -> Self {
        let inline_pattern =
            Regex::new(r"[\[(](\d{1,2}:\d{2}(?::\d{2})?)[\])]").expect("Invalid regex");
        Self {
            line_parser: parser_for(format),
            inline_pattern,
        }
    }

    /// Parse a transcript into segments.
    ///
    /// Blank lines are skipped. A line matching the format's speaker pattern
    /// finalizes the current segment and starts a new one; any other line is
    /// a continuation whose inline timestamps are harvested into the current
    /// segment's `raw_timestamps`.
    ///
    /// Text appearing before the first speaker line is collected into a
    /// speaker-less preamble segment rather than dropped, so transcripts that
    /// begin mid-utterance (or with a title block) keep their content.
    pub fn parse(&self, transcript: &str) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        let mut current: Option<Segment> = None;

        for line in transcript.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(parsed) = self.line_parser.parse_line(line) {
                if let Some(done) = current.take() {
                    segments.push(done);
                }

                let mut raw_timestamps = Vec::new();
                if let Some(start) = &parsed.start {
                    raw_timestamps.push(start.clone());
                }
                if let Some(end) = &parsed.end {
                    raw_timestamps.push(end.clone());
                }
                // The captured text can carry inline markers of its own.
                for caps in self.inline_pattern.captures_iter(&parsed.text) {
                    if let Some(canonical) = timestamp::normalize(&caps[1]) {
                        raw_timestamps.push(canonical);
                    }
                }

                current = Some(Segment {
                    text: parsed.text,
                    speaker: Some(parsed.speaker),
                    start_timestamp: parsed.start,
                    end_timestamp: parsed.end,
                    raw_timestamps,
                });
            } else {
                let segment = current.get_or_insert_with(Segment::default);
                for caps in self.inline_pattern.captures_iter(line) {
                    if let Some(canonical) = timestamp::normalize(&caps[1]) {
                        segment.raw_timestamps.push(canonical);
                    }
                }
                segment.append_text(line);
            }
        }

        if let Some(done) = current.take() {
            segments.push(done);
        }

        debug!("Parsed {} segments", segments.len());
        segments
    }
}

/// Parse a transcript with the given format hint.
pub fn parse(transcript: &str, format: FormatTag) -> Vec<Segment> {
    SegmentParser::new(format).parse(transcript)
}

/// Back-fill missing end timestamps, in place.
///
/// A segment without an end takes the start of the next segment that has one;
/// failing that, its own last raw timestamp. The final segment can only use
/// its own raw timestamps. Single left-to-right pass with lookahead, O(n).
pub fn infer_missing_ends(segments: &mut [Segment]) {
    for i in 0..segments.len() {
        if segments[i].end_timestamp.is_some() {
            continue;
        }

        let next_start = segments[i + 1..]
            .iter()
            .find_map(|s| s.start_timestamp.clone());

        segments[i].end_timestamp = match next_start {
            Some(start) => Some(start),
            None => segments[i].raw_timestamps.last().cloned(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::detect_format;

    #[test]
    fn test_parse_numbered_lines() {
        let transcript = "Speaker 1 (00:01:00): Hi Brian. What was your current solution?\n\
                          Speaker 2 (00:01:10): We had our own warehouse.";
        let segments = parse(transcript, detect_format(transcript));

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].speaker.as_deref(), Some("Speaker 1"));
        assert_eq!(segments[0].start_timestamp.as_deref(), Some("00:01:00"));
        assert_eq!(segments[1].text, "We had our own warehouse.");
    }

    #[test]
    fn test_parse_segment_coverage() {
        // N well-formed speaker lines, no continuations: exactly N segments.
        let transcript = (1..=5)
            .map(|i| format!("Speaker {} (00:0{}:00): Line number {}.", i, i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let segments = parse(&transcript, FormatTag::NumberedFull);

        assert_eq!(segments.len(), 5);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(
                segment.start_timestamp.as_deref(),
                Some(format!("00:0{}:00", i + 1).as_str())
            );
        }
    }

    #[test]
    fn test_parse_ranged() {
        let transcript = "Adri (00:00:38 - 00:00:39) Nice to meet you.";
        assert_eq!(detect_format(transcript), FormatTag::Ranged);

        let segments = parse(transcript, FormatTag::Ranged);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].speaker.as_deref(), Some("Adri"));
        assert_eq!(segments[0].start_timestamp.as_deref(), Some("00:00:38"));
        assert_eq!(segments[0].end_timestamp.as_deref(), Some("00:00:39"));
        assert_eq!(segments[0].text, "Nice to meet you.");
    }

    #[test]
    fn test_continuation_lines_append() {
        let transcript = "Speaker 1 (00:01:00): We started out\n\
                          with a single warehouse in Ohio\n\
                          and grew from there.";
        let segments = parse(transcript, FormatTag::NumberedFull);

        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0].text,
            "We started out with a single warehouse in Ohio and grew from there."
        );
    }

    #[test]
    fn test_inline_timestamps_harvested() {
        let transcript = "Speaker 1 (00:01:00): Let me walk you through it.\n\
                          First we looked at pricing [1:30] and then support [2:45].";
        let segments = parse(transcript, FormatTag::NumberedFull);

        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0].raw_timestamps,
            vec!["00:01:00", "00:01:30", "00:02:45"]
        );
    }

    #[test]
    fn test_inline_timestamp_on_speaker_line_harvested() {
        let transcript = "Speaker 1 (00:01:00): Wrapping up now [4:30] thanks everyone.";
        let segments = parse(transcript, FormatTag::NumberedFull);

        assert_eq!(segments[0].raw_timestamps, vec!["00:01:00", "00:04:30"]);
    }

    #[test]
    fn test_preamble_collected() {
        let transcript = "Interview with Acme Corp, recorded in March.\n\
                          Speaker 1 (00:01:00): Hi there.";
        let segments = parse(transcript, FormatTag::NumberedFull);

        assert_eq!(segments.len(), 2);
        assert!(segments[0].speaker.is_none());
        assert!(segments[0].text.contains("Acme Corp"));
        assert_eq!(segments[1].speaker.as_deref(), Some("Speaker 1"));
    }

    #[test]
    fn test_unstructured_text_yields_single_preamble() {
        let transcript = "Just some prose.\nNo speakers anywhere.";
        let segments = parse(transcript, FormatTag::Unknown);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].speaker.is_none());
    }

    #[test]
    fn test_infer_missing_ends_from_next_start() {
        let transcript = "Speaker 1 (00:01:00): First.\n\
                          Speaker 2 (00:02:00): Second.\n\
                          Speaker 1 (00:03:00): Third.";
        let mut segments = parse(transcript, FormatTag::NumberedFull);
        infer_missing_ends(&mut segments);

        assert_eq!(segments[0].end_timestamp.as_deref(), Some("00:02:00"));
        assert_eq!(segments[1].end_timestamp.as_deref(), Some("00:03:00"));
        // Last segment only has its own start in raw_timestamps.
        assert_eq!(segments[2].end_timestamp.as_deref(), Some("00:03:00"));
    }

    #[test]
    fn test_infer_missing_ends_uses_inline_fallback() {
        let transcript = "Speaker 1 (00:01:00): Wrapping up now [4:30] thanks everyone.";
        let mut segments = parse(transcript, FormatTag::NumberedFull);
        infer_missing_ends(&mut segments);

        assert_eq!(segments[0].end_timestamp.as_deref(), Some("00:04:30"));
    }

    #[test]
    fn test_infer_keeps_explicit_ends() {
        let transcript = "Adri (00:00:38 - 00:00:39) Nice to meet you.\n\
                          Bo (00:00:50 - 00:00:55) Likewise.";
        let mut segments = parse(transcript, FormatTag::Ranged);
        infer_missing_ends(&mut segments);

        assert_eq!(segments[0].end_timestamp.as_deref(), Some("00:00:39"));
    }
}
