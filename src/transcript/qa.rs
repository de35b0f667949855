//! Question/answer pairing over parsed segments.
//!
//! Lightweight lexical heuristics only: a segment is question-like when it
//! ends with `?` or contains an interrogative cue; the following segment is
//! answer-like when it comes from a different speaker and carries more than a
//! token acknowledgment's worth of text.

use super::Segment;

/// Interrogative cues that mark a segment as question-like.
const INTERROGATIVE_CUES: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "which", "can you", "could you", "would you",
];

/// Minimum answer text length, in characters.
const MIN_ANSWER_LEN: usize = 10;

/// A matched question/answer pair of adjacent segments.
#[derive(Debug, Clone)]
pub struct QaPair<'a> {
    pub question: &'a Segment,
    pub answer: &'a Segment,
}

/// Scan adjacent segment pairs and emit those that read as question + answer.
///
/// Each index is considered independently: a segment that answers one
/// question may itself start the next pair if it qualifies. Pairs for chained
/// multi-turn exchanges are not deduplicated.
pub fn find_pairs(segments: &[Segment]) -> Vec<QaPair<'_>> {
    segments
        .windows(2)
        .filter_map(|window| {
            let (question, answer) = (&window[0], &window[1]);
            if is_question_like(question) && is_answer_like(question, answer) {
                Some(QaPair { question, answer })
            } else {
                None
            }
        })
        .collect()
}

fn is_question_like(segment: &Segment) -> bool {
    let text = segment.text.trim();
    if text.ends_with('?') {
        return true;
    }
    let lowered = text.to_lowercase();
    INTERROGATIVE_CUES.iter().any(|cue| lowered.contains(cue))
}

fn is_answer_like(question: &Segment, answer: &Segment) -> bool {
    question.speaker != answer.speaker && answer.text.trim().len() > MIN_ANSWER_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{parse, FormatTag};

    #[test]
    fn test_find_single_pair() {
        let transcript = "Speaker 1 (00:01:00): Hi Brian. What was your current solution?\n\
                          Speaker 2 (00:01:10): We had our own warehouse.";
        let segments = parse(transcript, FormatTag::NumberedFull);
        let pairs = find_pairs(&segments);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question.speaker.as_deref(), Some("Speaker 1"));
        assert_eq!(pairs[0].answer.text, "We had our own warehouse.");
    }

    #[test]
    fn test_question_mark_alone_qualifies() {
        let transcript = "Speaker 1 (00:01:00): And the pricing?\n\
                          Speaker 2 (00:01:10): It came in well under budget.";
        let segments = parse(transcript, FormatTag::NumberedFull);
        assert_eq!(find_pairs(&segments).len(), 1);
    }

    #[test]
    fn test_same_speaker_is_not_an_answer() {
        let transcript = "Speaker 1 (00:01:00): What did you think?\n\
                          Speaker 1 (00:01:10): Let me rephrase that question.";
        let segments = parse(transcript, FormatTag::NumberedFull);
        assert!(find_pairs(&segments).is_empty());
    }

    #[test]
    fn test_short_answer_rejected() {
        let transcript = "Speaker 1 (00:01:00): What did you think?\n\
                          Speaker 2 (00:01:10): Yeah.";
        let segments = parse(transcript, FormatTag::NumberedFull);
        assert!(find_pairs(&segments).is_empty());
    }

    #[test]
    fn test_chained_exchange_emits_each_pair() {
        let transcript = "Speaker 1 (00:01:00): What was the onboarding like?\n\
                          Speaker 2 (00:01:10): Honestly it took about how long we expected, two weeks.\n\
                          Speaker 1 (00:01:40): And would you do it again?\n\
                          Speaker 2 (00:01:50): Without hesitation, the team was great.";
        let segments = parse(transcript, FormatTag::NumberedFull);
        let pairs = find_pairs(&segments);

        // Segment 2 contains "how", so (2 -> 3) also qualifies as a pair.
        assert_eq!(pairs.len(), 3);
    }
}
