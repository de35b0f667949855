//! Near-duplicate suppression across extracted rows.
//!
//! Overlapping chunks can hand the model the same quote twice. Rows are
//! compared pairwise on normalized edit distance; the first occurrence wins.

use super::ExtractedResponse;
use strsim::normalized_levenshtein;
use tracing::debug;

/// Similarity at or above this marks two rows as duplicates.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Verbatim comparisons are limited to this many leading characters, so one
/// long row does not drown out a shorter duplicate of its opening.
const VERBATIM_PREFIX_CHARS: usize = 200;

/// Normalized similarity in `[0, 1]`, case-insensitive.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.trim().to_lowercase(), &b.trim().to_lowercase())
}

/// Drop rows that duplicate an earlier row, preserving order.
///
/// Two rows are duplicates when their key insights are close, or when the
/// leading stretches of their verbatim text are close.
pub fn dedup_responses(responses: Vec<ExtractedResponse>) -> Vec<ExtractedResponse> {
    let mut kept: Vec<ExtractedResponse> = Vec::with_capacity(responses.len());

    for candidate in responses {
        let duplicate_of = kept.iter().find(|existing| is_duplicate(existing, &candidate));
        match duplicate_of {
            Some(existing) => {
                debug!(
                    kept = %existing.response_id,
                    dropped = %candidate.response_id,
                    "Dropping near-duplicate response"
                );
            }
            None => kept.push(candidate),
        }
    }

    kept
}

fn is_duplicate(a: &ExtractedResponse, b: &ExtractedResponse) -> bool {
    if let (Some(insight_a), Some(insight_b)) = (&a.key_insight, &b.key_insight) {
        if similarity(insight_a, insight_b) >= SIMILARITY_THRESHOLD {
            return true;
        }
    }

    let prefix_a = char_prefix(&a.verbatim_response, VERBATIM_PREFIX_CHARS);
    let prefix_b = char_prefix(&b.verbatim_response, VERBATIM_PREFIX_CHARS);
    similarity(prefix_a, prefix_b) >= SIMILARITY_THRESHOLD
}

fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::InterviewContext;

    fn row(id: &str, verbatim: &str, insight: Option<&str>) -> ExtractedResponse {
        let context = InterviewContext::new("acme", "Acme Corp", "Brian", "won", "01/15/2024");
        ExtractedResponse {
            response_id: id.to_string(),
            verbatim_response: verbatim.to_string(),
            subject: "subject".to_string(),
            question: "question".to_string(),
            deal_status: context.deal_status,
            company: context.company,
            interviewee_name: context.interviewee_name,
            date_of_interview: context.date_of_interview,
            key_insight: insight.map(str::to_string),
            start_timestamp: None,
            end_timestamp: None,
        }
    }

    #[test]
    fn test_similarity_bounds() {
        assert!((similarity("same text", "same text") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("warehouse costs", "renewal pricing") < 0.5);
        // Case-insensitive.
        assert!((similarity("Same Text", "same text") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let rows = vec![
            row("a", "We had our own warehouse and it was expensive.", None),
            row("b", "We had our own warehouse and it was expensive.", None),
        ];
        let kept = dedup_responses(rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].response_id, "a");
    }

    #[test]
    fn test_near_duplicate_verbatim_collapses() {
        let rows = vec![
            row("a", "We had our own warehouse, and it was expensive to run.", None),
            row("b", "We had our own warehouse and it was expensive to run", None),
        ];
        assert_eq!(dedup_responses(rows).len(), 1);
    }

    #[test]
    fn test_insight_match_collapses_distinct_verbatim() {
        let rows = vec![
            row(
                "a",
                "Honestly the biggest thing was the cost of running our own warehouse every month.",
                Some("Warehouse costs drove the switch"),
            ),
            row(
                "b",
                "It came down to money. Running the warehouse ourselves just cost too much.",
                Some("Warehouse costs drove the switch."),
            ),
        ];
        assert_eq!(dedup_responses(rows).len(), 1);
    }

    #[test]
    fn test_distinct_rows_survive() {
        let rows = vec![
            row("a", "We had our own warehouse and it was expensive.", Some("Cost")),
            row("b", "Support response times were fantastic from day one.", Some("Support quality")),
        ];
        assert_eq!(dedup_responses(rows).len(), 2);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let rows = vec![
            row("a", "We had our own warehouse and it was expensive.", None),
            row("b", "We had our own warehouse and it was expensive!", None),
            row("c", "Support response times were fantastic from day one.", None),
        ];
        let once = dedup_responses(rows);
        let twice = dedup_responses(once.clone());
        assert_eq!(once.len(), twice.len());
    }
}
