//! LLM-backed quote extraction.
//!
//! A chunk of transcript goes in; zero or more [`ExtractedResponse`] rows
//! come out. The LLM call itself sits behind the [`QuoteExtractor`] trait so
//! the pipeline can be driven by the OpenAI implementation or a scripted
//! stand-in under test.

mod dedup;
mod filter;
mod openai;

pub use dedup::{dedup_responses, similarity, SIMILARITY_THRESHOLD};
pub use filter::{clean_chunk, is_low_value, looks_like_qa, word_count, TimestampInfo};
pub use openai::OpenAiExtractor;

use crate::error::{Result, SitatError};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Interview metadata attached to every extracted row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewContext {
    pub client_id: String,
    pub company: String,
    pub interviewee_name: String,
    /// One of `closed won`, `closed lost`, `no decision`.
    pub deal_status: String,
    /// `MM/DD/YYYY`.
    pub date_of_interview: String,
}

impl InterviewContext {
    /// Build a context, canonicalizing the deal status and date.
    pub fn new(
        client_id: &str,
        company: &str,
        interviewee_name: &str,
        deal_status: &str,
        date_of_interview: &str,
    ) -> Self {
        Self {
            client_id: client_id.trim().to_string(),
            company: company.trim().to_string(),
            interviewee_name: interviewee_name.trim().to_string(),
            deal_status: normalize_deal_status(deal_status),
            date_of_interview: normalize_interview_date(date_of_interview),
        }
    }

    /// Response-id seed for one chunk. Item indexes are suffixed onto this,
    /// which keeps ids unique within a processing run.
    pub fn response_id_seed(&self, chunk_index: usize) -> String {
        format!(
            "{}_{}_{}_{}",
            slugify(&self.company),
            slugify(&self.interviewee_name),
            chunk_index,
            slugify(&self.client_id),
        )
    }
}

/// Canonicalize a deal status to `closed won`, `closed lost`, or `no decision`.
pub fn normalize_deal_status(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.contains("won") {
        "closed won".to_string()
    } else if lowered.contains("lost") {
        "closed lost".to_string()
    } else {
        "no decision".to_string()
    }
}

/// Reformat an interview date to `MM/DD/YYYY`.
///
/// Accepts a handful of common input layouts; anything unrecognized is
/// passed through unchanged rather than dropped.
pub fn normalize_interview_date(raw: &str) -> String {
    let raw = raw.trim();
    let formats = ["%m/%d/%Y", "%Y-%m-%d", "%d %B %Y", "%B %d, %Y", "%m-%d-%Y"];
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.format("%m/%d/%Y").to_string();
        }
    }
    raw.to_string()
}

fn slugify(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// One extracted quote with metadata; the atomic output row of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedResponse {
    /// Unique within a run: seed + chunk index + in-chunk item index.
    pub response_id: String,
    pub verbatim_response: String,
    pub subject: String,
    pub question: String,
    pub deal_status: String,
    pub company: String,
    pub interviewee_name: String,
    pub date_of_interview: String,
    #[serde(default)]
    pub key_insight: Option<String>,
    #[serde(default)]
    pub start_timestamp: Option<String>,
    #[serde(default)]
    pub end_timestamp: Option<String>,
}

impl ExtractedResponse {
    /// Assemble a row from model-provided fields plus run metadata.
    /// Timestamps from `timestamps` are used only where the model left the
    /// field empty.
    pub fn from_fields(
        fields: ResponseFields,
        context: &InterviewContext,
        response_id: String,
        timestamps: &TimestampInfo,
    ) -> Self {
        Self {
            response_id,
            verbatim_response: fields.verbatim_response,
            subject: fields.subject,
            question: fields.question,
            deal_status: context.deal_status.clone(),
            company: context.company.clone(),
            interviewee_name: context.interviewee_name.clone(),
            date_of_interview: context.date_of_interview.clone(),
            key_insight: fields.key_insight,
            start_timestamp: fields.start_timestamp.or_else(|| timestamps.start.clone()),
            end_timestamp: fields.end_timestamp.or_else(|| timestamps.end.clone()),
        }
    }
}

/// The field set one extracted item carries in the model's JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFields {
    pub verbatim_response: String,
    pub subject: String,
    pub question: String,
    #[serde(default)]
    pub key_insight: Option<String>,
    #[serde(default)]
    pub start_timestamp: Option<String>,
    #[serde(default)]
    pub end_timestamp: Option<String>,
}

impl ResponseFields {
    /// A parsed object missing any required field is a hard validation
    /// failure for the whole parse attempt.
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("verbatim_response", &self.verbatim_response),
            ("subject", &self.subject),
            ("question", &self.question),
        ] {
            if value.trim().is_empty() {
                return Err(SitatError::Extraction(format!(
                    "Missing required field: {}",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Shape of one parsed LLM response: a single object or an array of objects.
#[derive(Debug, Clone)]
pub enum ParsedExtraction {
    Single(ResponseFields),
    Array(Vec<ResponseFields>),
}

impl ParsedExtraction {
    /// Flatten to a list of items in model order.
    pub fn into_items(self) -> Vec<ResponseFields> {
        match self {
            ParsedExtraction::Single(fields) => vec![fields],
            ParsedExtraction::Array(items) => items,
        }
    }
}

/// Parse an LLM response into validated extraction items.
///
/// The model sometimes wraps its JSON in prose or a markdown fence, so the
/// outermost `[..]` or `{..}` span is carved out before deserializing.
pub fn parse_extraction(response: &str) -> Result<ParsedExtraction> {
    let json_str = carve_json(response);

    let parsed = if json_str.trim_start().starts_with('[') {
        ParsedExtraction::Array(serde_json::from_str::<Vec<ResponseFields>>(json_str)?)
    } else {
        ParsedExtraction::Single(serde_json::from_str::<ResponseFields>(json_str)?)
    };

    match &parsed {
        ParsedExtraction::Single(fields) => fields.validate()?,
        ParsedExtraction::Array(items) => {
            for fields in items {
                fields.validate()?;
            }
        }
    }

    Ok(parsed)
}

/// Slice out the outermost JSON array or object from a response.
fn carve_json(response: &str) -> &str {
    let array_span = response
        .find('[')
        .zip(response.rfind(']'))
        .filter(|(start, end)| end > start);
    let object_span = response
        .find('{')
        .zip(response.rfind('}'))
        .filter(|(start, end)| end > start);

    // Prefer whichever opens first; an array of objects opens with '['.
    let span = match (array_span, object_span) {
        (Some(a), Some(o)) => Some(if a.0 < o.0 { a } else { o }),
        (Some(a), None) => Some(a),
        (None, Some(o)) => Some(o),
        (None, None) => None,
    };

    match span {
        Some((start, end)) => &response[start..=end],
        None => response,
    }
}

/// Trait for LLM extraction backends.
#[async_trait]
pub trait QuoteExtractor: Send + Sync {
    /// Run extraction over one cleaned chunk, returning the model's raw text
    /// response (expected to contain JSON).
    async fn extract(&self, chunk_text: &str, context: &InterviewContext) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> InterviewContext {
        InterviewContext::new("acme", "Acme Corp", "Brian", "Closed Won", "2024-01-15")
    }

    #[test]
    fn test_deal_status_normalization() {
        assert_eq!(normalize_deal_status("Closed Won"), "closed won");
        assert_eq!(normalize_deal_status("LOST"), "closed lost");
        assert_eq!(normalize_deal_status("still deciding"), "no decision");
        assert_eq!(normalize_deal_status(""), "no decision");
    }

    #[test]
    fn test_date_normalization() {
        assert_eq!(normalize_interview_date("2024-01-15"), "01/15/2024");
        assert_eq!(normalize_interview_date("01/15/2024"), "01/15/2024");
        assert_eq!(normalize_interview_date("January 15, 2024"), "01/15/2024");
        // Unrecognized input passes through.
        assert_eq!(normalize_interview_date("mid January"), "mid January");
    }

    #[test]
    fn test_response_id_seed() {
        let seed = context().response_id_seed(3);
        assert_eq!(seed, "acme_corp_brian_3_acme");
    }

    #[test]
    fn test_parse_single_object() {
        let response = r#"{"verbatim_response": "We had our own warehouse.",
                           "subject": "Previous solution", "question": "What was your current solution?"}"#;
        let items = parse_extraction(response).unwrap().into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].subject, "Previous solution");
    }

    #[test]
    fn test_parse_array_with_markdown_fence() {
        let response = r#"Here is the extraction:

```json
[
  {"verbatim_response": "A", "subject": "s1", "question": "q1"},
  {"verbatim_response": "B", "subject": "s2", "question": "q2", "key_insight": "ki"}
]
```"#;
        let items = parse_extraction(response).unwrap().into_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].key_insight.as_deref(), Some("ki"));
    }

    #[test]
    fn test_parse_missing_required_field_fails() {
        let response = r#"{"verbatim_response": "", "subject": "s", "question": "q"}"#;
        assert!(parse_extraction(response).is_err());

        let response = r#"[{"verbatim_response": "ok", "subject": "s", "question": "q"},
                           {"verbatim_response": "ok", "subject": "", "question": "q"}]"#;
        assert!(parse_extraction(response).is_err());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_extraction("I could not find any quotes.").is_err());
    }

    #[test]
    fn test_from_fields_backfills_timestamps_only_when_empty() {
        let timestamps = TimestampInfo {
            start: Some("00:01:00".to_string()),
            end: Some("00:02:00".to_string()),
        };

        let fields = ResponseFields {
            verbatim_response: "v".to_string(),
            subject: "s".to_string(),
            question: "q".to_string(),
            key_insight: None,
            start_timestamp: Some("00:05:00".to_string()),
            end_timestamp: None,
        };

        let row =
            ExtractedResponse::from_fields(fields, &context(), "id_0_0".to_string(), &timestamps);

        // Model-supplied start wins; missing end is backfilled.
        assert_eq!(row.start_timestamp.as_deref(), Some("00:05:00"));
        assert_eq!(row.end_timestamp.as_deref(), Some("00:02:00"));
        assert_eq!(row.deal_status, "closed won");
        assert_eq!(row.date_of_interview, "01/15/2024");
    }
}
