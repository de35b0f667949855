//! Response export formatting (CSV, JSON).
//!
//! Provides utilities for exporting extracted responses in formats that feed
//! spreadsheets and downstream analysis tools.

use crate::extraction::ExtractedResponse;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv or json.", s)),
        }
    }
}

/// Column order for CSV export. Fixed so re-exports diff cleanly.
const CSV_COLUMNS: &[&str] = &[
    "response_id",
    "verbatim_response",
    "subject",
    "question",
    "deal_status",
    "company",
    "interviewee_name",
    "date_of_interview",
    "key_insight",
    "start_timestamp",
    "end_timestamp",
];

/// Format responses for output.
pub fn format_responses(responses: &[ExtractedResponse], format: OutputFormat) -> String {
    match format {
        OutputFormat::Csv => format_csv(responses),
        OutputFormat::Json => format_json(responses),
    }
}

/// Format as pretty JSON.
fn format_json(responses: &[ExtractedResponse]) -> String {
    serde_json::to_string_pretty(responses).unwrap_or_else(|_| "[]".to_string())
}

/// Format as CSV. Every field is quoted; quotes double per RFC 4180.
fn format_csv(responses: &[ExtractedResponse]) -> String {
    let mut output = String::new();
    output.push_str(&csv_row(CSV_COLUMNS.iter().copied()));

    for r in responses {
        output.push_str(&csv_row(
            [
                r.response_id.as_str(),
                r.verbatim_response.as_str(),
                r.subject.as_str(),
                r.question.as_str(),
                r.deal_status.as_str(),
                r.company.as_str(),
                r.interviewee_name.as_str(),
                r.date_of_interview.as_str(),
                r.key_insight.as_deref().unwrap_or(""),
                r.start_timestamp.as_deref().unwrap_or(""),
                r.end_timestamp.as_deref().unwrap_or(""),
            ]
            .into_iter(),
        ));
    }

    output
}

fn csv_row<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let mut row = fields
        .map(csv_quote)
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::InterviewContext;

    fn sample_responses() -> Vec<ExtractedResponse> {
        let context = InterviewContext::new("acme", "Acme Corp", "Brian", "won", "01/15/2024");
        vec![ExtractedResponse {
            response_id: "acme_corp_brian_0_acme_0".to_string(),
            verbatim_response: "We had our own warehouse, and it was \"a money pit\".".to_string(),
            subject: "Previous solution".to_string(),
            question: "What was your current solution?".to_string(),
            deal_status: context.deal_status,
            company: context.company,
            interviewee_name: context.interviewee_name,
            date_of_interview: context.date_of_interview,
            key_insight: None,
            start_timestamp: Some("00:01:00".to_string()),
            end_timestamp: Some("00:01:30".to_string()),
        }]
    }

    #[test]
    fn test_format_json() {
        let json = format_responses(&sample_responses(), OutputFormat::Json);
        assert!(json.contains("\"response_id\": \"acme_corp_brian_0_acme_0\""));
        assert!(json.contains("Acme Corp"));
    }

    #[test]
    fn test_format_csv_header_and_quoting() {
        let csv = format_responses(&sample_responses(), OutputFormat::Csv);
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("\"response_id\",\"verbatim_response\""));
        assert!(header.ends_with("\"start_timestamp\",\"end_timestamp\""));

        let row = lines.next().unwrap();
        // Embedded quotes are doubled, commas stay inside the quoted field.
        assert!(row.contains(r#""We had our own warehouse, and it was ""a money pit"".""#));
        assert!(row.contains("\"00:01:00\""));
    }

    #[test]
    fn test_empty_optional_fields_export_as_empty_strings() {
        let csv = format_responses(&sample_responses(), OutputFormat::Csv);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",\"\",\"00:01:00\""));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
