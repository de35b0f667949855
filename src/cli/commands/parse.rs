//! Parse command - show transcript structure without extracting.

use crate::cli::Output;
use crate::config::Settings;
use crate::transcript::{self, detect_format, find_pairs, infer_missing_ends, FormatTag};
use anyhow::Result;

/// Run the parse command.
pub fn run_parse(
    input: &str,
    json: bool,
    format_override: Option<&str>,
    pairs: bool,
    _settings: Settings,
) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input, e))?;

    let format: FormatTag = match format_override {
        Some(name) => name
            .parse()
            .map_err(|e: String| anyhow::anyhow!("Invalid format: {}", e))?,
        None => detect_format(&text),
    };

    let mut segments = transcript::parse(&text, format);
    infer_missing_ends(&mut segments);

    if json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    if pairs {
        let found = find_pairs(&segments);
        Output::header(&format!("Q&A Pairs ({})", found.len()));
        for pair in &found {
            println!("Q: {}", pair.question.format_display());
            println!("A: {}", pair.answer.format_display());
            println!();
        }
        return Ok(());
    }

    Output::header("Transcript Structure");
    Output::kv("Format", &format.to_string());
    Output::kv("Segments", &segments.len().to_string());
    Output::kv("Q&A pairs", &find_pairs(&segments).len().to_string());
    println!();

    for segment in &segments {
        println!("{}", segment.format_display());
    }

    Ok(())
}
