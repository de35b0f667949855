//! Prompt templates for Sitat.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub extraction: ExtractionPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for quote extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionPrompts {
    pub system: String,
    pub user: String,
}

impl Default for ExtractionPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a voice-of-customer analyst. You extract verbatim quotes from customer interview transcripts, together with the question each quote answers.

Rules:
1. Quotes must be VERBATIM - copy the interviewee's words exactly, do not paraphrase
2. Only extract substantive responses: opinions, experiences, reasons, outcomes
3. Skip greetings, small talk, scheduling chatter, and pure acknowledgments
4. Attribute each quote to the question it actually answers, even if the question came earlier in the exchange
5. If the chunk contains no substantive quotes, return an empty JSON array

Output a JSON array of objects. No prose before or after the JSON."#
                .to_string(),

            user: r#"Extract customer quotes from this interview chunk.

Company: {{company}}
Interviewee: {{interviewee_name}}
Deal status: {{deal_status}}
Interview date: {{date_of_interview}}

Chunk:
{{chunk}}

For each quote, provide:
- "verbatim_response": The interviewee's exact words
- "subject": A short topic label (2-6 words) for what the quote is about
- "question": The question this quote answers, as asked in the transcript
- "key_insight": One sentence stating what this quote tells us (optional)
- "start_timestamp": HH:MM:SS where the quote begins, if present in the chunk (optional)
- "end_timestamp": HH:MM:SS where the quote ends, if present in the chunk (optional)

Respond with a JSON array of objects. Example:
[
  {"verbatim_response": "We had our own warehouse and it was costing us a fortune.", "subject": "Previous fulfillment setup", "question": "What was your current solution before switching?", "key_insight": "Cost of self-run warehousing drove the evaluation.", "start_timestamp": "00:03:12", "end_timestamp": "00:03:40"}
]"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load extraction prompts if file exists
            let extraction_path = custom_path.join("extraction.toml");
            if extraction_path.exists() {
                let content = std::fs::read_to_string(&extraction_path)?;
                prompts.extraction = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
