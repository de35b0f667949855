//! OpenAI-backed implementation of [`QuoteExtractor`].

use super::{InterviewContext, QuoteExtractor};
use crate::config::Prompts;
use crate::error::{Result, SitatError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Chat-completion extractor. One request per chunk.
pub struct OpenAiExtractor {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl OpenAiExtractor {
    pub fn new() -> Self {
        Self::with_model("gpt-4o-mini")
    }

    pub fn with_model(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn prompt_vars(chunk_text: &str, context: &InterviewContext) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("chunk".to_string(), chunk_text.to_string());
        vars.insert("company".to_string(), context.company.clone());
        vars.insert(
            "interviewee_name".to_string(),
            context.interviewee_name.clone(),
        );
        vars.insert("deal_status".to_string(), context.deal_status.clone());
        vars.insert(
            "date_of_interview".to_string(),
            context.date_of_interview.clone(),
        );
        vars
    }
}

impl Default for OpenAiExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteExtractor for OpenAiExtractor {
    async fn extract(&self, chunk_text: &str, context: &InterviewContext) -> Result<String> {
        let vars = Self::prompt_vars(chunk_text, context);
        let system_message = self
            .prompts
            .render_with_custom(&self.prompts.extraction.system, &vars);
        let user_message = self
            .prompts
            .render_with_custom(&self.prompts.extraction.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_message)
                .build()
                .map_err(|e| SitatError::Extraction(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| SitatError::Extraction(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.2)
            .build()
            .map_err(|e| SitatError::Extraction(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SitatError::OpenAI(format!("Extraction request failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SitatError::Extraction("Empty response from LLM".to_string()))?;

        debug!("Extraction response: {}", preview(content, 500));

        Ok(content.clone())
    }
}

/// Char-safe log preview; byte slicing can split a multi-byte character.
fn preview(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect()
}
