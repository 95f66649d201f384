//! Specification synthesis from answered questions.

use super::complete_text;
use crate::llm::SharedLlmClient;
use crate::prompts;
use crate::types::QuestionItem;

pub struct SummaryService {
    client: SharedLlmClient,
    temperature: f64,
}

impl SummaryService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Produce a markdown specification from the Q/A pairs.
    pub async fn generate(&self, answers: &[QuestionItem]) -> String {
        let prompt = prompts::summary(answers);
        match complete_text(&self.client, &prompt, self.temperature).await {
            Ok(text) => strip_markdown_fence(&text),
            Err(e) => {
                tracing::warn!("Summary generation failed: {}", e);
                format!("Specification generation failed: {}", e)
            }
        }
    }
}

/// The prompt forbids fences but models add them anyway now and then.
pub(crate) fn strip_markdown_fence(text: &str) -> String {
    text.trim()
        .trim_start_matches("```markdown")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
        .to_string()
}
