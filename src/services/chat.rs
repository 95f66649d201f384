//! Project-scoped chat assistant.

use super::complete_text;
use crate::llm::SharedLlmClient;
use crate::prompts;

/// Everything the chat reply is grounded in; all supplied by the caller,
/// there is no server-side conversation memory.
#[derive(Debug, Clone)]
pub struct ChatContext<'a> {
    pub specification: &'a str,
    pub directory_structure: &'a str,
    pub chat_history: &'a str,
    pub user_question: &'a str,
    pub framework: &'a str,
    pub task_detail: &'a str,
}

pub struct ChatService {
    client: SharedLlmClient,
    temperature: f64,
}

impl ChatService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Answer one chat turn as markdown text.
    pub async fn generate(&self, context: ChatContext<'_>) -> String {
        let prompt = prompts::chat(
            context.specification,
            context.directory_structure,
            context.chat_history,
            context.user_question,
            context.framework,
            context.task_detail,
        );
        match complete_text(&self.client, &prompt, self.temperature).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!("Chat reply generation failed: {}", e);
                format!("Sorry, I could not generate a reply: {}", e)
            }
        }
    }
}
