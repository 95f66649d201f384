//! Single-task hands-on generation.
//!
//! Free-text variant of detail generation for one task at a time, used when
//! a task's hands-on needs to be regenerated outside the batch pipeline.

use super::complete_text;
use crate::llm::SharedLlmClient;
use crate::prompts;

pub struct HandsOnService {
    client: SharedLlmClient,
    temperature: f64,
}

impl HandsOnService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Generate a hands-on guide for one task.
    pub async fn generate(
        &self,
        specification: &str,
        task_title: &str,
        priority: &str,
        task_spec: &str,
    ) -> String {
        let prompt = prompts::handson(specification, task_title, priority, task_spec);
        match complete_text(&self.client, &prompt, self.temperature).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!("Hands-on generation failed: {}", e);
                format!("Hands-on generation failed: {}", e)
            }
        }
    }
}
