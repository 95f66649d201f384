//! Directory-layout generation.

use super::complete_text;
use crate::llm::SharedLlmClient;
use crate::prompts;

pub struct DirectoryService {
    client: SharedLlmClient,
    temperature: f64,
}

impl DirectoryService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Generate the project directory layout as code-block text.
    ///
    /// The layout convention (web / Android / iOS) branches inside the
    /// prompt on the framework category.
    pub async fn generate(&self, specification: &str, framework: &str) -> String {
        let prompt = prompts::directory(specification, framework);
        match complete_text(&self.client, &prompt, self.temperature).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!("Directory generation failed: {}", e);
                format!("Directory generation failed: {}", e)
            }
        }
    }
}
