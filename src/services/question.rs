//! Clarifying-question generation from the raw idea.

use serde::Deserialize;

use super::complete_and_parse;
use crate::llm::SharedLlmClient;
use crate::prompts;
use crate::schema::Schema;
use crate::types::QuestionItem;

const QUESTIONS: Schema = Schema::new("questions", &["questions"]);

#[derive(Debug, Deserialize)]
struct QuestionResponse {
    questions: Vec<QuestionItem>,
}

pub struct QuestionService {
    client: SharedLlmClient,
    temperature: f64,
}

impl QuestionService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Generate clarifying questions with example answers.
    ///
    /// The question count (3-5 for specific ideas, more for abstract ones)
    /// is delegated to the model, not enforced here.
    pub async fn generate(&self, idea: &str, duration: &str, num_people: u32) -> Vec<QuestionItem> {
        let prompt = prompts::question(idea, duration, num_people);
        match complete_and_parse::<QuestionResponse>(
            &self.client,
            &prompt,
            self.temperature,
            &QUESTIONS,
        )
        .await
        {
            Ok(response) => response.questions,
            Err(e) => {
                tracing::warn!("Question generation failed: {}", e);
                Vec::new()
            }
        }
    }
}
