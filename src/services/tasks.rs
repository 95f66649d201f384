//! Flat task-list generation.

use serde::Deserialize;

use super::complete_and_parse;
use crate::llm::SharedLlmClient;
use crate::prompts;
use crate::schema::Schema;
use crate::types::Task;

const TASKS: Schema = Schema::new("tasks", &["tasks"]);

#[derive(Debug, Deserialize)]
struct TasksResponse {
    tasks: Vec<Task>,
}

pub struct TasksService {
    client: SharedLlmClient,
    temperature: f64,
}

impl TasksService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Generate the full task breakdown for the project.
    ///
    /// Environment-setup tasks are excluded by instruction; they are covered
    /// by the environment hands-on instead.
    pub async fn generate(&self, specification: &str, directory: &str, framework: &str) -> Vec<Task> {
        let prompt = prompts::tasks(specification, directory, framework);
        match complete_and_parse::<TasksResponse>(&self.client, &prompt, self.temperature, &TASKS)
            .await
        {
            Ok(response) => response.tasks,
            Err(e) => {
                tracing::warn!("Task list generation failed: {}", e);
                Vec::new()
            }
        }
    }
}
