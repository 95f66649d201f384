//! Environment setup hands-on generation.

use serde::{Deserialize, Serialize};

use super::complete_and_parse;
use crate::llm::SharedLlmClient;
use crate::prompts;
use crate::schema::Schema;

const HANDSON: Schema = Schema::new(
    "environment_handson",
    &["overall", "devcontainer", "frontend", "backend"],
);

/// The four markdown sections of the environment hands-on.
///
/// Content branches by project category: web projects get real devcontainer
/// instructions, Android/iOS get a note that devcontainers are not used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentHandson {
    pub overall: String,
    pub devcontainer: String,
    pub frontend: String,
    pub backend: String,
}

pub struct EnvironmentService {
    client: SharedLlmClient,
    temperature: f64,
}

impl EnvironmentService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Generate the four-part environment setup guide.
    pub async fn generate(
        &self,
        specification: &str,
        directory: &str,
        framework: &str,
    ) -> EnvironmentHandson {
        let prompt = prompts::environment(specification, directory, framework);
        match complete_and_parse::<EnvironmentHandson>(
            &self.client,
            &prompt,
            self.temperature,
            &HANDSON,
        )
        .await
        {
            Ok(handson) => handson,
            Err(e) => {
                tracing::warn!("Environment hands-on generation failed: {}", e);
                let message = format!("Environment hands-on generation failed: {}", e);
                EnvironmentHandson {
                    overall: message.clone(),
                    devcontainer: message.clone(),
                    frontend: message.clone(),
                    backend: message,
                }
            }
        }
    }
}
