//! Deploy-service recommendation.

use serde::Deserialize;

use super::complete_and_parse;
use super::summary::strip_markdown_fence;
use crate::llm::SharedLlmClient;
use crate::prompts;
use crate::schema::Schema;

const DEPLOY: Schema = Schema::new("deploy", &["deploy"]);

#[derive(Debug, Deserialize)]
struct DeployResponse {
    deploy: String,
}

pub struct DeployService {
    client: SharedLlmClient,
    temperature: f64,
}

impl DeployService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Recommend one deploy service as markdown (not a ranked list).
    pub async fn generate(&self, specification: &str, framework: &str) -> String {
        let prompt = prompts::deploy(specification, framework);
        match complete_and_parse::<DeployResponse>(&self.client, &prompt, self.temperature, &DEPLOY)
            .await
        {
            Ok(response) => strip_markdown_fence(&response.deploy),
            Err(e) => {
                tracing::warn!("Deploy recommendation failed: {}", e);
                format!("Deploy recommendation failed: {}", e)
            }
        }
    }
}
