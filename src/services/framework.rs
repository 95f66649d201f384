//! Framework ranking over the fixed candidate sets.

use serde::{Deserialize, Serialize};

use super::complete_and_parse;
use crate::llm::SharedLlmClient;
use crate::prompts;
use crate::schema::Schema;
use crate::types::FrameworkProposal;

const FRAMEWORKS: Schema = Schema::new("frameworks", &["frontend", "backend"]);

/// Ranked frontend and backend candidates.
///
/// The candidate names are fixed enumerations stated in the prompt
/// (React/Vue/Next/Astro and Nest/Flask/FastAPI/Rails/Gin), not generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameworkRanking {
    pub frontend: Vec<FrameworkProposal>,
    pub backend: Vec<FrameworkProposal>,
}

pub struct FrameworkService {
    client: SharedLlmClient,
    temperature: f64,
}

impl FrameworkService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Rank the candidates against the specification.
    pub async fn generate(&self, specification: &str) -> FrameworkRanking {
        let prompt = prompts::framework(specification);
        match complete_and_parse::<FrameworkRanking>(
            &self.client,
            &prompt,
            self.temperature,
            &FRAMEWORKS,
        )
        .await
        {
            Ok(ranking) => ranking,
            Err(e) => {
                tracing::warn!("Framework ranking failed: {}", e);
                FrameworkRanking::default()
            }
        }
    }
}
