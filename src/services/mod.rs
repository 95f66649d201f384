//! Generation services, one per use case.
//!
//! Every single-shot service is the same round trip: prompt builder ->
//! gateway -> repair & parse. None of them retries and none runs
//! concurrently with itself. They all follow one failure policy: catch
//! gateway and parse failures, log them, and return a typed fallback value
//! (empty list for list outputs, an error-message string for markdown
//! outputs) so the request boundary always serializes a well-formed
//! response.
//!
//! The exception is [`task_detail`], the batch orchestrator, which adds
//! batching, bounded concurrency, retry and per-task fallback on top of the
//! same building blocks.

pub mod chat;
pub mod deploy;
pub mod directory;
pub mod duration;
pub mod environment;
pub mod framework;
pub mod graph;
pub mod handson;
pub mod question;
pub mod summary;
pub mod task_detail;
pub mod tasks;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::llm::{CompletionOptions, LlmError, SharedLlmClient};
use crate::schema::{repair_and_parse, ParseError, Schema};

/// Failure of one generation round trip.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("gateway failure: {0}")]
    Gateway(#[from] LlmError),
    #[error("unusable response: {0}")]
    Parse(#[from] ParseError),
}

/// One complete round trip: gateway call, then schema-guided parse.
pub(crate) async fn complete_and_parse<T: DeserializeOwned>(
    client: &SharedLlmClient,
    prompt: &str,
    temperature: f64,
    schema: &Schema,
) -> Result<T, GenerationError> {
    let raw = client
        .complete(prompt, CompletionOptions::with_temperature(temperature))
        .await?;
    Ok(repair_and_parse(&raw, schema)?)
}

/// Plain-text round trip for the markdown-producing services.
pub(crate) async fn complete_text(
    client: &SharedLlmClient,
    prompt: &str,
    temperature: f64,
) -> Result<String, GenerationError> {
    let raw = client
        .complete(prompt, CompletionOptions::with_temperature(temperature))
        .await?;
    Ok(raw)
}

/// All generation services wired to their gateway clients.
///
/// Constructed once at startup with explicitly injected clients; the clients
/// themselves are stateless between calls.
pub struct Services {
    pub question: question::QuestionService,
    pub summary: summary::SummaryService,
    pub framework: framework::FrameworkService,
    pub directory: directory::DirectoryService,
    pub tasks: tasks::TasksService,
    pub task_detail: task_detail::DetailGenerator,
    pub graph: graph::GraphService,
    pub duration: duration::DurationService,
    pub environment: environment::EnvironmentService,
    pub deploy: deploy::DeployService,
    pub chat: chat::ChatService,
    pub handson: handson::HandsOnService,
}

impl Services {
    /// Wire every service to its model tier: long structured generations use
    /// the pro client, quick single-shot ones the flash client.
    pub fn new(pro: SharedLlmClient, flash: SharedLlmClient, config: &Config) -> Self {
        let t = config.temperature;
        Self {
            question: question::QuestionService::new(flash.clone(), t),
            summary: summary::SummaryService::new(pro.clone(), t),
            framework: framework::FrameworkService::new(flash.clone(), t),
            directory: directory::DirectoryService::new(pro.clone(), t),
            tasks: tasks::TasksService::new(pro.clone(), t),
            task_detail: task_detail::DetailGenerator::new(
                pro.clone(),
                config.detail.clone(),
                t,
            ),
            graph: graph::GraphService::new(pro.clone(), t),
            duration: duration::DurationService::new(pro.clone(), t),
            environment: environment::EnvironmentService::new(flash.clone(), t),
            deploy: deploy::DeployService::new(flash.clone(), t),
            chat: chat::ChatService::new(flash, t),
            handson: handson::HandsOnService::new(pro, t),
        }
    }
}
