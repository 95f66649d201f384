//! Task schedule generation (start/end day per task).

use serde::Deserialize;

use super::complete_and_parse;
use crate::llm::SharedLlmClient;
use crate::prompts;
use crate::schema::Schema;
use crate::types::{TaskDuration, TaskRef};

const DURATIONS: Schema = Schema::new("durations", &["durations"]);

#[derive(Debug, Deserialize)]
struct DurationsResponse {
    durations: Vec<TaskDuration>,
}

pub struct DurationService {
    client: SharedLlmClient,
    temperature: f64,
}

impl DurationService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Estimate each task's working span within `total_days`.
    ///
    /// Generated spans are clamped into `[1, total_days]` with
    /// `start <= end`; spans may overlap across tasks. On failure every task
    /// gets the documented fallback span of days 1-2.
    pub async fn generate(&self, total_days: u32, tasks: &[TaskRef]) -> Vec<TaskDuration> {
        let prompt = prompts::duration(total_days, tasks);
        match complete_and_parse::<DurationsResponse>(
            &self.client,
            &prompt,
            self.temperature,
            &DURATIONS,
        )
        .await
        {
            Ok(response) => response
                .durations
                .into_iter()
                .map(|d| clamp_span(d, total_days))
                .collect(),
            Err(e) => {
                tracing::warn!("Duration generation failed: {}", e);
                tasks
                    .iter()
                    .map(|t| TaskDuration {
                        task_id: t.task_id,
                        start: 1,
                        end: 2.min(total_days.max(1)),
                    })
                    .collect()
            }
        }
    }
}

/// Force a generated span into `[1, total_days]` with `start <= end`.
fn clamp_span(d: TaskDuration, total_days: u32) -> TaskDuration {
    let total = total_days.max(1);
    let start = d.start.clamp(1, total);
    let end = d.end.clamp(start, total);
    if (start, end) != (d.start, d.end) {
        tracing::warn!(
            "Clamped span for task {}: {}..{} -> {}..{}",
            d.task_id,
            d.start,
            d.end,
            start,
            end
        );
    }
    TaskDuration {
        task_id: d.task_id,
        start,
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionOptions, LlmClient, LlmError};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FailingClient;

    #[async_trait]
    impl LlmClient for FailingClient {
        async fn complete(
            &self,
            _prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            Err(LlmError::network("stub outage"))
        }
    }

    fn task_refs(n: usize) -> Vec<TaskRef> {
        (0..n)
            .map(|i| TaskRef {
                task_id: i,
                task_name: format!("task {}", i),
                content: String::new(),
            })
            .collect()
    }

    #[test]
    fn spans_are_clamped_into_range() {
        let d = clamp_span(
            TaskDuration {
                task_id: 0,
                start: 0,
                end: 99,
            },
            10,
        );
        assert_eq!((d.start, d.end), (1, 10));

        let d = clamp_span(
            TaskDuration {
                task_id: 1,
                start: 7,
                end: 3,
            },
            10,
        );
        assert!(d.start <= d.end);
    }

    #[tokio::test]
    async fn failing_gateway_yields_documented_fallback() {
        let service = DurationService::new(Arc::new(FailingClient), 0.5);
        let durations = service.generate(10, &task_refs(2)).await;
        assert_eq!(
            durations,
            vec![
                TaskDuration {
                    task_id: 0,
                    start: 1,
                    end: 2
                },
                TaskDuration {
                    task_id: 1,
                    start: 1,
                    end: 2
                },
            ]
        );
    }
}
