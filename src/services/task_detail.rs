//! Batch task-detail orchestrator.
//!
//! Fans the task list out into fixed-size batches, runs the batches
//! concurrently against the gateway under a worker cap, repairs and parses
//! each response, retries failed batches with a fixed backoff, and merges
//! the results back into input order. A batch that exhausts its retry
//! budget degrades to per-task fallback entries; nothing escapes
//! [`DetailGenerator::generate_details`] as an error.
//!
//! Batching bounds the blast radius of one bad response and keeps each
//! prompt small enough for reliable generation; the worker cap exists
//! because the provider rate-limits, and uncapped concurrency turns one
//! slow request into cascading failures. Callers index tasks positionally,
//! so the output-order invariant is correctness, not cosmetics.

use serde::Deserialize;
use std::cmp;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::DetailSettings;
use crate::llm::{CompletionOptions, SharedLlmClient};
use crate::prompts;
use crate::schema::{repair_and_parse, Schema};
use crate::types::{DetailStatus, Task, TaskDetail};

const DETAILS: Schema = Schema::new("task_details", &["tasks"]);

/// Model response for one batch. Only the generated `detail` is taken from
/// it; name, priority and content always come from the input tasks.
#[derive(Debug, Deserialize)]
struct DetailResponse {
    tasks: Vec<DetailItem>,
}

#[derive(Debug, Deserialize)]
struct DetailItem {
    #[serde(default)]
    detail: String,
}

pub struct DetailGenerator {
    client: SharedLlmClient,
    settings: DetailSettings,
    temperature: f64,
}

impl DetailGenerator {
    pub fn new(client: SharedLlmClient, settings: DetailSettings, temperature: f64) -> Self {
        Self {
            client,
            settings,
            temperature,
        }
    }

    /// Generate a hands-on detail for every task.
    ///
    /// The returned vector always has the same length and order as `tasks`;
    /// entries whose batch ultimately failed carry `status: failed` and a
    /// failure message in `detail`, with the original fields unchanged.
    pub async fn generate_details(&self, tasks: &[Task], specification: &str) -> Vec<TaskDetail> {
        if tasks.is_empty() {
            return Vec::new();
        }

        let batch_size = self.settings.batch_size.max(1);
        let batches: Vec<Vec<Task>> = tasks.chunks(batch_size).map(<[Task]>::to_vec).collect();
        let workers = cmp::min(self.settings.max_workers.max(1), batches.len());
        let semaphore = Arc::new(Semaphore::new(workers));
        let specification: Arc<str> = Arc::from(specification);

        tracing::info!(
            "Generating details for {} tasks in {} batches ({} workers)",
            tasks.len(),
            batches.len(),
            workers
        );

        let mut join_set = JoinSet::new();
        for (index, batch) in batches.iter().enumerate() {
            let client = Arc::clone(&self.client);
            let settings = self.settings.clone();
            let temperature = self.temperature;
            let semaphore = Arc::clone(&semaphore);
            let specification = Arc::clone(&specification);
            let batch = batch.clone();
            join_set.spawn(async move {
                // The semaphore is never closed while workers exist; if it
                // somehow is, run unthrottled rather than fail the batch.
                let _permit = semaphore.acquire_owned().await.ok();
                let details =
                    generate_batch(&client, &settings, temperature, &specification, &batch).await;
                (index, details)
            });
        }

        // Merge by batch index, not completion order.
        let mut slots: Vec<Option<Vec<TaskDetail>>> = vec![None; batches.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, details)) => slots[index] = Some(details),
                // A panicked worker leaves its slot empty; it is filled with
                // the fallback below so the length invariant still holds.
                Err(e) => tracing::error!("Batch worker aborted: {}", e),
            }
        }

        batches
            .iter()
            .zip(slots)
            .flat_map(|(batch, slot)| {
                slot.unwrap_or_else(|| {
                    batch
                        .iter()
                        .map(|task| TaskDetail {
                            task_name: task.task_name.clone(),
                            priority: task.priority,
                            content: task.content.clone(),
                            detail: "Detail generation aborted: batch worker failed unexpectedly"
                                .to_string(),
                            status: DetailStatus::Failed,
                        })
                        .collect()
                })
            })
            .collect()
    }
}

/// Run one batch through prompt -> gateway -> repair & parse with bounded
/// retry. Never returns fewer or more entries than `batch`, and never errors.
///
/// Unusable responses (parse failures, wrong task count) are retried like
/// transient gateway errors. Non-retryable gateway errors (bad request, bad
/// key) stop the loop immediately, and a provider-suggested Retry-After
/// pause extends the fixed backoff when it is longer.
async fn generate_batch(
    client: &SharedLlmClient,
    settings: &DetailSettings,
    temperature: f64,
    specification: &str,
    batch: &[Task],
) -> Vec<TaskDetail> {
    let prompt = prompts::task_detail(specification, batch);
    let mut last_error = String::from("no attempts made");
    let mut attempts = 0;

    while attempts < settings.max_attempts {
        attempts += 1;
        let mut backoff = settings.retry_backoff;
        match client
            .complete(&prompt, CompletionOptions::with_temperature(temperature))
            .await
        {
            Ok(raw) => match repair_and_parse::<DetailResponse>(&raw, &DETAILS) {
                Ok(response) if response.tasks.len() == batch.len() => {
                    return batch
                        .iter()
                        .zip(response.tasks)
                        .map(|(task, item)| TaskDetail::generated(task, item.detail))
                        .collect();
                }
                Ok(response) => {
                    last_error = format!(
                        "model returned {} tasks for a batch of {}",
                        response.tasks.len(),
                        batch.len()
                    );
                }
                Err(e) => last_error = e.to_string(),
            },
            Err(e) => {
                last_error = e.to_string();
                if let Some(wait) = e.retry_after {
                    backoff = backoff.max(wait);
                }
                if !e.is_retryable() {
                    break;
                }
            }
        }

        if attempts < settings.max_attempts {
            tracing::warn!(
                "Detail batch attempt {}/{} failed ({}), retrying in {:?}",
                attempts,
                settings.max_attempts,
                last_error,
                backoff
            );
            tokio::time::sleep(backoff).await;
        }
    }

    tracing::error!(
        "Detail batch failed after {} attempts: {}",
        attempts,
        last_error
    );
    batch
        .iter()
        .map(|task| TaskDetail::failed(task, &last_error, attempts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmClient, LlmError};
    use crate::types::Priority;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::time::Duration;

    fn make_tasks(names: &[&str]) -> Vec<Task> {
        names
            .iter()
            .map(|name| Task {
                task_name: (*name).to_string(),
                priority: Priority::Must,
                content: format!("do {}", name),
            })
            .collect()
    }

    fn fast_settings(batch_size: usize, max_workers: usize, max_attempts: u32) -> DetailSettings {
        DetailSettings {
            batch_size,
            max_workers,
            max_attempts,
            retry_backoff: Duration::from_millis(1),
        }
    }

    /// Recover the batch tasks embedded in the prompt so stubs can answer
    /// per-task, like the real model does.
    fn tasks_from_prompt(prompt: &str) -> Vec<Task> {
        let start = prompt
            .find("Input task list:\n")
            .map(|i| i + "Input task list:\n".len())
            .expect("prompt carries the task list");
        let end = prompt[start..]
            .find("\nReturn every input task")
            .map(|i| start + i)
            .expect("prompt carries the closing instruction");
        serde_json::from_str(&prompt[start..end]).expect("embedded task list is valid JSON")
    }

    fn ok_response(batch: &[Task]) -> String {
        let tasks: Vec<serde_json::Value> = batch
            .iter()
            .map(|t| {
                serde_json::json!({
                    "task_name": t.task_name,
                    "priority": t.priority,
                    "content": t.content,
                    "detail": format!("OK-{}", t.task_name),
                })
            })
            .collect();
        serde_json::json!({ "tasks": tasks }).to_string()
    }

    /// Deterministic stub echoing `OK-<task_name>` per task, with an
    /// artificial delay that makes later batches finish first.
    struct EchoClient {
        calls: AtomicU32,
    }

    impl EchoClient {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn complete(
            &self,
            prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            // Earlier calls sleep longer, reversing completion order.
            tokio::time::sleep(Duration::from_millis(30u64.saturating_sub(call as u64 * 10))).await;
            Ok(ok_response(&tasks_from_prompt(prompt)))
        }
    }

    struct AlwaysFailClient {
        calls: AtomicU32,
    }

    #[async_trait]
    impl LlmClient for AlwaysFailClient {
        async fn complete(
            &self,
            _prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::server_error(503, "stub outage"))
        }
    }

    /// Fails the first `failures` calls, then echoes success.
    struct FlakyClient {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LlmClient for FlakyClient {
        async fn complete(
            &self,
            prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(LlmError::rate_limited("slow down", None));
            }
            Ok(ok_response(&tasks_from_prompt(prompt)))
        }
    }

    /// Tracks how many calls are in flight simultaneously.
    struct TrackingClient {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl TrackingClient {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for TrackingClient {
        async fn complete(
            &self,
            prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(25)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(ok_response(&tasks_from_prompt(prompt)))
        }
    }

    #[tokio::test]
    async fn five_tasks_make_three_batches_in_input_order() {
        let client = Arc::new(EchoClient::new());
        let generator = DetailGenerator::new(client.clone(), fast_settings(2, 2, 3), 0.5);
        let tasks = make_tasks(&["T0", "T1", "T2", "T3", "T5"]);

        let details = generator.generate_details(&tasks, "spec").await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
        assert_eq!(details.len(), 5);
        for (task, detail) in tasks.iter().zip(&details) {
            assert_eq!(detail.task_name, task.task_name);
            assert_eq!(detail.detail, format!("OK-{}", task.task_name));
            assert_eq!(detail.status, DetailStatus::Ok);
        }
    }

    #[tokio::test]
    async fn always_failing_gateway_degrades_every_task() {
        let client = Arc::new(AlwaysFailClient {
            calls: AtomicU32::new(0),
        });
        let generator = DetailGenerator::new(client.clone(), fast_settings(2, 2, 3), 0.5);
        let tasks = make_tasks(&["a", "b", "c"]);

        let details = generator.generate_details(&tasks, "spec").await;

        assert_eq!(details.len(), tasks.len());
        for (task, detail) in tasks.iter().zip(&details) {
            assert_eq!(detail.task_name, task.task_name);
            assert_eq!(detail.priority, task.priority);
            assert_eq!(detail.content, task.content);
            assert_eq!(detail.status, DetailStatus::Failed);
            assert!(!detail.detail.is_empty());
            assert!(detail.detail.contains("stub outage"));
        }
        // Two batches, three attempts each.
        assert_eq!(client.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_within_budget() {
        let client = Arc::new(FlakyClient {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let generator = DetailGenerator::new(client.clone(), fast_settings(4, 1, 3), 0.5);
        let tasks = make_tasks(&["a", "b"]);

        let details = generator.generate_details(&tasks, "spec").await;

        assert!(details.iter().all(|d| d.status == DetailStatus::Ok));
        assert!(client.calls.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_stop_the_retry_loop() {
        struct BadKeyClient {
            calls: AtomicU32,
        }

        #[async_trait]
        impl LlmClient for BadKeyClient {
            async fn complete(
                &self,
                _prompt: &str,
                _options: CompletionOptions,
            ) -> Result<String, LlmError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(LlmError::client_error(400, "API key not valid"))
            }
        }

        let client = Arc::new(BadKeyClient {
            calls: AtomicU32::new(0),
        });
        let generator = DetailGenerator::new(client.clone(), fast_settings(2, 1, 3), 0.5);
        let tasks = make_tasks(&["a", "b"]);

        let details = generator.generate_details(&tasks, "spec").await;

        // A bad request will not get better; one attempt, no retries.
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(details.len(), 2);
        assert!(details.iter().all(|d| d.status == DetailStatus::Failed));
        assert!(details[0].detail.contains("API key not valid"));
    }

    #[tokio::test]
    async fn rate_limit_pause_extends_the_backoff() {
        struct RateLimitedOnceClient {
            calls: AtomicU32,
        }

        #[async_trait]
        impl LlmClient for RateLimitedOnceClient {
            async fn complete(
                &self,
                prompt: &str,
                _options: CompletionOptions,
            ) -> Result<String, LlmError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(LlmError::rate_limited(
                        "quota",
                        Some(Duration::from_millis(40)),
                    ));
                }
                Ok(ok_response(&tasks_from_prompt(prompt)))
            }
        }

        let client = Arc::new(RateLimitedOnceClient {
            calls: AtomicU32::new(0),
        });
        // Configured backoff of 1 ms; the provider asks for 40 ms.
        let generator = DetailGenerator::new(client, fast_settings(2, 1, 3), 0.5);
        let tasks = make_tasks(&["a"]);

        let started = std::time::Instant::now();
        let details = generator.generate_details(&tasks, "spec").await;

        assert!(details.iter().all(|d| d.status == DetailStatus::Ok));
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn malformed_then_valid_response_is_retried() {
        struct MalformedOnceClient {
            calls: AtomicU32,
        }

        #[async_trait]
        impl LlmClient for MalformedOnceClient {
            async fn complete(
                &self,
                prompt: &str,
                _options: CompletionOptions,
            ) -> Result<String, LlmError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    // Repairable syntax, wrong shape: no "tasks" key.
                    return Ok("{\"wrong\": []}".to_string());
                }
                Ok(ok_response(&tasks_from_prompt(prompt)))
            }
        }

        let client = Arc::new(MalformedOnceClient {
            calls: AtomicU32::new(0),
        });
        let generator = DetailGenerator::new(client, fast_settings(4, 1, 3), 0.5);
        let tasks = make_tasks(&["a"]);

        let details = generator.generate_details(&tasks, "spec").await;
        assert_eq!(details[0].status, DetailStatus::Ok);
    }

    #[tokio::test]
    async fn worker_cap_bounds_in_flight_calls() {
        let client = Arc::new(TrackingClient::new());
        let generator = DetailGenerator::new(client.clone(), fast_settings(1, 2, 1), 0.5);
        let tasks = make_tasks(&["a", "b", "c", "d", "e", "f", "g", "h"]);

        let details = generator.generate_details(&tasks, "spec").await;

        assert_eq!(details.len(), 8);
        assert!(client.max_in_flight.load(Ordering::SeqCst) <= 2);
        // The cap throttles but does not serialize below the cap forever.
        assert!(client.max_in_flight.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn empty_input_makes_no_gateway_calls() {
        let client = Arc::new(EchoClient::new());
        let generator = DetailGenerator::new(client.clone(), fast_settings(3, 5, 3), 0.5);

        let details = generator.generate_details(&[], "spec").await;

        assert!(details.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn batch_length_mismatch_counts_as_failure() {
        struct ShortClient;

        #[async_trait]
        impl LlmClient for ShortClient {
            async fn complete(
                &self,
                _prompt: &str,
                _options: CompletionOptions,
            ) -> Result<String, LlmError> {
                // One entry for a two-task batch, every time.
                Ok(r#"{"tasks": [{"detail": "only one"}]}"#.to_string())
            }
        }

        let generator = DetailGenerator::new(Arc::new(ShortClient), fast_settings(2, 1, 2), 0.5);
        let tasks = make_tasks(&["a", "b"]);

        let details = generator.generate_details(&tasks, "spec").await;

        assert_eq!(details.len(), 2);
        assert!(details.iter().all(|d| d.status == DetailStatus::Failed));
        assert!(details[0].detail.contains("batch of 2"));
    }
}
