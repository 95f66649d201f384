//! # hackplan
//!
//! A backend that turns a hackathon participant's raw idea into a structured
//! project plan by orchestrating calls to a hosted LLM provider.
//!
//! This library provides:
//! - An HTTP API with one route per generation step (questions, specification
//!   summary, framework ranking, directory layout, tasks, dependency graph,
//!   schedule, environment hands-on, deploy recommendation, project chat)
//! - A batch task-detail orchestrator with bounded concurrency, JSON repair,
//!   retry-with-backoff and per-task fallback
//! - A flat SQLite-backed project store
//!
//! ## Generation flow
//! 1. Receive structured input at the request boundary
//! 2. Build a prompt from the caller-supplied context
//! 3. Call the text-completion gateway
//! 4. Repair and strict-parse the response against a declared schema
//! 5. Return a typed result (or the service's fallback value)
//!
//! ## Modules
//! - `services`: one generation service per use case; `services::task_detail`
//!   is the concurrent batch orchestrator
//! - `llm`: gateway trait and the Gemini client implementation
//! - `repair` / `schema`: JSON repair heuristics and schema-guided parsing
//! - `store`: project persistence

pub mod api;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod repair;
pub mod schema;
pub mod services;
pub mod store;
pub mod types;

pub use config::Config;
