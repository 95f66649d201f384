//! Request and response shapes for the generation endpoints.

use serde::{Deserialize, Serialize};

use crate::services::environment::EnvironmentHandson;
use crate::services::framework::FrameworkRanking;
use crate::types::{QuestionItem, Task, TaskDependencyEdge, TaskDetail, TaskDuration, TaskRef};

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub idea: String,
    pub duration: String,
    pub num_people: u32,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub questions: Vec<QuestionItem>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub answers: Vec<QuestionItem>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct FrameworkRequest {
    pub specification: String,
}

pub type FrameworkResponse = FrameworkRanking;

#[derive(Debug, Deserialize)]
pub struct DirectoryRequest {
    pub specification: String,
    pub framework: String,
}

#[derive(Debug, Serialize)]
pub struct DirectoryResponse {
    pub directory_structure: String,
}

#[derive(Debug, Deserialize)]
pub struct TasksRequest {
    pub specification: String,
    pub directory: String,
    pub framework: String,
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
pub struct TaskDetailRequest {
    pub tasks: Vec<Task>,
    pub specification: String,
}

#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    pub tasks: Vec<TaskDetail>,
}

#[derive(Debug, Deserialize)]
pub struct GraphTaskRequest {
    /// Tasks as stored in the project record: each entry is itself a
    /// JSON-encoded task document.
    pub task_info: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GraphTaskResponse {
    pub edges: Vec<TaskDependencyEdge>,
}

#[derive(Debug, Deserialize)]
pub struct DurationTaskRequest {
    /// Total project length in days, as stored (a string).
    pub duration: String,
    pub task_info: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DurationTaskResponse {
    pub durations: Vec<TaskDuration>,
}

#[derive(Debug, Deserialize)]
pub struct EnvironmentRequest {
    pub specification: String,
    pub directory: String,
    pub framework: String,
}

pub type EnvironmentResponse = EnvironmentHandson;

#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    pub specification: String,
    pub framework: String,
}

#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub deploy: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskChatRequest {
    pub specification: String,
    pub directory_structure: String,
    pub chat_history: String,
    pub user_question: String,
    pub framework: String,
    pub task_detail: String,
}

#[derive(Debug, Serialize)]
pub struct TaskChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct HandsonRequest {
    pub specification: String,
    pub task_title: String,
    pub priority: String,
    pub task_specification: String,
}

#[derive(Debug, Serialize)]
pub struct HandsonResponse {
    pub handson: String,
}

/// Decode stored `task_info` strings and project each document down to the
/// fields the graph and duration services consume.
///
/// Malformed entries are a caller error, reported with the offending string.
pub fn decode_task_info(task_info: &[String]) -> Result<Vec<TaskRef>, String> {
    task_info
        .iter()
        .map(|raw| {
            let value: serde_json::Value = serde_json::from_str(raw)
                .map_err(|_| format!("invalid JSON in task_info entry: {}", raw))?;
            let task_id = value
                .get("task_id")
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| format!("task_info entry missing task_id: {}", raw))?;
            let task_name = value
                .get("task_name")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| format!("task_info entry missing task_name: {}", raw))?;
            let content = value
                .get("content")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| format!("task_info entry missing content: {}", raw))?;
            Ok(TaskRef {
                task_id: task_id as usize,
                task_name: task_name.to_string(),
                content: content.to_string(),
            })
        })
        .collect()
}

/// Parse the stored project duration (e.g. `"10"`) into a day count.
pub fn parse_total_days(duration: &str) -> Result<u32, String> {
    duration
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|d| *d >= 1)
        .ok_or_else(|| format!("duration must be a positive day count, got {:?}", duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_stored_task_documents() {
        let stored = vec![
            r#"{"task_id":0,"task_name":"Design","priority":"Must","content":"plan it","detail":"..."}"#
                .to_string(),
            r#"{"task_id":1,"task_name":"Build","content":"do it"}"#.to_string(),
        ];
        let tasks = decode_task_info(&stored).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_id, 0);
        assert_eq!(tasks[1].task_name, "Build");
    }

    #[test]
    fn rejects_invalid_json_entries() {
        let stored = vec!["not json".to_string()];
        let err = decode_task_info(&stored).unwrap_err();
        assert!(err.contains("invalid JSON"));
    }

    #[test]
    fn rejects_entries_missing_required_keys() {
        let stored = vec![r#"{"task_name":"x","content":"y"}"#.to_string()];
        let err = decode_task_info(&stored).unwrap_err();
        assert!(err.contains("task_id"));
    }

    #[test]
    fn duration_parsing() {
        assert_eq!(parse_total_days("10"), Ok(10));
        assert_eq!(parse_total_days(" 3 "), Ok(3));
        assert!(parse_total_days("0").is_err());
        assert!(parse_total_days("ten").is_err());
    }
}
