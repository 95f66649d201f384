//! Domain types shared by the generation services and the HTTP boundary.

use serde::{Deserialize, Serialize};

/// Priority tier of a task, MoSCoW-style without the "Won't" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Must,
    Should,
    Could,
}

/// One unit of project work produced by the flat task-list generator.
///
/// Immutable once produced; detail generation returns an augmented copy
/// ([`TaskDetail`]) rather than mutating this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_name: String,
    pub priority: Priority,
    pub content: String,
}

/// Whether a task's detail was generated or substituted by the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailStatus {
    Ok,
    Failed,
}

/// A [`Task`] augmented with a generated hands-on guide.
///
/// `status` discriminates real output from the degraded fallback so callers
/// never have to pattern-match error prose out of `detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub task_name: String,
    pub priority: Priority,
    pub content: String,
    /// Markdown hands-on instructions, or a human-readable failure message
    /// when `status` is `failed`.
    pub detail: String,
    pub status: DetailStatus,
}

impl TaskDetail {
    /// Successful detail generation for `task`.
    pub fn generated(task: &Task, detail: String) -> Self {
        Self {
            task_name: task.task_name.clone(),
            priority: task.priority,
            content: task.content.clone(),
            detail,
            status: DetailStatus::Ok,
        }
    }

    /// Fallback entry preserving the original task fields unchanged.
    pub fn failed(task: &Task, reason: &str, attempts: u32) -> Self {
        Self {
            task_name: task.task_name.clone(),
            priority: task.priority,
            content: task.content.clone(),
            detail: format!(
                "Detail generation failed after {} attempts: {}",
                attempts, reason
            ),
            status: DetailStatus::Failed,
        }
    }
}

/// Projection of a stored task handed to graph and duration generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRef {
    pub task_id: usize,
    pub task_name: String,
    pub content: String,
}

/// One dependency edge between two task indices.
///
/// The edge set is expected to form a forest; by generation convention
/// `parent < child`. A task with no edges is a valid singleton tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDependencyEdge {
    pub parent: usize,
    pub child: usize,
}

/// Scheduled span of one task in whole-day offsets, `1..=duration`.
///
/// Spans may overlap across tasks; parallel work is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDuration {
    pub task_id: usize,
    pub start: u32,
    pub end: u32,
}

/// A ranked framework candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkProposal {
    pub name: String,
    /// Smaller is better.
    pub priority: u32,
    pub reason: String,
}

/// A clarifying question with an example answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: String,
    /// Example answer shown to the user as a hint, not a prediction.
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_preserves_original_task_fields() {
        let task = Task {
            task_name: "Design API".to_string(),
            priority: Priority::Must,
            content: "Sketch the endpoints".to_string(),
        };
        let fallback = TaskDetail::failed(&task, "gateway timeout", 3);
        assert_eq!(fallback.task_name, task.task_name);
        assert_eq!(fallback.priority, task.priority);
        assert_eq!(fallback.content, task.content);
        assert_eq!(fallback.status, DetailStatus::Failed);
        assert!(fallback.detail.contains("3 attempts"));
        assert!(fallback.detail.contains("gateway timeout"));
    }

    #[test]
    fn priority_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Priority::Must).unwrap(), "\"Must\"");
        let p: Priority = serde_json::from_str("\"Could\"").unwrap();
        assert_eq!(p, Priority::Could);
    }

    #[test]
    fn detail_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DetailStatus::Ok).unwrap(), "\"ok\"");
        assert_eq!(
            serde_json::to_string(&DetailStatus::Failed).unwrap(),
            "\"failed\""
        );
    }
}
