//! Task dependency graph generation with acyclicity validation.

use serde::Deserialize;
use std::collections::HashMap;

use super::complete_and_parse;
use crate::llm::SharedLlmClient;
use crate::prompts;
use crate::schema::Schema;
use crate::types::{TaskDependencyEdge, TaskRef};

const EDGES: Schema = Schema::new("edges", &["edges"]);

#[derive(Debug, Deserialize)]
struct EdgesResponse {
    edges: Vec<TaskDependencyEdge>,
}

pub struct GraphService {
    client: SharedLlmClient,
    temperature: f64,
}

impl GraphService {
    pub fn new(client: SharedLlmClient, temperature: f64) -> Self {
        Self {
            client,
            temperature,
        }
    }

    /// Infer dependency edges between the given tasks.
    ///
    /// The model is instructed to return a forest, but the output is not
    /// trusted: edges referencing unknown task ids are dropped, and a cyclic
    /// edge set is rejected outright rather than silently accepted.
    pub async fn generate(&self, tasks: &[TaskRef]) -> Vec<TaskDependencyEdge> {
        let prompt = prompts::graph(tasks);
        let edges = match complete_and_parse::<EdgesResponse>(
            &self.client,
            &prompt,
            self.temperature,
            &EDGES,
        )
        .await
        {
            Ok(response) => response.edges,
            Err(e) => {
                tracing::warn!("Graph generation failed: {}", e);
                return Vec::new();
            }
        };

        let known: Vec<usize> = tasks.iter().map(|t| t.task_id).collect();
        let edges: Vec<TaskDependencyEdge> = edges
            .into_iter()
            .filter(|e| {
                let valid = known.contains(&e.parent) && known.contains(&e.child);
                if !valid {
                    tracing::warn!("Dropping edge with unknown task id: {:?}", e);
                }
                valid
            })
            .collect();

        if has_cycle(&edges) {
            tracing::warn!("Generated edge set contains a cycle, rejecting it");
            return Vec::new();
        }
        edges
    }
}

/// Detect whether any task index is reachable from itself via child pointers.
pub fn has_cycle(edges: &[TaskDependencyEdge]) -> bool {
    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    for edge in edges {
        children.entry(edge.parent).or_default().push(edge.child);
    }

    // Iterative DFS with three colors: unvisited, on the current path, done.
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }
    let mut color: HashMap<usize, Color> = HashMap::new();

    for &start in children.keys() {
        if color.get(&start).copied().unwrap_or(Color::White) != Color::White {
            continue;
        }
        let mut stack = vec![(start, 0usize)];
        color.insert(start, Color::Gray);
        while let Some(&(node, next_child)) = stack.last() {
            let node_children = children.get(&node).map(Vec::as_slice).unwrap_or(&[]);
            if next_child < node_children.len() {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let child = node_children[next_child];
                match color.get(&child).copied().unwrap_or(Color::White) {
                    Color::Gray => return true,
                    Color::White => {
                        color.insert(child, Color::Gray);
                        stack.push((child, 0));
                    }
                    Color::Black => {}
                }
            } else {
                color.insert(node, Color::Black);
                stack.pop();
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(parent: usize, child: usize) -> TaskDependencyEdge {
        TaskDependencyEdge { parent, child }
    }

    #[test]
    fn forest_has_no_cycle() {
        let edges = vec![edge(0, 1), edge(0, 2), edge(2, 3)];
        assert!(!has_cycle(&edges));
    }

    #[test]
    fn empty_edge_set_is_acyclic() {
        assert!(!has_cycle(&[]));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        assert!(has_cycle(&[edge(1, 1)]));
    }

    #[test]
    fn indirect_cycle_is_detected() {
        let edges = vec![edge(0, 1), edge(1, 2), edge(2, 0)];
        assert!(has_cycle(&edges));
    }

    #[test]
    fn diamond_sharing_is_not_a_cycle() {
        // Two paths converge on 3; still a DAG.
        let edges = vec![edge(0, 1), edge(0, 2), edge(1, 3), edge(2, 3)];
        assert!(!has_cycle(&edges));
    }

    use crate::llm::{CompletionOptions, LlmClient, LlmError};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedClient(String);

    #[async_trait]
    impl LlmClient for FixedClient {
        async fn complete(
            &self,
            _prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    fn task_refs(n: usize) -> Vec<TaskRef> {
        (0..n)
            .map(|i| TaskRef {
                task_id: i,
                task_name: format!("task {}", i),
                content: format!("content {}", i),
            })
            .collect()
    }

    #[tokio::test]
    async fn cyclic_edge_set_is_rejected() {
        let raw = r#"{"edges": [{"parent": 0, "child": 1}, {"parent": 1, "child": 0}]}"#;
        let service = GraphService::new(Arc::new(FixedClient(raw.to_string())), 0.5);
        let edges = service.generate(&task_refs(2)).await;
        assert!(edges.is_empty());
    }

    #[tokio::test]
    async fn acyclic_edge_set_passes_through() {
        let raw = r#"{"edges": [{"parent": 0, "child": 1}, {"parent": 1, "child": 2}]}"#;
        let service = GraphService::new(Arc::new(FixedClient(raw.to_string())), 0.5);
        let edges = service.generate(&task_refs(3)).await;
        assert_eq!(edges.len(), 2);
    }

    #[tokio::test]
    async fn unknown_task_ids_are_dropped() {
        let raw = r#"{"edges": [{"parent": 0, "child": 9}, {"parent": 0, "child": 1}]}"#;
        let service = GraphService::new(Arc::new(FixedClient(raw.to_string())), 0.5);
        let edges = service.generate(&task_refs(2)).await;
        assert_eq!(edges, vec![edge(0, 1)]);
    }
}
