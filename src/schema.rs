//! Schema-guided parsing of gateway responses.
//!
//! Each generation task declares its expected output shape statically (the
//! top-level field names it requires) instead of describing it loosely in
//! prompt text. After the repair pass the response is strict-parsed and the
//! declared keys are checked mechanically before typed deserialization.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::repair::repair_json;

/// Statically declared response shape for one generation task.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Name used in diagnostics.
    pub name: &'static str,
    /// Top-level keys that must be present.
    pub required: &'static [&'static str],
}

impl Schema {
    pub const fn new(name: &'static str, required: &'static [&'static str]) -> Self {
        Self { name, required }
    }
}

/// Failure to turn raw completion text into a schema-valid value.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("response is not valid JSON even after repair: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("response is not a JSON object")]
    NotObject,
    #[error("required key {key:?} missing from response")]
    MissingKey { key: &'static str },
    #[error("response does not match the {schema} shape: {source}")]
    Shape {
        schema: &'static str,
        source: serde_json::Error,
    },
}

/// Repair `raw`, strict-parse it, validate it against `schema`, and
/// deserialize into `T`.
///
/// Both the raw and the repaired text are retained in the debug log for
/// diagnosing provider misbehavior; neither is surfaced to the caller.
pub fn repair_and_parse<T: DeserializeOwned>(raw: &str, schema: &Schema) -> Result<T, ParseError> {
    let repaired = repair_json(raw);
    tracing::debug!(
        schema = schema.name,
        raw = %raw,
        repaired = %repaired,
        "repairing gateway response"
    );

    let value: Value = serde_json::from_str(&repaired)?;
    let object = value.as_object().ok_or(ParseError::NotObject)?;
    for key in schema.required {
        if !object.contains_key(*key) {
            return Err(ParseError::MissingKey { key });
        }
    }

    serde_json::from_value(value).map_err(|source| ParseError::Shape {
        schema: schema.name,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct EdgeList {
        edges: Vec<Edge>,
    }

    #[derive(Debug, Deserialize)]
    struct Edge {
        parent: usize,
        child: usize,
    }

    const EDGES: Schema = Schema::new("edges", &["edges"]);

    #[test]
    fn parses_valid_response() {
        let parsed: EdgeList =
            repair_and_parse(r#"{"edges": [{"parent": 0, "child": 1}]}"#, &EDGES).unwrap();
        assert_eq!(parsed.edges.len(), 1);
        assert_eq!(parsed.edges[0].parent, 0);
        assert_eq!(parsed.edges[0].child, 1);
    }

    #[test]
    fn parses_fenced_response() {
        let raw = "```json\n{\"edges\": []}\n```";
        let parsed: EdgeList = repair_and_parse(raw, &EDGES).unwrap();
        assert!(parsed.edges.is_empty());
    }

    #[test]
    fn missing_key_is_diagnosed() {
        let err = repair_and_parse::<EdgeList>(r#"{"nodes": []}"#, &EDGES).unwrap_err();
        assert!(matches!(err, ParseError::MissingKey { key: "edges" }));
    }

    #[test]
    fn unrepairable_text_is_a_syntax_error() {
        let err = repair_and_parse::<EdgeList>("I could not produce JSON, sorry", &EDGES)
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn shape_mismatch_is_distinguished() {
        let err =
            repair_and_parse::<EdgeList>(r#"{"edges": [{"parent": "zero"}]}"#, &EDGES).unwrap_err();
        assert!(matches!(err, ParseError::Shape { schema: "edges", .. }));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = repair_and_parse::<EdgeList>("[1, 2, 3]", &EDGES).unwrap_err();
        assert!(matches!(err, ParseError::NotObject));
    }
}
