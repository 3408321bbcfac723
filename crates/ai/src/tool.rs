//! Tool capability and its typed result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

/// Why a tool invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// The input could not be understood.
    InvalidInput,
    /// The input was understood but refused (e.g. a write on a read-only tool).
    Rejected,
    /// The database reported an error.
    Sql,
    /// A nested model call failed.
    Model,
    NotFound,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::InvalidInput => "invalid_input",
            ToolErrorKind::Rejected => "rejected",
            ToolErrorKind::Sql => "sql",
            ToolErrorKind::Model => "model",
            ToolErrorKind::NotFound => "not_found",
        }
    }
}

/// Result of one tool invocation.
///
/// Failures are ordinary values: the agent feeds them back to the model as
/// observations instead of aborting the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Ok(JsonValue),
    Err { kind: ToolErrorKind, message: String },
}

impl ToolOutcome {
    pub fn ok(value: impl Into<JsonValue>) -> Self {
        ToolOutcome::Ok(value.into())
    }

    pub fn err(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        ToolOutcome::Err {
            kind,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ToolOutcome::Ok(_))
    }

    pub fn value(&self) -> Option<&JsonValue> {
        match self {
            ToolOutcome::Ok(v) => Some(v),
            ToolOutcome::Err { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ToolErrorKind> {
        match self {
            ToolOutcome::Ok(_) => None,
            ToolOutcome::Err { kind, .. } => Some(*kind),
        }
    }

    /// `{"ok": true, "value": ..}` or `{"ok": false, "error": {"kind", "message"}}`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            ToolOutcome::Ok(value) => json!({ "ok": true, "value": value }),
            ToolOutcome::Err { kind, message } => json!({
                "ok": false,
                "error": { "kind": kind, "message": message }
            }),
        }
    }

    /// Text fed back to the model after `Observation:`.
    pub fn observation(&self) -> String {
        self.to_json().to_string()
    }
}

/// A single callable action exposed to an agent.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn invoke(&self, input: &str) -> ToolOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_outcome_serialises_with_value() {
        let outcome = ToolOutcome::ok(json!([{ "id": 1 }]));
        assert!(outcome.is_ok());
        assert_eq!(outcome.to_json(), json!({ "ok": true, "value": [{ "id": 1 }] }));
    }

    #[test]
    fn err_outcome_serialises_kind_in_snake_case() {
        let outcome = ToolOutcome::err(ToolErrorKind::InvalidInput, "empty query");
        assert_eq!(outcome.error_kind(), Some(ToolErrorKind::InvalidInput));
        assert_eq!(
            outcome.observation(),
            r#"{"error":{"kind":"invalid_input","message":"empty query"},"ok":false}"#
        );
    }
}
