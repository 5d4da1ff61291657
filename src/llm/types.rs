//! Hosted assistant API types

use crate::entity::MessageRole;
use serde::{Deserialize, Serialize};

/// Configuration for creating a hosted assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSpec {
    pub name: String,
    pub instructions: String,
    pub model: String,
    /// Retrieval store bound to the assistant's file search tool
    pub vector_store_id: Option<String>,
}

impl AssistantSpec {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
            vector_store_id: None,
        }
    }

    pub fn with_vector_store(mut self, store_id: impl Into<String>) -> Self {
        self.vector_store_id = Some(store_id.into());
        self
    }
}

/// A message used to seed a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadMessage {
    pub role: &'static str,
    pub content: String,
}

impl ThreadMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
        }
    }

    /// Threads only accept user and assistant turns; system messages are skipped
    pub fn from_history(role: MessageRole, content: &str) -> Option<Self> {
        match role {
            MessageRole::User => Some(Self::user(content)),
            MessageRole::Assistant => Some(Self::assistant(content)),
            MessageRole::System => None,
        }
    }
}

/// Run lifecycle as reported by the hosted API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            Self::Queued | Self::InProgress | Self::Cancelling
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
            Self::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// One execution of an assistant over a thread
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// JSON-schema constraint on a run's reply
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: serde_json::Value,
}

impl ResponseFormat {
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Wire form of the `response_format` run parameter
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "schema": self.schema,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_terminal() {
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::InProgress.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
        assert!(RunStatus::RequiresAction.is_terminal());
    }

    #[test]
    fn test_run_deserialize() {
        let run: Run = serde_json::from_str(
            r#"{"id":"run_1","status":"failed","last_error":{"code":"rate_limit_exceeded","message":"slow down"},"object":"thread.run"}"#,
        )
        .unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.last_error.unwrap().code, "rate_limit_exceeded");

        let run: Run = serde_json::from_str(r#"{"id":"run_2","status":"in_progress"}"#).unwrap();
        assert!(run.last_error.is_none());
    }

    #[test]
    fn test_history_skips_system_messages() {
        assert!(ThreadMessage::from_history(MessageRole::System, "x").is_none());
        let msg = ThreadMessage::from_history(MessageRole::Assistant, "hi").unwrap();
        assert_eq!(msg.role, "assistant");
    }

    #[test]
    fn test_response_format_wire() {
        let format = ResponseFormat::json_schema("demo", serde_json::json!({"type": "object"}));
        let wire = format.to_wire();
        assert_eq!(wire["type"], "json_schema");
        assert_eq!(wire["json_schema"]["name"], "demo");
    }
}
