//! Inbound WebSocket messages
//!
//! Clients send JSON text frames with a `type` field. Known types decode into
//! `ClientMessage`; anything else is reported back as an error instead of
//! being dropped.

use serde::Deserialize;
use serde_json::Value;

use crate::shared::error::SharedError;
use crate::shared::ids::{ProjectId, TaskId};

/// `type` values the server understands
pub const KNOWN_TYPES: [&str; 5] = [
    "subscribe_project",
    "unsubscribe_project",
    "ping",
    "task_move",
    "estimation_vote",
];

/// A decoded client-to-server message
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    SubscribeProject {
        project_id: ProjectId,
    },
    UnsubscribeProject {
        project_id: ProjectId,
    },
    Ping {
        #[serde(default)]
        timestamp: Option<Value>,
    },
    /// Drag-and-drop of a task card to another column
    TaskMove {
        task_id: TaskId,
        new_status: String,
        project_id: ProjectId,
    },
    EstimationVote {
        task_id: TaskId,
        vote_value: Value,
        project_id: ProjectId,
    },
}

impl ClientMessage {
    /// Decode a text frame
    ///
    /// Distinguishes non-JSON input, a missing `type`, an unknown `type`,
    /// and a known `type` with missing or mistyped fields.
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        let value: Value = serde_json::from_str(text)?;

        let message_type = value
            .as_object()
            .ok_or_else(|| SharedError::malformed("expected a JSON object"))?
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| SharedError::malformed("missing 'type' field"))?
            .to_string();

        if !KNOWN_TYPES.contains(&message_type.as_str()) {
            return Err(SharedError::unknown_type(message_type));
        }

        serde_json::from_value(value)
            .map_err(|e| SharedError::malformed(format!("{}: {}", message_type, e)))
    }
}
