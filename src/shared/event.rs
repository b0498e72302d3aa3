/**
 * Real-time Event System
 *
 * Every frame pushed to a WebSocket client is a `RealtimeEvent`: a
 * `ServerMessage` variant tagged by `type`, flattened next to a
 * `timestamp`. On the wire:
 *
 * ```json
 * {"type": "task_moved", "project_id": 1, "task_id": 9, "new_status": "done",
 *  "timestamp": "2024-05-01T10:00:00+00:00"}
 * ```
 *
 * The one exception to the server-generated timestamp is `pong`, which
 * echoes whatever the client sent in its `ping`.
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::ids::{ProjectId, TaskId, UserId};

/// Kinds of server-to-client messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    TaskCreated { project_id: ProjectId, data: Value },
    TaskUpdated { project_id: ProjectId, data: Value },
    TaskDeleted { project_id: ProjectId, task_id: TaskId },
    TaskMoved {
        project_id: ProjectId,
        task_id: TaskId,
        new_status: String,
    },
    CommentAdded { project_id: ProjectId, data: Value },
    UserJoined { project_id: ProjectId, data: Value },
    UserLeft { project_id: ProjectId, user_id: UserId },
    EstimationSessionStarted { project_id: ProjectId, data: Value },
    EstimationVote { project_id: ProjectId, data: Value },
    /// Notification record pushed to its owner
    Notification { data: Value },
    Subscribed { project_id: ProjectId, message: String },
    Unsubscribed { project_id: ProjectId, message: String },
    Pong,
    /// Reply to an inbound frame that could not be handled
    Error { message: String },
}

impl ServerMessage {
    /// Wire name of this message kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "task_created",
            Self::TaskUpdated { .. } => "task_updated",
            Self::TaskDeleted { .. } => "task_deleted",
            Self::TaskMoved { .. } => "task_moved",
            Self::CommentAdded { .. } => "comment_added",
            Self::UserJoined { .. } => "user_joined",
            Self::UserLeft { .. } => "user_left",
            Self::EstimationSessionStarted { .. } => "estimation_session_started",
            Self::EstimationVote { .. } => "estimation_vote",
            Self::Notification { .. } => "notification",
            Self::Subscribed { .. } => "subscribed",
            Self::Unsubscribed { .. } => "unsubscribed",
            Self::Pong => "pong",
            Self::Error { .. } => "error",
        }
    }
}

/// Real-time event envelope sent to connected clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeEvent {
    /// Message kind and its fields
    #[serde(flatten)]
    pub message: ServerMessage,
    /// RFC 3339 UTC time the event was created (client value for `pong`)
    pub timestamp: Value,
}

impl RealtimeEvent {
    /// Wrap a message, stamping it with the current time
    pub fn new(message: ServerMessage) -> Self {
        Self {
            message,
            timestamp: Value::String(get_timestamp()),
        }
    }

    pub fn task_created(data: Value, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::TaskCreated { project_id, data })
    }

    pub fn task_updated(data: Value, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::TaskUpdated { project_id, data })
    }

    pub fn task_deleted(task_id: TaskId, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::TaskDeleted { project_id, task_id })
    }

    pub fn task_moved(task_id: TaskId, new_status: impl Into<String>, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::TaskMoved {
            project_id,
            task_id,
            new_status: new_status.into(),
        })
    }

    pub fn comment_added(data: Value, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::CommentAdded { project_id, data })
    }

    pub fn user_joined(data: Value, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::UserJoined { project_id, data })
    }

    pub fn user_left(user_id: UserId, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::UserLeft { project_id, user_id })
    }

    pub fn estimation_session_started(data: Value, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::EstimationSessionStarted { project_id, data })
    }

    pub fn estimation_vote(data: Value, project_id: ProjectId) -> Self {
        Self::new(ServerMessage::EstimationVote { project_id, data })
    }

    pub fn notification(data: Value) -> Self {
        Self::new(ServerMessage::Notification { data })
    }

    pub fn subscribed(project_id: ProjectId) -> Self {
        Self::new(ServerMessage::Subscribed {
            project_id,
            message: format!("Subscribed to project {}", project_id),
        })
    }

    pub fn unsubscribed(project_id: ProjectId) -> Self {
        Self::new(ServerMessage::Unsubscribed {
            project_id,
            message: format!("Unsubscribed from project {}", project_id),
        })
    }

    /// Reply to a `ping`, echoing the client's timestamp verbatim
    pub fn pong(client_timestamp: Option<Value>) -> Self {
        Self {
            message: ServerMessage::Pong,
            timestamp: client_timestamp.unwrap_or(Value::Null),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ServerMessage::Error {
            message: message.into(),
        })
    }

    /// Serialize to the JSON text frame sent over the socket
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Get the current timestamp as an RFC3339 string
fn get_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
