//! Shared Error Types
//!
//! Errors raised while decoding inbound WebSocket frames. The backend turns
//! each of them into an `error` reply on the socket, so the `Display` text is
//! what the client reads.
use thiserror::Error;

/// Errors produced by the shared wire types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Frame was JSON but not a usable message object
    #[error("Malformed message: {message}")]
    MalformedMessage {
        /// Human-readable error message
        message: String,
    },

    /// Frame carried a `type` this server does not handle
    #[error("Unknown message type: {message_type}")]
    UnknownMessageType {
        /// The offending `type` value
        message_type: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new malformed-message error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            message: message.into(),
        }
    }

    /// Create a new unknown-type error
    pub fn unknown_type(message_type: impl Into<String>) -> Self {
        Self::UnknownMessageType {
            message_type: message_type.into(),
        }
    }
}

/// Helper trait for converting serialization errors
impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
