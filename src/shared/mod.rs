//! Shared Module
//!
//! Types that travel over the wire and do not depend on the server stack:
//! identifiers, the outbound realtime envelope, and inbound WebSocket
//! messages.

/// Identifier newtypes
pub mod ids;

/// Outbound real-time events
pub mod event;

/// Inbound WebSocket client messages
pub mod client;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use ids::{NotificationId, ProjectId, TaskId, UserId};
pub use event::{RealtimeEvent, ServerMessage};
pub use client::ClientMessage;
pub use error::SharedError;
