//! Real-time Update Module
//!
//! Live project events over WebSockets.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── registry.rs   - ConnectionRegistry: connections, subscriptions, fan-out
//! └── websocket.rs  - Upgrade handler and inbound frame dispatch
//! ```
//!
//! # Real-time System
//!
//! A browser opens one socket per tab and subscribes to the projects it is
//! showing. Server-side code that changes a project (a task moved, a comment
//! added) calls `broadcast_to_project` on the registry; personal events such
//! as notifications use `send_to_identity`. The registry lives in `AppState`
//! and is only valid within a single server process.
//!
//! # Example
//!
//! ```rust,ignore
//! use tasket::shared::{ProjectId, RealtimeEvent, TaskId};
//!
//! let event = RealtimeEvent::task_deleted(TaskId(9), ProjectId(1));
//! state.registry.broadcast_to_project(&event, ProjectId(1), Some(caller.id));
//! ```

pub mod registry;
pub mod websocket;

pub use registry::{
    ConnectionHandle, ConnectionId, ConnectionRegistry, ConnectionState, FrameReceiver,
    Registration,
};
pub use websocket::{handle_client_frame, websocket_handler};
