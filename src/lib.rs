//! Tasket - Collaborative Project Tracking Backend
//!
//! Tasket is a multi-tenant project and task tracker (projects, tasks, epics,
//! milestones, notifications) with JWT authentication and WebSocket live
//! updates for everyone looking at the same project board.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types that do not depend on the server stack
//!   - Identifier newtypes
//!   - Outbound realtime envelope (`RealtimeEvent` / `ServerMessage`)
//!   - Inbound WebSocket messages (`ClientMessage`)
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Token issuance/verification and the request auth gate
//!   - Project access policy
//!   - WebSocket connection registry and fan-out
//!   - Notification relay
//!   - Axum router, configuration, storage backends
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the `backend` module and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use tasket::backend::server::{create_app, Settings};
//!
//! # async fn example() {
//! let settings = Settings::from_env();
//! let app = create_app(settings).await;
//! // Serve `app` with axum::serve
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The only shared mutable state is the connection registry, which keeps its
//! maps behind a single mutex. Token verification and access checks are
//! stateless.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
