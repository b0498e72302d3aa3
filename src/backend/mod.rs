//! Backend Module
//!
//! Server-side code for Tasket: an Axum HTTP/WebSocket server that
//! authenticates every request, authorizes project-scoped actions, and fans
//! out live project events to connected browsers.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, app assembly
//! - **`routes`** - Router and route tables
//! - **`auth`** - Token service, user model, login/refresh/OAuth handlers
//! - **`middleware`** - Auth gate applied in front of every route
//! - **`access`** - Project membership and role checks
//! - **`realtime`** - Connection registry and WebSocket endpoint
//! - **`notifications`** - Notification relay and its HTTP handlers
//! - **`storage`** - Collaborator traits, PostgreSQL and in-memory backends
//! - **`error`** - Backend error taxonomy and HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── server/         - Settings, AppState, create_app
//! ├── routes/         - Router assembly
//! ├── auth/           - Tokens, users, auth handlers
//! ├── middleware/     - Auth gate
//! ├── access/         - Access policy
//! ├── realtime/       - Registry + WebSocket
//! ├── notifications/  - Relay, persistence, handlers
//! ├── storage/        - Store traits and backends
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! 1. CORS and tracing layers
//! 2. Auth gate: exempt paths pass through, everything else needs a valid
//!    access token for an active user
//! 3. Handler: project-scoped handlers ask the access policy first
//! 4. Side effects that interest other users go through the registry

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Project access policy
pub mod access;

/// Real-time connection registry and WebSocket endpoint
pub mod realtime;

/// Notification relay
pub mod notifications;

/// Storage collaborators
pub mod storage;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use server::{create_app, AppState, Settings};
pub use auth::tokens::{TokenService, TokenType};
pub use access::{AccessPolicy, ProjectRole};
pub use realtime::ConnectionRegistry;
pub use notifications::NotificationRelay;
pub use error::BackendError;
