//! Backend Error Module
//!
//! Error types for the HTTP and WebSocket layers. Handlers return
//! `Result<_, BackendError>` and the error turns itself into a JSON response.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and its status mapping
//! └── conversion.rs - IntoResponse and From impls
//! ```
//!
//! # Status Mapping
//!
//! | Variant           | Status |
//! |-------------------|--------|
//! | `Unauthenticated` | 401 (with `WWW-Authenticate: Bearer`) |
//! | `Forbidden`       | 403    |
//! | `NotFound`        | 404    |
//! | `Conflict`        | 409    |
//! | `Malformed`       | 400    |
//! | `BadRequest`      | 400    |
//! | `Storage`         | by storage error kind |
//! | `Internal`        | 500    |
//!
//! Every credential problem (missing header, bad signature, expired token,
//! wrong token type, unknown user) collapses into `Unauthenticated` so the
//! response never reveals which check failed.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
