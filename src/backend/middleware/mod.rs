//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - The auth gate: exemption list, bearer-token check, and the
//!   `AuthUser` extractor handlers use to read the resolved caller
//! - **`extract`** - `ApiJson`, `ApiPath` and `ApiQuery`, whose rejections
//!   are `BackendError`s
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware;
//! use tasket::backend::middleware::auth_middleware;
//!
//! let app = router.layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;
pub mod extract;

pub use auth::{auth_middleware, authenticate, AuthUser, PublicPaths};
pub use extract::{ApiJson, ApiPath, ApiQuery};
