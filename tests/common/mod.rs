//! Common test utilities and helpers
//!
//! - Test app construction over in-memory stores
//! - Request helpers driving the router through `tower::ServiceExt::oneshot`
//! - User seeding and bearer headers
//! - Custom assertion macros

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod auth_helpers;

#[cfg(feature = "ssr")]
pub use auth_helpers::*;
#[cfg(feature = "ssr")]
pub use test_app::*;
