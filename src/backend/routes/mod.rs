//! Route Configuration Module
//!
//! Configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and layers
//! └── api_routes.rs   - API endpoints (auth, notifications, projects, ws)
//! ```
//!
//! # Route Types
//!
//! ## Public
//!
//! - `GET /` - Welcome document
//! - `GET /health` - Health check
//! - `POST /api/v1/auth/{register,login,refresh,oauth/user,exchange-token}`
//!
//! ## Gated
//!
//! Everything else, including `/api/v1/ws/{user_id}` and any unknown path
//! (which answers 401 before it can answer 404).

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
