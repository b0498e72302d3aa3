//! Authentication Handlers Module
//!
//! HTTP handlers for the `/api/v1/auth` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration handler
//! ├── login.rs     - Password login handler
//! ├── refresh.rs   - Refresh-token exchange
//! ├── oauth.rs     - OAuth federation and token exchange
//! └── me.rs        - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/v1/auth/register
//! - **`login`** - POST /api/v1/auth/login
//! - **`refresh`** - POST /api/v1/auth/refresh
//! - **`oauth_user`** - POST /api/v1/auth/oauth/user
//! - **`exchange_token`** - POST /api/v1/auth/exchange-token
//! - **`get_me`** - GET /api/v1/auth/me (gated)

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Refresh handler
pub mod refresh;

/// OAuth handlers
pub mod oauth;

/// Get current user handler
pub mod me;

// Re-export commonly used types
pub use types::{
    ExchangeTokenRequest, LoginRequest, OAuthUserRequest, RefreshRequest, RegisterRequest,
    TokenResponse, UserResponse,
};

// Re-export handlers
pub use login::login;
pub use me::get_me;
pub use oauth::{exchange_token, oauth_user};
pub use refresh::refresh;
pub use register::register;
