//! Authentication Module
//!
//! Token issuance and verification, the user model, OAuth federation and
//! the HTTP handlers that hand tokens out.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── tokens.rs       - TokenService (HS256 access/refresh JWTs)
//! ├── users.rs        - User model and database operations
//! ├── oauth.rs        - Provider identity -> local user resolution
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Login**: email + password -> bcrypt check -> access + refresh token
//! 2. **OAuth**: provider profile -> local user (created or linked) ->
//!    exchange-token -> access + refresh token
//! 3. **Refresh**: refresh token -> new access token
//! 4. **Every other request**: `Authorization: Bearer <access token>`,
//!    checked by the auth gate in `middleware`
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens carry a `type` claim; a refresh token is never accepted as an
//!   access token and vice versa
//! - Invalid credentials return 401 (no information leakage)

/// JWT issuance and verification
pub mod tokens;

/// User data model and database operations
pub mod users;

/// OAuth identity federation
pub mod oauth;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::{exchange_token, get_me, login, oauth_user, refresh, register};
pub use tokens::{Claims, TokenError, TokenService, TokenType};
pub use users::User;
