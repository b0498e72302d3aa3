//! Authentication test helpers
//!
//! Seed users straight into the `MemoryStore` and mint tokens with the
//! app's own `TokenService`.

use tasket::backend::auth::users::{NewUser, User};
use tasket::backend::storage::MemoryStore;
use tasket::backend::AppState;

/// Password every seeded user gets
pub const TEST_PASSWORD: &str = "password123";

/// Seed an active user with a bcrypt password
pub fn seed_user(store: &MemoryStore, username: &str) -> User {
    store.add_user(NewUser {
        email: format!("{}@example.com", username),
        username: username.to_string(),
        full_name: None,
        hashed_password: Some(bcrypt::hash(TEST_PASSWORD, 4).expect("bcrypt hash")),
        is_active: true,
        is_verified: true,
        avatar_url: None,
    })
}

/// Access token for `user`
pub fn access_token(state: &AppState, user: &User) -> String {
    state
        .tokens
        .issue_access_token(user.id)
        .expect("Failed to create test token")
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
