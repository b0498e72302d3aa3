/**
 * Register Handler
 *
 * POST /api/v1/auth/register
 *
 * # Registration Process
 *
 * 1. Validate email, username and password
 * 2. Check email and username are free
 * 3. Hash password using bcrypt
 * 4. Create an active, unverified user
 *
 * # Validation
 *
 * - Email must contain '@' character (basic validation)
 * - Username: 3-30 chars, starts with a letter, alphanumeric + underscore
 * - Password must be at least 8 characters long
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};

use crate::backend::auth::handlers::types::{RegisterRequest, UserResponse};
use crate::backend::auth::users::NewUser;
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::AppState;
use crate::backend::storage::StorageError;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Invalid input, or email/username already taken
/// * `500 Internal Server Error` - Hashing or store failure
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), BackendError> {
    if !request.email.contains('@') {
        return Err(BackendError::bad_request("Invalid email address"));
    }
    if !is_valid_username(&request.username) {
        return Err(BackendError::bad_request(
            "Username must be 3-30 characters, start with a letter, and contain only letters, digits and underscores",
        ));
    }
    if request.password.len() < 8 {
        return Err(BackendError::bad_request("Password must be at least 8 characters"));
    }

    if state.users.get_user_by_email(&request.email).await?.is_some() {
        return Err(BackendError::bad_request("Email already registered"));
    }
    if state.users.username_exists(&request.username).await? {
        return Err(BackendError::bad_request("Username already taken"));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("password hashing failed")
    })?;

    let user = state
        .users
        .create_user(NewUser {
            email: request.email,
            username: request.username,
            full_name: request.full_name,
            hashed_password: Some(hashed_password),
            is_active: true,
            is_verified: false,
            avatar_url: request.avatar_url,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            StorageError::Conflict(message) => BackendError::bad_request(message),
            other => other.into(),
        })?;

    tracing::info!("User registered: {} ({})", user.username, user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}
