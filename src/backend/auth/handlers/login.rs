/**
 * Login Handler
 *
 * POST /api/v1/auth/login
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Refuse inactive accounts
 * 4. Issue an access and a refresh token
 *
 * Unknown email, OAuth-only account and wrong password all produce the same
 * 401 so the endpoint cannot be used to enumerate accounts.
 */
use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{LoginRequest, TokenResponse};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::AppState;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - Unknown email, no password set, or wrong password
/// * `403 Forbidden` - Account is inactive
/// * `500 Internal Server Error` - Store or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/v1/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {"email": "user@example.com", "password": "securepassword123"}
/// ```
///
/// # Example Response
///
/// ```json
/// {"access_token": "eyJ...", "refresh_token": "eyJ...", "token_type": "bearer"}
/// ```
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, BackendError> {
    tracing::info!("Login request for: {}", request.email);

    let user = state
        .users
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.email);
            BackendError::Unauthenticated
        })?;

    let Some(hash) = user.hashed_password.as_deref() else {
        tracing::warn!("Password login attempted for OAuth-only user {}", user.id);
        return Err(BackendError::Unauthenticated);
    };

    let valid = verify(&request.password, hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        BackendError::internal("password verification failed")
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", user.id);
        return Err(BackendError::Unauthenticated);
    }

    if !user.is_active {
        return Err(BackendError::forbidden("Inactive user"));
    }

    let access_token = state.tokens.issue_access_token(user.id)?;
    let refresh_token = state.tokens.issue_refresh_token(user.id)?;

    if let Err(e) = state.users.record_login(user.id).await {
        tracing::error!("Failed to record login for {}: {}", user.id, e);
    }

    tracing::info!("User logged in successfully: {} ({})", user.username, user.id);

    Ok(Json(TokenResponse::bearer(access_token, Some(refresh_token))))
}
