/**
 * Refresh Handler
 *
 * POST /api/v1/auth/refresh
 *
 * Trades a refresh token for a fresh access token. The refresh token itself
 * is neither rotated nor revoked.
 */
use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{RefreshRequest, TokenResponse};
use crate::backend::auth::tokens::TokenType;
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::AppState;

/// Refresh handler
///
/// # Errors
///
/// * `401 Unauthorized` - Token invalid, expired, an access token, or the user is gone
/// * `403 Forbidden` - User is inactive
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> Result<Json<TokenResponse>, BackendError> {
    let user_id = state.tokens.verify(&request.refresh_token, TokenType::Refresh)?;

    let user = state
        .users
        .get_user(user_id)
        .await?
        .ok_or(BackendError::Unauthenticated)?;

    if !user.is_active {
        return Err(BackendError::forbidden("Inactive user"));
    }

    let access_token = state.tokens.issue_access_token(user.id)?;
    tracing::debug!("Issued refreshed access token for {}", user.id);

    Ok(Json(TokenResponse::bearer(access_token, None)))
}
