/**
 * OAuth Handlers
 *
 * - POST /api/v1/auth/oauth/user - get or create the local user for a
 *   provider profile and link the account
 * - POST /api/v1/auth/exchange-token - issue tokens for an already linked
 *   provider identity
 *
 * Both bypass the bearer gate: the frontend server calls them right after
 * finishing the provider handshake, before it holds any API token. In place
 * of a bearer token the caller must present `OAUTH_EXCHANGE_SECRET` in the
 * `X-OAuth-Exchange-Secret` header. Without that secret configured both
 * endpoints refuse every call.
 */
use axum::{extract::State, http::HeaderMap, response::Json};
use subtle::ConstantTimeEq;

use crate::backend::auth::handlers::types::{
    ExchangeTokenRequest, OAuthUserRequest, TokenResponse, UserResponse,
};
use crate::backend::auth::oauth::{get_or_create_oauth_user, OAuthProfile};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::{AppState, Settings};

/// Header carrying the shared secret of the frontend server
pub const EXCHANGE_SECRET_HEADER: &str = "x-oauth-exchange-secret";

/// Check the caller holds the configured exchange secret
fn verify_exchange_secret(settings: &Settings, headers: &HeaderMap) -> Result<(), BackendError> {
    let Some(expected) = settings.oauth_exchange_secret.as_deref() else {
        tracing::warn!("OAuth call refused: OAUTH_EXCHANGE_SECRET is not configured");
        return Err(BackendError::Unauthenticated);
    };

    let presented = headers
        .get(EXCHANGE_SECRET_HEADER)
        .map(|value| value.as_bytes())
        .unwrap_or_default();

    if bool::from(presented.ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        tracing::warn!("OAuth call refused: missing or wrong exchange secret");
        Err(BackendError::Unauthenticated)
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Create or fetch the user behind a provider profile
///
/// # Errors
///
/// * `400 Bad Request` - `provider`, `provider_id` or `email` missing
/// * `401 Unauthorized` - Exchange secret missing or wrong
pub async fn oauth_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<OAuthUserRequest>,
) -> Result<Json<UserResponse>, BackendError> {
    verify_exchange_secret(&state.settings, &headers)?;

    let (Some(provider), Some(provider_id), Some(email)) = (
        required(request.provider),
        required(request.provider_id),
        required(request.email),
    ) else {
        return Err(BackendError::bad_request("Missing required OAuth data"));
    };

    let user = get_or_create_oauth_user(
        state.users.as_ref(),
        OAuthProfile {
            provider,
            provider_id,
            email,
            name: request.name,
            avatar_url: request.avatar_url,
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// Issue API tokens for a linked provider identity
///
/// # Errors
///
/// * `401 Unauthorized` - Exchange secret missing or wrong, no account is
///   linked for the identity, or its user is gone
/// * `403 Forbidden` - User is inactive
pub async fn exchange_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<ExchangeTokenRequest>,
) -> Result<Json<TokenResponse>, BackendError> {
    verify_exchange_secret(&state.settings, &headers)?;

    let account = state
        .users
        .find_oauth_account(&request.provider, &request.provider_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                "Token exchange for unlinked {} account {}",
                request.provider,
                request.provider_id
            );
            BackendError::Unauthenticated
        })?;

    let user = state
        .users
        .get_user(account.user_id)
        .await?
        .ok_or(BackendError::Unauthenticated)?;

    if !user.is_active {
        return Err(BackendError::forbidden("Inactive user"));
    }

    let access_token = state.tokens.issue_access_token(user.id)?;
    let refresh_token = state.tokens.issue_refresh_token(user.id)?;

    if let Err(e) = state.users.record_login(user.id).await {
        tracing::error!("Failed to record login for {}: {}", user.id, e);
    }

    tracing::info!("Exchanged {} identity for tokens: user {}", account.oauth_name, user.id);

    Ok(Json(TokenResponse::bearer(access_token, Some(refresh_token))))
}
