/**
 * Authentication Middleware
 *
 * The auth gate sits in front of every route. Exempt paths and CORS
 * preflights pass straight through; every other request must carry
 * `Authorization: Bearer <access token>` naming an existing, active user.
 * The resolved `User` is stored in the request extensions, where handlers
 * pick it up with the `AuthUser` extractor.
 *
 * Every credential failure answers with the same 401 body and a
 * `WWW-Authenticate: Bearer` challenge; the actual reason is only logged.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::backend::auth::tokens::{TokenService, TokenType};
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::storage::UserStore;

/// Path prefixes that bypass the auth gate
///
/// A prefix matches the path itself or anything below it at a `/`
/// boundary, so `/health` covers `/health/db` but not `/healthz`. The root
/// entry `/` only ever matches `/` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths {
    prefixes: Vec<String>,
}

impl PublicPaths {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Default exemptions for an API mounted at `api_prefix`
    pub fn defaults(api_prefix: &str) -> Self {
        let api = api_prefix.trim_end_matches('/');
        Self::new([
            "/".to_string(),
            "/health".to_string(),
            "/docs".to_string(),
            "/openapi.json".to_string(),
            format!("{}/auth/login", api),
            format!("{}/auth/register", api),
            format!("{}/auth/oauth", api),
            format!("{}/auth/exchange-token", api),
            format!("{}/auth/refresh", api),
        ])
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            if prefix == "/" {
                return path == "/";
            }
            let prefix = prefix.trim_end_matches('/');
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::defaults("/api/v1")
    }
}

/// Resolve the caller behind an `Authorization` header value
///
/// # Errors
///
/// * `Unauthenticated` - header missing, not a Bearer credential, token
///   rejected, or the subject no longer exists
/// * `Forbidden` - the subject exists but is inactive
/// * `Storage` - the user lookup itself failed
pub async fn authenticate(
    header: Option<&str>,
    tokens: &TokenService,
    users: &dyn UserStore,
) -> Result<User, BackendError> {
    let header = header.ok_or_else(|| {
        tracing::warn!("Missing Authorization header");
        BackendError::Unauthenticated
    })?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::Unauthenticated
    })?;

    let user_id = tokens.verify(token.trim(), TokenType::Access).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::Unauthenticated
    })?;

    let user = users.get_user(user_id).await?.ok_or_else(|| {
        tracing::warn!(user_id = %user_id, "Token subject not found");
        BackendError::Unauthenticated
    })?;

    if !user.is_active {
        tracing::warn!(user_id = %user_id, "Inactive user rejected");
        return Err(BackendError::forbidden("Inactive user"));
    }

    Ok(user)
}

/// Authentication middleware
///
/// 1. Lets `OPTIONS` and exempt paths through untouched
/// 2. Resolves the caller with [`authenticate`]
/// 3. Attaches the `User` to the request extensions
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS
        || app_state.settings.public_paths.is_public(request.uri().path())
    {
        return next.run(request).await;
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authenticate(header, &app_state.tokens, app_state.users.as_ref()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Axum extractor for the authenticated user
///
/// Only succeeds on routes behind the auth gate.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().cloned().ok_or_else(|| {
            tracing::warn!("User not found in request extensions");
            BackendError::Unauthenticated
        })?;

        Ok(AuthUser(user))
    }
}
