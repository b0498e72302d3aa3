/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`, plus the `From` impls that let `?`
 * lift token, wire and JSON errors into it.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "detail": "Could not validate credentials",
 *   "status": 401
 * }
 * ```
 *
 * 401 responses also carry `WWW-Authenticate: Bearer`.
 */

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::auth::tokens::TokenError;
use crate::backend::error::types::BackendError;
use crate::shared::SharedError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = serde_json::json!({
            "detail": self.message(),
            "status": status.as_u16(),
        });

        let mut response = (status, Json(body)).into_response();
        if self.is_challenge() {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Every token failure is an authentication failure to the client
impl From<TokenError> for BackendError {
    fn from(err: TokenError) -> Self {
        tracing::debug!("Token rejected: {}", err);
        Self::Unauthenticated
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        Self::malformed(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {}", err))
    }
}
