/**
 * Backend Error Types
 *
 * `BackendError` is the single error type handlers return. Each variant maps
 * to one HTTP status; the detail text is what the client sees.
 *
 * # Error Categories
 *
 * ## Credential Errors
 *
 * - `Unauthenticated` - uniform 401 for any token or identity failure
 * - `Forbidden` - authenticated but the account is inactive
 *
 * ## Resource Errors
 *
 * - `NotFound` - missing resource, or one the caller may not see
 * - `Conflict` - uniqueness violations
 *
 * ## Input Errors
 *
 * - `Malformed` - payload could not be decoded
 * - `BadRequest` - payload decoded but is semantically invalid
 *
 * ## Server Errors
 *
 * - `Storage` - a collaborator store failed
 * - `Internal` - anything else
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::storage::StorageError;

/// Detail text for every 401
pub const CREDENTIALS_DETAIL: &str = "Could not validate credentials";

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Missing, invalid, expired or wrong-type credentials, or an unknown user
    #[error("{}", CREDENTIALS_DETAIL)]
    Unauthenticated,

    /// Authenticated identity is not allowed to proceed
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Resource does not exist or is not visible to the caller
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Uniqueness violation
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// Payload could not be decoded
    #[error("Malformed request: {message}")]
    Malformed {
        /// Human-readable error message
        message: String,
    },

    /// Payload decoded but was rejected
    #[error("Bad request: {message}")]
    BadRequest {
        /// Human-readable error message
        message: String,
    },

    /// Storage collaborator failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Unexpected server-side failure
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message
        message: String,
    },
}

impl BackendError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Malformed { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Storage(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The detail text sent to the client
    ///
    /// Server-side failures are reported generically; their cause is logged
    /// when the response is built.
    pub fn message(&self) -> String {
        match self {
            Self::Unauthenticated => CREDENTIALS_DETAIL.to_string(),
            Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Malformed { message }
            | Self::BadRequest { message } => message.clone(),
            Self::Storage(StorageError::NotFound(message))
            | Self::Storage(StorageError::Conflict(message)) => message.clone(),
            Self::Storage(_) | Self::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// Whether the response should carry a `WWW-Authenticate` challenge
    pub fn is_challenge(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}
