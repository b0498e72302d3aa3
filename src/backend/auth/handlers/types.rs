/**
 * Authentication Handler Types
 *
 * Request and response bodies for the `/api/v1/auth` endpoints.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;
use crate::shared::UserId;

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    /// Checked against the stored bcrypt hash
    pub password: String,
}

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    /// 3-30 chars, starts with a letter, alphanumeric + underscore
    pub username: String,
    /// At least 8 characters; hashed before storage
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Profile posted by the frontend after a provider login
///
/// Every field is optional at the decoding level so a missing one becomes
/// a 400 with a readable message rather than a decoder rejection.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct OAuthUserRequest {
    pub provider: Option<String>,
    pub provider_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Exchange a linked provider identity for API tokens
#[derive(Deserialize, Serialize, Debug)]
pub struct ExchangeTokenRequest {
    pub provider: String,
    pub provider_id: String,
}

/// Token pair returned by login and exchange, access-only from refresh
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh_token: Option<String>,
    /// Always `bearer`
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// User response (without sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            is_active: user.is_active,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}
