/**
 * Token Service
 *
 * Issues and verifies the HS256 JWTs used for API access. Two kinds exist,
 * told apart by the `type` claim:
 *
 * - `access` - presented on every gated request (default lifetime 8 days)
 * - `refresh` - only accepted by the refresh endpoint (default 30 days)
 *
 * Claims on the wire:
 *
 * ```json
 * {"sub": "42", "exp": 1715000000, "iat": 1714300000, "type": "access"}
 * ```
 *
 * Verification checks, in order: signature, claim presence, expiry, type.
 * The service holds only the key pair and lifetimes, so it is shared freely
 * between tasks.
 */

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::UserId;

/// Which use a token was minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User ID, decimal
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Claims as found in an untrusted token; presence is checked by hand
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<String>,
    exp: Option<i64>,
    #[serde(rename = "type")]
    token_type: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("signature verification failed")]
    InvalidToken,

    #[error("token has expired")]
    Expired,

    #[error("unexpected token type")]
    WrongType,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Encoding(String),
}

/// Issues and verifies access and refresh tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenService {
    /// Create a service signing with `secret`
    ///
    /// # Arguments
    /// * `secret` - HMAC key shared by every instance
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue_access_token(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, TokenType::Access, Utc::now())
    }

    pub fn issue_refresh_token(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, TokenType::Refresh, Utc::now())
    }

    /// Issue a token as if the clock read `now`
    pub fn issue_at(
        &self,
        user_id: UserId,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            token_type,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token and return the identity it names
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<UserId, TokenError> {
        self.verify_at(token, expected, Utc::now())
    }

    /// Verify a token against the clock reading `now`
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> Result<UserId, TokenError> {
        // Expiry is checked below against `now`, not the wall clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<RawClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidToken,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;
        let claims = data.claims;

        let sub = claims
            .sub
            .ok_or_else(|| TokenError::Malformed("missing 'sub' claim".to_string()))?;
        let exp = claims
            .exp
            .ok_or_else(|| TokenError::Malformed("missing 'exp' claim".to_string()))?;
        let token_type = claims
            .token_type
            .ok_or_else(|| TokenError::Malformed("missing 'type' claim".to_string()))?;
        let user_id: UserId = sub
            .parse()
            .map_err(|_| TokenError::Malformed(format!("non-numeric subject '{}'", sub)))?;

        if exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        if token_type != expected.as_str() {
            return Err(TokenError::WrongType);
        }

        Ok(user_id)
    }
}
