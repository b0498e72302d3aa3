/**
 * User Model and Database Operations
 *
 * User and OAuth account records plus the PostgreSQL queries behind
 * `PgStore`'s `UserStore` implementation.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::shared::UserId;

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct User {
    pub id: UserId,
    /// Unique, case-sensitive
    pub email: String,
    /// Unique
    pub username: String,
    pub full_name: Option<String>,
    /// bcrypt hash; `None` for accounts created through OAuth
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Fields needed to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub hashed_password: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub avatar_url: Option<String>,
}

/// A provider identity linked to a local user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct OAuthAccount {
    pub id: i64,
    /// Provider name, e.g. `github` or `google`
    pub oauth_name: String,
    /// Provider-side account id
    pub account_id: String,
    pub account_email: Option<String>,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct NewOAuthAccount {
    pub oauth_name: String,
    pub account_id: String,
    pub account_email: Option<String>,
    pub user_id: UserId,
}

const USER_COLUMNS: &str = "id, email, username, full_name, hashed_password, is_active, \
                            is_verified, avatar_url, created_at, last_login";

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, id: UserId) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get user by email
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Check whether a username is taken
pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await
}

/// Create a new user
///
/// # Returns
/// The inserted row, or a unique-violation error if email or username is taken
pub async fn create_user(pool: &PgPool, user: NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email, username, full_name, hashed_password, is_active, is_verified, avatar_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.full_name)
    .bind(&user.hashed_password)
    .bind(user.is_active)
    .bind(user.is_verified)
    .bind(&user.avatar_url)
    .fetch_one(pool)
    .await
}

/// Overwrite full name and avatar
pub async fn update_profile(
    pool: &PgPool,
    id: UserId,
    full_name: Option<String>,
    avatar_url: Option<String>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET full_name = $2, avatar_url = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(id)
    .bind(full_name)
    .bind(avatar_url)
    .fetch_one(pool)
    .await
}

/// Stamp `last_login`
pub async fn record_login(pool: &PgPool, id: UserId) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Find a linked provider account
pub async fn find_oauth_account(
    pool: &PgPool,
    oauth_name: &str,
    account_id: &str,
) -> Result<Option<OAuthAccount>, sqlx::Error> {
    sqlx::query_as::<_, OAuthAccount>(
        r#"
        SELECT id, oauth_name, account_id, account_email, user_id
        FROM oauth_accounts
        WHERE oauth_name = $1 AND account_id = $2
        "#,
    )
    .bind(oauth_name)
    .bind(account_id)
    .fetch_optional(pool)
    .await
}

/// Link a provider account to a user
pub async fn create_oauth_account(
    pool: &PgPool,
    account: NewOAuthAccount,
) -> Result<OAuthAccount, sqlx::Error> {
    sqlx::query_as::<_, OAuthAccount>(
        r#"
        INSERT INTO oauth_accounts (oauth_name, account_id, account_email, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, oauth_name, account_id, account_email, user_id
        "#,
    )
    .bind(&account.oauth_name)
    .bind(&account.account_id)
    .bind(&account.account_email)
    .bind(account.user_id)
    .fetch_one(pool)
    .await
}
