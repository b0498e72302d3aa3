/**
 * Server Configuration
 *
 * `Settings` is read from the environment once at startup (after
 * `dotenv::dotenv()` in the binary). Every value has a default, so an empty
 * environment gives a working development server backed by in-memory
 * stores.
 *
 * # Environment Variables
 *
 * | variable | default |
 * |----------|---------|
 * | `PROJECT_NAME` | `Tasket` |
 * | `API_V1_STR` | `/api/v1` |
 * | `SECRET_KEY` | development key (logged as a warning) |
 * | `ACCESS_TOKEN_EXPIRE_MINUTES` | `11520` (8 days) |
 * | `REFRESH_TOKEN_EXPIRE_DAYS` | `30` |
 * | `DATABASE_URL` | unset: in-memory stores |
 * | `ALLOWED_HOSTS` | `http://localhost:3000,http://localhost:8000` |
 * | `HOST` / `PORT` | `0.0.0.0` / `8000` |
 * | `PUBLIC_PATHS` | the built-in exemption list |
 * | `OAUTH_EXCHANGE_SECRET` | unset: the OAuth endpoints refuse every call |
 * | `LOG_LEVEL` | `info` |
 *
 * Malformed numbers are logged and replaced by the default; configuration
 * never stops the server from starting.
 */

use std::fmt;

use chrono::Duration;
use sqlx::PgPool;

use crate::backend::middleware::PublicPaths;

/// Signing key used when `SECRET_KEY` is unset. Never use in production.
pub const DEV_SECRET_KEY: &str = "tasket-development-secret-change-me";

pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 8;
pub const DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS: i64 = 30;
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone)]
pub struct Settings {
    pub project_name: String,
    pub api_v1_str: String,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    pub database_url: Option<String>,
    /// CORS origins
    pub allowed_hosts: Vec<String>,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub public_paths: PublicPaths,
    /// Shared with the frontend server; required by the OAuth endpoints
    pub oauth_exchange_secret: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let api_v1_str = "/api/v1".to_string();
        Self {
            project_name: "Tasket".to_string(),
            public_paths: PublicPaths::defaults(&api_v1_str),
            api_v1_str,
            secret_key: DEV_SECRET_KEY.to_string(),
            access_token_expire_minutes: DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            refresh_token_expire_days: DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS,
            database_url: None,
            allowed_hosts: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8000".to_string(),
            ],
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            oauth_exchange_secret: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("project_name", &self.project_name)
            .field("api_v1_str", &self.api_v1_str)
            .field("secret_key", &"<redacted>")
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("refresh_token_expire_days", &self.refresh_token_expire_days)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("allowed_hosts", &self.allowed_hosts)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("public_paths", &self.public_paths)
            .field(
                "oauth_exchange_secret",
                &self.oauth_exchange_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let api_v1_str = get("API_V1_STR").unwrap_or(defaults.api_v1_str);

        let secret_key = get("SECRET_KEY").unwrap_or_else(|| {
            tracing::warn!("SECRET_KEY not set, using the development key");
            defaults.secret_key
        });

        let public_paths = match get("PUBLIC_PATHS") {
            Some(raw) => PublicPaths::new(split_list(&raw)),
            None => PublicPaths::defaults(&api_v1_str),
        };

        Self {
            project_name: get("PROJECT_NAME").unwrap_or(defaults.project_name),
            secret_key,
            access_token_expire_minutes: parse_or(
                get("ACCESS_TOKEN_EXPIRE_MINUTES"),
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                defaults.access_token_expire_minutes,
            ),
            refresh_token_expire_days: parse_or(
                get("REFRESH_TOKEN_EXPIRE_DAYS"),
                "REFRESH_TOKEN_EXPIRE_DAYS",
                defaults.refresh_token_expire_days,
            ),
            database_url: get("DATABASE_URL"),
            allowed_hosts: get("ALLOWED_HOSTS")
                .map(|raw| split_list(&raw))
                .unwrap_or(defaults.allowed_hosts),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(get("PORT"), "PORT", defaults.port),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            public_paths,
            oauth_exchange_secret: get("OAUTH_EXCHANGE_SECRET"),
            api_v1_str,
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expire_minutes)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expire_days)
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + fmt::Display + Copy,
{
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} value {:?}, using {}", key, raw, default);
            default
        }),
    }
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if no URL is configured or the connection fails
///
/// A failed migration is logged and the pool is still returned.
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Using in-memory stores.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to in-memory stores.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
