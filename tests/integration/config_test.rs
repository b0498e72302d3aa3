//! Environment-driven configuration
//!
//! These tests mutate the process environment and run serially.

use serial_test::serial;
use tasket::backend::server::Settings;

const KEYS: [&str; 5] = [
    "SECRET_KEY",
    "PORT",
    "ACCESS_TOKEN_EXPIRE_MINUTES",
    "PUBLIC_PATHS",
    "DATABASE_URL",
];

fn clear() {
    for key in KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_reads_overrides() {
    clear();
    std::env::set_var("SECRET_KEY", "from-env");
    std::env::set_var("PORT", "9100");
    std::env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "30");

    let settings = Settings::from_env();
    clear();

    assert_eq!(settings.secret_key, "from-env");
    assert_eq!(settings.port, 9100);
    assert_eq!(settings.access_token_ttl(), chrono::Duration::minutes(30));
    assert_eq!(settings.bind_address(), format!("{}:9100", settings.host));
}

#[test]
#[serial]
fn test_from_env_bad_port_falls_back() {
    clear();
    std::env::set_var("PORT", "not-a-port");

    let settings = Settings::from_env();
    clear();

    assert_eq!(settings.port, 8000);
}

#[test]
#[serial]
fn test_public_paths_override() {
    clear();
    std::env::set_var("PUBLIC_PATHS", "/health,/metrics");

    let settings = Settings::from_env();
    clear();

    assert!(settings.public_paths.is_public("/metrics"));
    assert!(!settings.public_paths.is_public("/"));
}

#[tokio::test]
#[serial]
async fn test_app_starts_without_database() {
    clear();
    let app = tasket::backend::create_app(Settings::from_env()).await;
    drop(app);
}
