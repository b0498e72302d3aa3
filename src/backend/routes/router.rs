/**
 * Router Configuration
 *
 * Combines all routes into one Axum router and applies the layers.
 *
 * # Layers (outermost first)
 *
 * 1. `TraceLayer` - one span per HTTP request
 * 2. `CorsLayer` - origins from `ALLOWED_HOSTS`, credentials allowed; a `*`
 *    entry mirrors the request origin, since credentials rule out a literal `*`
 * 3. Auth gate - `auth_middleware`, exemptions from `Settings::public_paths`
 *
 * CORS sits outside the gate so preflights and 401s both carry the CORS
 * headers.
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::Settings;
use crate::backend::server::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    let router = configure_api_routes(router, &app_state.settings.api_v1_str);

    let cors = cors_layer(&app_state.settings);

    router
        .fallback(|| async { crate::backend::error::BackendError::not_found("Not Found") })
        .layer(from_fn_with_state(app_state.clone(), auth_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Tasket API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

fn allowed_origins(hosts: &[String]) -> AllowOrigin {
    if hosts.iter().any(|origin| origin == "*") {
        tracing::warn!("ALLOWED_HOSTS contains '*': every origin is allowed");
        return AllowOrigin::mirror_request();
    }

    let origins: Vec<HeaderValue> = hosts
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(&settings.allowed_hosts))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
