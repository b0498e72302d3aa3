//! Server Module
//!
//! Configuration, application state and app assembly.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - Settings from the environment, database loading
//! ├── state.rs        - AppState and FromRef implementations
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `Settings::from_env()`
//! 2. **Storage**: PostgreSQL pool with migrations, or in-memory stores
//! 3. **State Creation**: services wired into `AppState`
//! 4. **Router Creation**: routes, auth gate, CORS and tracing layers
//!
//! # Example
//!
//! ```rust,no_run
//! use tasket::backend::server::{create_app, Settings};
//!
//! # async fn example() -> std::io::Result<()> {
//! let settings = Settings::from_env();
//! let addr = settings.bind_address();
//! let app = create_app(settings).await;
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::Settings;
pub use init::{build_app, create_app};
pub use state::AppState;
