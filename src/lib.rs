//! Ezyr - SaaS integration gateway
//!
//! A thin HTTP layer that lets a front-end trigger CRUD-style operations
//! against third-party SaaS APIs (Google Sheets, Gmail, Airtable) through a
//! single generic endpoint, with OAuth2 tokens held in memory and refreshed
//! on demand.
//!
//! # Architecture
//!
//! - **Blocks**: named integration targets resolved through a static
//!   registry; each operation is either a declarative REST template or an
//!   imperative handler (see [`block`]).
//! - **Token middleware**: extracts bearer/refresh tokens from headers or
//!   body, refreshes expiring access tokens via the OAuth2 refresh-token
//!   grant, and advertises new tokens via response headers (see [`auth`]).
//! - **Direct endpoints**: per-service Sheets CRUD and Gmail search routes
//!   sharing one code path with the imperative block handlers (see [`http`]
//!   and [`google`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use ezyr::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     ezyr::http::start_server(config).await?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod constants;
pub mod error;
pub mod model;

// Execution components
pub mod block;
pub mod google;

// Infrastructure
pub mod auth;
pub mod config;

// Interface layer
pub mod http;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use error::{EzyrError, Result};
pub use model::{Credentials, TokenData};

/// Initialize logging for the application
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ezyr=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
