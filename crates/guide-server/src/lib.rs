//! HTTP server for repair guide pages.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - `/steps` - one repair guide, localized
//! - `/repairs` - the repair catalog
//! - Image files from the project root
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use guide_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         project_root: PathBuf::from("site"),
//!         content_dir: PathBuf::from("site/data"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (guide-server)
//!                        │
//!                        ├─► /steps, /repairs
//!                        │       │
//!                        │       ├─► guide-content (validate, resolve, load)
//!                        │       └─► guide-render (localize, escape, HTML)
//!                        │
//!                        └─► Images (contained in project root, image/* only)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use guide_content::{DEFAULT_FALLBACK_DIR, FallbackRule, Languages, default_fallbacks};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory under which all servable images live.
    pub project_root: PathBuf,
    /// Directory holding guide documents.
    pub content_dir: PathBuf,
    /// Document served when the request names none.
    pub default_document: String,
    /// Catalog document, relative to the content directory.
    pub catalog_document: String,
    /// Web path prefix the project root is served under.
    pub base_url: String,
    /// Language allow-list.
    pub languages: Languages,
    /// Image fallback rules by document name prefix.
    pub image_fallbacks: Vec<FallbackRule>,
    /// Image fallback directory when no rule matches.
    pub default_fallback: PathBuf,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            project_root: PathBuf::from("."),
            content_dir: PathBuf::from("data"),
            default_document: "DQ/DQ_5.json".to_owned(),
            catalog_document: "repairs.json".to_owned(),
            base_url: String::new(),
            languages: Languages::default(),
            image_fallbacks: default_fallbacks(),
            default_fallback: PathBuf::from(DEFAULT_FALLBACK_DIR),
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(&config));
    let app = app::create_router(state);

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        content_dir = %config.content_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from guide config.
///
/// # Arguments
///
/// * `config` - Loaded and validated configuration
/// * `version` - Application version
///
/// # Errors
///
/// Returns `ConfigError::Validation` if the language settings are inconsistent.
pub fn server_config_from_guide_config(
    config: &guide_config::Config,
    version: String,
) -> Result<ServerConfig, guide_config::ConfigError> {
    let content = &config.content_resolved;

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        project_root: content.project_root.clone(),
        content_dir: content.content_dir(),
        default_document: content.default_document.clone(),
        catalog_document: content.catalog_document.clone(),
        base_url: content.base_url.clone(),
        languages: config.languages.to_languages()?,
        image_fallbacks: config.images.rules(),
        default_fallback: PathBuf::from(&config.images.default_fallback),
        version,
    })
}
