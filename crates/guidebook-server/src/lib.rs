//! HTTP server and static build for Guidebook.
//!
//! This crate serves a loaded [`Site`] with axum:
//! - every page path is classified and rendered in its shell (slides,
//!   playground, content page, or not-found view)
//! - JSON endpoints for navigation and search
//! - the public directory under `/public`
//!
//! [`StaticSiteBuilder`] renders the same shells to HTML files instead.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use guidebook_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: PathBuf::from("pages"),
//!         version: "1.0.0".to_owned(),
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
//! Browser ──HTTP──► axum router (guidebook-server)
//!                        │
//!                        ├─► /api/navigation, /api/search ──► Site (tree + index)
//!                        │
//!                        ├─► /public/* ──► tower-http ServeDir
//!                        │
//!                        └─► fallback ──► classify ──► ShellPlan ──► HTML
//!                                              │
//!                                              └─► AnalyticsSession
//! ```

mod analytics;
mod app;
mod build;
mod error;
mod handlers;
mod middleware;
mod shell;
mod state;
mod static_files;
mod theme;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use guidebook_markup::{MarkupRenderer, site_components};
use guidebook_site::Site;
use state::AppState;

pub use analytics::{AnalyticsClient, AnalyticsSession, ExecutionContext, TracingClient};
pub use build::{BuildError, BuildReport, StaticSiteBuilder};
pub use error::ServerError;
pub use shell::{
    Frame, GithubLink, RenderedRoute, SEARCH_PAGES_ENDPOINT, SEARCH_TEXT_MATCH_ENDPOINT,
    ShellPlan, SiteChrome, render_not_found, render_route,
};
pub use theme::{DEFAULT_THEME, SLIDES_THEME, Theme};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the markdown pages.
    pub source_dir: PathBuf,
    /// Directory served under `/public`.
    pub public_dir: PathBuf,
    /// Branding for the page frame.
    pub chrome: SiteChrome,
    /// Analytics tracking id (`None` disables analytics).
    pub tracking_id: Option<String>,
    /// Enable verbose output.
    pub verbose: bool,
    /// Application version (for `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("pages"),
            public_dir: PathBuf::from("public"),
            chrome: SiteChrome::default(),
            tracking_id: None,
            verbose: false,
            version: String::new(),
        }
    }
}

/// Load the site under `source_dir` with the site component table.
///
/// # Errors
///
/// Returns an error if the component table is invalid or content fails to
/// load.
pub fn load_site(source_dir: &Path) -> Result<Site, ServerError> {
    let renderer = MarkupRenderer::new(Arc::new(site_components()?));
    Ok(Site::load(source_dir, renderer)?)
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if content fails to load or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let site = load_site(&config.source_dir)?;

    let analytics = AnalyticsSession::register(
        ExecutionContext::Interactive,
        Arc::new(TracingClient::new()),
        config.tracking_id.as_deref(),
    );

    // Create app state
    let state = Arc::new(AppState {
        site,
        chrome: config.chrome,
        analytics,
        verbose: config.verbose,
        version: config.version,
        loaded_at: Utc::now(),
    });

    // Create router
    let app = app::create_router(state, &config.public_dir);

    // Bind and run server
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        // Keep serving; the process can still be stopped externally
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Guidebook config.
///
/// # Arguments
///
/// * `config` - Guidebook configuration
/// * `version` - Application version
/// * `verbose` - Enable verbose output
#[must_use]
pub fn server_config_from_config(
    config: &guidebook_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs_resolved.source_dir.clone(),
        public_dir: config.docs_resolved.public_dir.clone(),
        chrome: SiteChrome::from_config(config),
        tracking_id: config.analytics.tracking_id.clone(),
        verbose,
        version,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use guidebook_config::Config;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let mut config = Config::default();
        config.server.port = 9000;
        config.analytics.tracking_id = Some("UA-1".to_owned());

        let server = server_config_from_config(&config, "1.2.3".to_owned(), true);

        assert_eq!(server.port, 9000);
        assert_eq!(server.tracking_id.as_deref(), Some("UA-1"));
        assert_eq!(server.version, "1.2.3");
        assert!(server.verbose);
        assert!(server.source_dir.ends_with("pages"));
        assert_eq!(server.chrome.title, "Guidebook");
    }

    #[test]
    fn test_load_site() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.md"), "# Home\n").unwrap();

        let site = load_site(dir.path()).unwrap();
        assert_eq!(site.tree().len(), 1);
    }

    #[test]
    fn test_load_site_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_site(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ServerError::Site(_)));
    }
}
