//! Static file serving.
//!
//! Serves the configured public directory (logo, images) under `/public`.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// URL prefix for public files.
pub(crate) const PUBLIC_PREFIX: &str = "/public";

/// Create router for public files.
///
/// Returns an empty router when `public_dir` does not exist.
pub(crate) fn static_router(public_dir: &Path) -> Router<Arc<AppState>> {
    if !public_dir.is_dir() {
        tracing::debug!(dir = %public_dir.display(), "Public directory not found, skipping");
        return Router::new();
    }
    Router::new().nest_service(PUBLIC_PREFIX, ServeDir::new(public_dir))
}
