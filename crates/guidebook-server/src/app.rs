//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `public_dir` - Directory served under `/public`
pub(crate) fn create_router(state: Arc<AppState>, public_dir: &Path) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/search", get(handlers::search::search_pages))
        .route("/api/search/", get(handlers::search::search_root_text_match))
        .route("/api/search/{*slug}", get(handlers::search::search_text_match));

    // Everything else goes through the dispatcher
    Router::new()
        .merge(api_routes)
        .merge(static_files::static_router(public_dir))
        .fallback(handlers::pages::serve_route)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
