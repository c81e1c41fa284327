//! Application state.
//!
//! Shared state for all request handlers.

use chrono::{DateTime, Utc};
use guidebook_site::Site;

use crate::analytics::AnalyticsSession;
use crate::shell::SiteChrome;

/// Application state shared across all handlers.
#[derive(Debug)]
pub(crate) struct AppState {
    /// Loaded pages, tree, and search index.
    pub(crate) site: Site,
    /// Branding for the page frame.
    pub(crate) chrome: SiteChrome,
    /// Analytics registered at startup.
    pub(crate) analytics: AnalyticsSession,
    /// Enable verbose output (show warnings).
    pub(crate) verbose: bool,
    /// Application version for cache invalidation.
    pub(crate) version: String,
    /// When content was loaded; used as `Last-Modified`.
    pub(crate) loaded_at: DateTime<Utc>,
}
