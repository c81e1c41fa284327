//! Analytics registration.
//!
//! [`AnalyticsSession`] is created once by the entry point and handed to
//! navigation handlers through shared state. Whether it does anything is
//! decided at registration from the [`ExecutionContext`]:
//!
//! - `Interactive`: the client is initialized with the tracking id, one page
//!   view is recorded immediately, and every completed navigation records
//!   another.
//! - `Prerender`: the session is inert and the client is never called.
//!
//! There is no teardown.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Path recorded for the initial page view.
const INITIAL_PATH: &str = "/";

/// Where the code is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Live server answering navigations.
    Interactive,
    /// Static rendering with no visitor.
    Prerender,
}

/// Analytics provider.
pub trait AnalyticsClient: Send + Sync {
    /// Set the client up for `tracking_id`. Called at most once.
    fn initialize(&self, tracking_id: &str);

    /// Record a view of `path`.
    fn track_page_view(&self, path: &str);
}

/// Client that records page views as `tracing` events.
///
/// Events use the `guidebook::analytics` target so they can be filtered
/// separately with `RUST_LOG`.
#[derive(Debug, Default)]
pub struct TracingClient {
    initialized: AtomicBool,
    page_views: AtomicUsize,
}

impl TracingClient {
    /// Create a client with no recorded views.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`AnalyticsClient::initialize`] has been called.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Number of page views recorded so far.
    #[must_use]
    pub fn page_views(&self) -> usize {
        self.page_views.load(Ordering::Relaxed)
    }
}

impl AnalyticsClient for TracingClient {
    fn initialize(&self, tracking_id: &str) {
        self.initialized.store(true, Ordering::Release);
        tracing::info!(target: "guidebook::analytics", tracking_id, "Analytics initialized");
    }

    fn track_page_view(&self, path: &str) {
        let count = self.page_views.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(target: "guidebook::analytics", path, count, "Page view");
    }
}

/// Registered analytics for one process.
pub struct AnalyticsSession {
    client: Option<Arc<dyn AnalyticsClient>>,
}

impl AnalyticsSession {
    /// Register analytics.
    ///
    /// In the interactive context with a tracking id, initializes `client`
    /// and records the initial page view. Otherwise the returned session is
    /// inert and `client` is dropped untouched.
    pub fn register(
        context: ExecutionContext,
        client: Arc<dyn AnalyticsClient>,
        tracking_id: Option<&str>,
    ) -> Self {
        let tracking_id = match (context, tracking_id) {
            (ExecutionContext::Interactive, Some(id)) => id,
            (ExecutionContext::Interactive, None) => {
                tracing::debug!("No tracking id, analytics disabled");
                return Self::inert();
            }
            (ExecutionContext::Prerender, _) => return Self::inert(),
        };

        client.initialize(tracking_id);
        client.track_page_view(INITIAL_PATH);
        Self {
            client: Some(client),
        }
    }

    /// Session that never records anything.
    #[must_use]
    pub fn inert() -> Self {
        Self { client: None }
    }

    /// Whether navigations are being recorded.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.client.is_some()
    }

    /// Record a completed navigation to `path`.
    pub fn route_change_complete(&self, path: &str) {
        if let Some(client) = &self.client {
            client.track_page_view(path);
        }
    }
}

impl fmt::Debug for AnalyticsSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsSession")
            .field("active", &self.is_active())
            .finish()
    }
}
