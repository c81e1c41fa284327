//! Static site builder.
//!
//! Renders every page of a [`Site`] to `<out>/<slug>/index.html` plus a
//! top-level `404.html`, and copies the public directory to `<out>/public`.
//! Rendering happens in the prerender execution context, so analytics is
//! registered but inert.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use guidebook_site::{RenderKind, Site};

use crate::analytics::{AnalyticsClient, AnalyticsSession, ExecutionContext, TracingClient};
use crate::shell::{SiteChrome, render_not_found, render_route};

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a finished build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of HTML files written, `404.html` included.
    pub pages_written: usize,
    /// Slugs that rendered the not-found shell.
    pub not_found: Vec<String>,
    /// Number of public files copied.
    pub public_files: usize,
}

/// Builds a static guidebook from a loaded [`Site`].
pub struct StaticSiteBuilder {
    site: Arc<Site>,
    chrome: SiteChrome,
    public_dir: Option<PathBuf>,
    client: Arc<dyn AnalyticsClient>,
    tracking_id: Option<String>,
}

impl StaticSiteBuilder {
    /// Create a builder for `site`.
    #[must_use]
    pub fn new(site: Arc<Site>, chrome: SiteChrome) -> Self {
        Self {
            site,
            chrome,
            public_dir: None,
            client: Arc::new(TracingClient::new()),
            tracking_id: None,
        }
    }

    /// Copy this directory to `<out>/public`.
    #[must_use]
    pub fn with_public_dir(mut self, public_dir: PathBuf) -> Self {
        self.public_dir = Some(public_dir);
        self
    }

    /// Analytics client and tracking id to register in the prerender
    /// context.
    #[must_use]
    pub fn with_analytics(mut self, client: Arc<dyn AnalyticsClient>, tracking_id: Option<String>) -> Self {
        self.client = client;
        self.tracking_id = tracking_id;
        self
    }

    /// Render every page into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file can't be written.
    pub fn build(&self, output_dir: &Path) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let analytics = AnalyticsSession::register(
            ExecutionContext::Prerender,
            Arc::clone(&self.client),
            self.tracking_id.as_deref(),
        );

        let mut report = BuildReport::default();

        for node in self.site.tree().nodes() {
            let path = node.url_path();
            let route = render_route(&self.site, &self.chrome, &path);
            for warning in &route.warnings {
                tracing::warn!(slug = %node.slug, warning = %warning, "Page render warning");
            }
            if route.kind == RenderKind::NotFound {
                report.not_found.push(node.slug.clone());
            }

            let file = page_file(output_dir, &node.slug);
            write_file(&file, &route.html)?;
            analytics.route_change_complete(&path);
            report.pages_written += 1;
            tracing::debug!(slug = %node.slug, mode = %route.kind, "Page written");
        }

        let not_found = render_not_found(&self.chrome);
        write_file(&output_dir.join("404.html"), &not_found.html)?;
        report.pages_written += 1;

        if let Some(public_dir) = &self.public_dir
            && public_dir.is_dir()
        {
            report.public_files = copy_dir(public_dir, &output_dir.join("public"))?;
        }

        tracing::info!(
            pages = report.pages_written,
            public_files = report.public_files,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Static build finished"
        );
        Ok(report)
    }
}

/// Output file for a slug (`""` -> `index.html`, `a/b` -> `a/b/index.html`).
fn page_file(output_dir: &Path, slug: &str) -> PathBuf {
    if slug.is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(slug).join("index.html")
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    let io_err = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}

/// Recursively copy `from` into `to`, skipping hidden entries.
fn copy_dir(from: &Path, to: &Path) -> Result<usize, BuildError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| BuildError::Io { path, source }
    };

    fs::create_dir_all(to).map_err(io_err(to))?;
    let mut copied = 0;
    for entry in fs::read_dir(from).map_err(io_err(from))? {
        let entry = entry.map_err(io_err(from))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let src = entry.path();
        let dest = to.join(entry.file_name());
        if src.is_dir() {
            copied += copy_dir(&src, &dest)?;
        } else {
            fs::copy(&src, &dest).map_err(io_err(&dest))?;
            copied += 1;
        }
    }
    Ok(copied)
}
