//! Content tree, route classification, and search for Guidebook.
//!
//! This crate provides:
//! - [`Site`]: loaded pages with their tree, search index, and renderer
//! - [`classify`]: maps a request path to exactly one [`RenderMode`]
//! - [`SearchIndex`]: page search and in-page text matching
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::sync::Arc;
//! use guidebook_markup::{MarkupRenderer, site_components};
//! use guidebook_site::{RenderMode, Site};
//!
//! let renderer = MarkupRenderer::new(Arc::new(site_components()?));
//! let site = Site::load(Path::new("pages"), renderer)?;
//!
//! match site.classify("/guides/intro") {
//!     RenderMode::Content(node) => println!("page: {}", node.title),
//!     other => println!("{}", other.kind()),
//! }
//! # Ok(())
//! # }
//! ```

mod loader;
mod route;
mod search;
mod site;
mod tree;

pub use loader::SiteError;
pub use route::{RenderKind, RenderMode, Route, classify};
pub use search::{SearchHit, SearchIndex, TextMatch};
pub use site::Site;
pub use tree::{BreadcrumbItem, ContentNode, ContentTree, ContentTreeBuilder, NavItem};
