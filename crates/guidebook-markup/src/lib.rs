//! Markdown rendering with component overrides for Guidebook.
//!
//! Pages are CommonMark documents that may contain container blocks:
//!
//! ````text
//! :::Example{title="Counter"}
//! ```jsx
//! <Counter />
//! ```
//! :::
//! ````
//!
//! Each block name is resolved through a [`ComponentMap`], a validated
//! table from element name to [`Component`]. Markdown between blocks is
//! rendered with pulldown-cmark.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use guidebook_markup::{MarkupRenderer, site_components};
//!
//! let components = Arc::new(site_components().unwrap());
//! let result = MarkupRenderer::new(components).render("# Hello\n\n:::Note\nHi\n:::\n");
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert!(result.html.contains("callout-note"));
//! ```

mod components;
mod escape;
mod parser;
mod renderer;

pub use components::{
    Component, ComponentError, ComponentMap, ComponentMapBuilder, ComponentProps,
    page_components, site_components,
};
pub use escape::escape_html;
pub use renderer::{MarkupRenderer, RenderResult, split_front_matter};
