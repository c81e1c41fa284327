//! Loaded guidebook: content tree, page sources, search index, and renderer.

use std::collections::HashMap;
use std::path::Path;

use guidebook_markup::{MarkupRenderer, RenderResult};

use crate::loader::{SiteError, load_content};
use crate::route::{RenderMode, classify};
use crate::search::SearchIndex;
use crate::tree::ContentTree;

/// Everything a host needs to answer a route.
///
/// Built once at startup and shared behind an `Arc`; all methods take
/// `&self`.
#[derive(Debug)]
pub struct Site {
    tree: ContentTree,
    sources: HashMap<String, String>,
    search: SearchIndex,
    renderer: MarkupRenderer,
}

impl Site {
    /// Load every page under `source_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing, a page can't be read,
    /// or a page has malformed front matter.
    pub fn load(source_dir: &Path, renderer: MarkupRenderer) -> Result<Self, SiteError> {
        let content = load_content(source_dir, &renderer)?;
        let search = SearchIndex::build(&content.tree, &content.texts);
        Ok(Self {
            tree: content.tree,
            sources: content.sources,
            search,
            renderer,
        })
    }

    /// Assemble a site from an already built tree and page sources keyed by
    /// slug. Sources are rendered once to build the search index.
    #[must_use]
    pub fn new(
        tree: ContentTree,
        sources: HashMap<String, String>,
        renderer: MarkupRenderer,
    ) -> Self {
        let texts: HashMap<String, String> = sources
            .iter()
            .map(|(slug, source)| (slug.clone(), renderer.render(source).text))
            .collect();
        let search = SearchIndex::build(&tree, &texts);
        Self {
            tree,
            sources,
            search,
            renderer,
        }
    }

    /// Content tree.
    #[must_use]
    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    /// Search index over every page.
    #[must_use]
    pub fn search(&self) -> &SearchIndex {
        &self.search
    }

    /// Markup renderer.
    #[must_use]
    pub fn renderer(&self) -> &MarkupRenderer {
        &self.renderer
    }

    /// Raw markdown backing `slug`, if the site has a page for it.
    #[must_use]
    pub fn source(&self, slug: &str) -> Option<&str> {
        self.sources.get(slug).map(String::as_str)
    }

    /// Render the page backing `slug`.
    #[must_use]
    pub fn render(&self, slug: &str) -> Option<RenderResult> {
        self.source(slug).map(|source| self.renderer.render(source))
    }

    /// Render the slide deck backing `slug`.
    #[must_use]
    pub fn render_slides(&self, slug: &str) -> Option<Vec<RenderResult>> {
        self.source(slug)
            .map(|source| self.renderer.render_slides(source))
    }

    /// Classify a request path against this site's tree.
    #[must_use]
    pub fn classify(&self, path: &str) -> RenderMode<'_> {
        classify(path, &self.tree)
    }

    /// Slugs of every page with a source, sorted.
    #[must_use]
    pub fn slugs(&self) -> Vec<&str> {
        let mut slugs: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        slugs.sort_unstable();
        slugs
    }
}
