//! Route classification.
//!
//! Every request path maps to exactly one [`RenderMode`]. Classification is
//! a pure function of the path and the content tree, checked in a fixed
//! order where the first match wins:
//!
//! 1. slug ends with `slides` -> [`RenderMode::Slides`]
//! 2. slug ends with `playgrounds` -> [`RenderMode::Playground`]
//! 3. slug resolves in the tree -> [`RenderMode::Content`]
//! 4. otherwise -> [`RenderMode::NotFound`]

use std::fmt;

use crate::tree::{ContentNode, ContentTree};

const SLIDES_SUFFIX: &str = "slides";
const PLAYGROUNDS_SUFFIX: &str = "playgrounds";

/// Request route derived from a URL path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route<'p> {
    slug: &'p str,
}

impl<'p> Route<'p> {
    /// Strip the leading separator from `path`.
    #[must_use]
    pub fn from_path(path: &'p str) -> Self {
        Self {
            slug: path.strip_prefix('/').unwrap_or(path),
        }
    }

    /// Slug without leading separator ("" for the root).
    #[must_use]
    pub fn slug(&self) -> &'p str {
        self.slug
    }
}

/// How a route is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode<'t> {
    /// Slide deck: slides theme, no chrome.
    Slides,
    /// Interactive playground: default theme, no chrome.
    Playground,
    /// Guidebook page backed by a content node.
    Content(&'t ContentNode),
    /// No content node matches.
    NotFound,
}

impl RenderMode<'_> {
    /// Variant without payload.
    #[must_use]
    pub fn kind(&self) -> RenderKind {
        match self {
            Self::Slides => RenderKind::Slides,
            Self::Playground => RenderKind::Playground,
            Self::Content(_) => RenderKind::Content,
            Self::NotFound => RenderKind::NotFound,
        }
    }
}

/// Payload-free [`RenderMode`] tag, for logging and plans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderKind {
    Slides,
    Playground,
    Content,
    NotFound,
}

impl RenderKind {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slides => "slides",
            Self::Playground => "playground",
            Self::Content => "content",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for RenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a request path against the content tree.
///
/// Total and side-effect free: a missing node yields
/// [`RenderMode::NotFound`], never an error.
#[must_use]
pub fn classify<'t>(path: &str, tree: &'t ContentTree) -> RenderMode<'t> {
    let slug = Route::from_path(path).slug();

    if slug.ends_with(SLIDES_SUFFIX) {
        return RenderMode::Slides;
    }

    if slug.ends_with(PLAYGROUNDS_SUFFIX) {
        return RenderMode::Playground;
    }

    match tree.find_node_by_slug(slug) {
        Some(node) => RenderMode::Content(node),
        None => RenderMode::NotFound,
    }
}
