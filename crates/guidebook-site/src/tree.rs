//! Content tree for the guidebook.
//!
//! Nodes are stored in a flat `Vec<ContentNode>` with parent/children
//! relationships tracked by indices. This provides:
//! - O(1) slug lookups via `slug_index` `HashMap`
//! - O(d) breadcrumb building where d is the node depth
//!
//! The tree is built once with [`ContentTreeBuilder`] and never mutated
//! afterwards; share it behind an `Arc`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

use serde::Serialize;

/// One page of the guidebook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContentNode {
    /// Path-like identifier without leading slash ("" for the root).
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Source file relative to the content directory, if the node was loaded
    /// from disk.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl ContentNode {
    /// URL path with leading slash.
    #[must_use]
    pub fn url_path(&self) -> String {
        format!("/{}", self.slug)
    }
}

/// Navigation item with children for the page chrome sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Link target path (with leading slash).
    pub path: String,
    /// Child navigation items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: String,
    /// Link target path (with leading slash).
    pub path: String,
}

/// Immutable hierarchy of [`ContentNode`]s.
#[derive(Debug, Default)]
pub struct ContentTree {
    nodes: Vec<ContentNode>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    slug_index: HashMap<String, usize>,
}

impl ContentTree {
    /// Resolve a slug to its node.
    ///
    /// # Arguments
    ///
    /// * `slug` - Path without leading slash (e.g., "guides/intro", "" for root)
    #[must_use]
    pub fn find_node_by_slug(&self, slug: &str) -> Option<&ContentNode> {
        self.slug_index.get(slug).map(|&i| &self.nodes[i])
    }

    /// Root node (slug `""`), if the content directory has an `index.md`.
    #[must_use]
    pub fn root(&self) -> Option<&ContentNode> {
        self.find_node_by_slug("")
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ContentNode> {
        self.nodes.iter()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of a node.
    ///
    /// For `""` without a root node, returns the top-level nodes.
    #[must_use]
    pub fn children(&self, slug: &str) -> Vec<&ContentNode> {
        match self.slug_index.get(slug) {
            Some(&idx) => self.children[idx].iter().map(|&i| &self.nodes[i]).collect(),
            None if slug.is_empty() => self.roots.iter().map(|&i| &self.nodes[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Parent of a node, if any.
    #[must_use]
    pub fn parent(&self, slug: &str) -> Option<&ContentNode> {
        let idx = *self.slug_index.get(slug)?;
        self.parents[idx].map(|p| &self.nodes[p])
    }

    /// Navigation tree below the root.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        self.children("")
            .into_iter()
            .map(|node| self.build_nav_item(node))
            .collect()
    }

    fn build_nav_item(&self, node: &ContentNode) -> NavItem {
        NavItem {
            title: node.title.clone(),
            path: node.url_path(),
            children: self
                .children(&node.slug)
                .into_iter()
                .map(|child| self.build_nav_item(child))
                .collect(),
        }
    }

    /// Build breadcrumbs for a slug.
    ///
    /// Returns `Home` followed by the ancestors of the node. The node itself
    /// is not included. Unknown slugs get just `Home`; the root gets nothing.
    #[must_use]
    pub fn breadcrumbs(&self, slug: &str) -> Vec<BreadcrumbItem> {
        if slug.is_empty() {
            return Vec::new();
        }

        let home = BreadcrumbItem {
            title: "Home".to_owned(),
            path: "/".to_owned(),
        };

        let Some(&idx) = self.slug_index.get(slug) else {
            return vec![home];
        };

        let mut ancestors = Vec::new();
        let mut current = self.parents[idx];
        while let Some(i) = current {
            ancestors.push(&self.nodes[i]);
            current = self.parents[i];
        }
        ancestors.reverse();

        let mut breadcrumbs = vec![home];
        // Root is already represented by Home
        breadcrumbs.extend(
            ancestors
                .into_iter()
                .filter(|node| !node.slug.is_empty())
                .map(|node| BreadcrumbItem {
                    title: node.title.clone(),
                    path: node.url_path(),
                }),
        );
        breadcrumbs
    }
}

/// Builder for [`ContentTree`].
#[derive(Default)]
pub struct ContentTreeBuilder {
    tree: ContentTree,
}

impl ContentTreeBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its index.
    ///
    /// Slugs are unique: adding a slug that is already present keeps the
    /// first node and returns its index. `parent` must be an index returned
    /// earlier by this builder.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a valid index.
    pub fn add_node(
        &mut self,
        title: impl Into<String>,
        slug: impl Into<String>,
        source_path: Option<PathBuf>,
        parent: Option<usize>,
    ) -> usize {
        let tree = &mut self.tree;
        let idx = tree.nodes.len();
        let slug = slug.into();

        match tree.slug_index.entry(slug.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(idx);
            }
            Entry::Occupied(entry) => {
                tracing::warn!(slug = %slug, "Duplicate slug in content tree");
                return *entry.get();
            }
        }

        tree.nodes.push(ContentNode {
            slug,
            title: title.into(),
            source_path,
        });
        tree.children.push(Vec::new());
        tree.parents.push(parent);

        match parent {
            Some(p) => tree.children[p].push(idx),
            None => tree.roots.push(idx),
        }

        idx
    }

    /// Index of an already added slug.
    #[must_use]
    pub fn index_of(&self, slug: &str) -> Option<usize> {
        self.tree.slug_index.get(slug).copied()
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ContentTree {
        self.tree
    }
}
