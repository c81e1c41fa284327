//! Content loading from a directory of markdown files.
//!
//! Discovery and building are separate phases:
//! 1. [`scan`] walks the directory and returns a [`PageRef`] per page
//! 2. [`load_content`] reads each page, resolves its title and parent, and
//!    builds the [`ContentTree`]
//!
//! Layout rules:
//! - `index.md` is the page for its directory (`guides/index.md` -> `guides`)
//! - other `.md` files are leaves (`guides/setup.md` -> `guides/setup`)
//! - hidden files and directories are skipped
//! - directories without `index.md` have their pages promoted to the nearest
//!   ancestor that has one
//! - when two files map to one slug (`guides.md` and `guides/index.md`), the
//!   directory's `index.md` wins and the other file is skipped

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use guidebook_markup::{MarkupRenderer, split_front_matter};
use serde::Deserialize;

use crate::tree::{ContentTree, ContentTreeBuilder};

/// Error loading site content.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Content directory does not exist.
    #[error("Content directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Directory listing or file read failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Front matter is not valid YAML.
    #[error("Invalid front matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Location of one page source. Nothing is read during the scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PageRef {
    /// Slug without leading slash ("" for the root `index.md`).
    pub slug: String,
    /// Absolute path of the markdown file.
    pub path: PathBuf,
    /// File is a directory `index.md`.
    pub is_index: bool,
}

/// Fields read from front matter. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    title: Option<String>,
}

/// Tree plus per-page source and search text, keyed by slug.
#[derive(Debug, Default)]
pub(crate) struct LoadedContent {
    pub tree: ContentTree,
    pub sources: HashMap<String, String>,
    pub texts: HashMap<String, String>,
}

/// Walk `source_dir` and return page references sorted by slug.
///
/// Pages sharing a slug are ordered `index.md` first, then by path.
pub(crate) fn scan(source_dir: &Path) -> Result<Vec<PageRef>, SiteError> {
    if !source_dir.is_dir() {
        return Err(SiteError::SourceNotFound(source_dir.to_path_buf()));
    }
    let mut refs = Vec::new();
    scan_directory(source_dir, "", &mut refs)?;
    refs.sort_by(|a, b| {
        a.slug
            .cmp(&b.slug)
            .then(b.is_index.cmp(&a.is_index))
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(refs)
}

fn scan_directory(dir: &Path, prefix: &str, refs: &mut Vec<PageRef>) -> Result<(), SiteError> {
    let io_err = |source| SiteError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            let child_prefix = join_slug(prefix, &name);
            scan_directory(&path, &child_prefix, refs)?;
        } else if let Some(stem) = name.strip_suffix(".md") {
            let is_index = stem.eq_ignore_ascii_case("index");
            let slug = if is_index {
                prefix.to_owned()
            } else {
                join_slug(prefix, stem)
            };
            refs.push(PageRef {
                slug,
                path,
                is_index,
            });
        }
    }
    Ok(())
}

fn join_slug(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}/{segment}")
    }
}

/// Scan, read, and render every page under `source_dir`.
///
/// Markup warnings are logged, not returned.
///
/// # Errors
///
/// Returns an error if the directory is missing, a file can't be read, or a
/// page has malformed front matter.
pub(crate) fn load_content(
    source_dir: &Path,
    renderer: &MarkupRenderer,
) -> Result<LoadedContent, SiteError> {
    let start = Instant::now();
    let refs = scan(source_dir)?;

    let mut builder = ContentTreeBuilder::new();
    let mut sources = HashMap::with_capacity(refs.len());
    let mut texts = HashMap::with_capacity(refs.len());

    for page in refs {
        if builder.index_of(&page.slug).is_some() {
            tracing::warn!(
                slug = %page.slug,
                path = %page.path.display(),
                "Duplicate slug, page skipped"
            );
            continue;
        }

        let source = fs::read_to_string(&page.path).map_err(|source| SiteError::Io {
            path: page.path.clone(),
            source,
        })?;

        let (front, _) = split_front_matter(&source);
        let front = parse_front_matter(front, &page.path)?;
        let rendered = renderer.render(&source);
        for warning in &rendered.warnings {
            tracing::warn!(path = %page.path.display(), "{warning}");
        }

        let title = front
            .title
            .filter(|t| !t.trim().is_empty())
            .or(rendered.title)
            .unwrap_or_else(|| title_from_slug(&page.slug));

        let parent = nearest_ancestor(&builder, &page.slug);
        let relative = page
            .path
            .strip_prefix(source_dir)
            .map_or_else(|_| page.path.clone(), Path::to_path_buf);
        builder.add_node(title, page.slug.clone(), Some(relative), parent);

        texts.insert(page.slug.clone(), rendered.text);
        sources.insert(page.slug, source);
    }

    let tree = builder.build();
    tracing::info!(
        pages = tree.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Content loaded"
    );

    Ok(LoadedContent {
        tree,
        sources,
        texts,
    })
}

fn parse_front_matter(front: Option<&str>, path: &Path) -> Result<FrontMatter, SiteError> {
    match front.map(str::trim) {
        None | Some("") => Ok(FrontMatter::default()),
        Some(yaml) => serde_yaml::from_str(yaml).map_err(|source| SiteError::FrontMatter {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Index of the closest already-added ancestor, falling back to the root.
///
/// Pages are added in slug order, so ancestors always come first.
fn nearest_ancestor(builder: &ContentTreeBuilder, slug: &str) -> Option<usize> {
    if slug.is_empty() {
        return None;
    }
    let mut current = slug;
    while let Some((parent, _)) = current.rsplit_once('/') {
        if let Some(idx) = builder.index_of(parent) {
            return Some(idx);
        }
        current = parent;
    }
    builder.index_of("")
}

/// Title-case the last slug segment (`setup-guide` -> `Setup Guide`).
fn title_from_slug(slug: &str) -> String {
    let last = slug.rsplit_once('/').map_or(slug, |(_, last)| last);
    if last.is_empty() {
        return "Home".to_owned();
    }

    let mut title = String::with_capacity(last.len());
    for word in last.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !title.is_empty() {
            title.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            title.extend(first.to_uppercase());
            title.push_str(chars.as_str());
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use guidebook_markup::site_components;
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn renderer() -> MarkupRenderer {
        MarkupRenderer::new(Arc::new(site_components().unwrap()))
    }

    #[test]
    fn test_scan_maps_files_to_slugs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "# Home");
        write(dir.path(), "guides/index.md", "# Guides");
        write(dir.path(), "guides/setup.md", "# Setup");
        write(dir.path(), "about.md", "# About");
        write(dir.path(), "notes.txt", "ignored");

        let slugs: Vec<_> = scan(dir.path()).unwrap().into_iter().map(|r| r.slug).collect();
        assert_eq!(slugs, vec!["", "about", "guides", "guides/setup"]);
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".draft.md", "# Draft");
        write(dir.path(), ".git/HEAD.md", "# Nope");
        write(dir.path(), "page.md", "# Page");

        let refs = scan(dir.path()).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].slug, "page");
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, SiteError::SourceNotFound(_)));
    }

    #[test]
    fn test_load_titles_precedence() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "---\ntitle: From Front Matter\n---\n# From Heading\n");
        write(dir.path(), "b.md", "# From Heading\n");
        write(dir.path(), "setup-guide.md", "No heading here.\n");

        let content = load_content(dir.path(), &renderer()).unwrap();
        let title = |slug| content.tree.find_node_by_slug(slug).unwrap().title.clone();
        assert_eq!(title("a"), "From Front Matter");
        assert_eq!(title("b"), "From Heading");
        assert_eq!(title("setup-guide"), "Setup Guide");
    }

    #[test]
    fn test_load_builds_hierarchy() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "# Home\n");
        write(dir.path(), "guides/index.md", "# Guides\n");
        write(dir.path(), "guides/state.md", "# State\n");
        write(dir.path(), "guides/props.md", "# Props\n");

        let content = load_content(dir.path(), &renderer()).unwrap();
        let tree = &content.tree;
        assert_eq!(tree.parent("guides").unwrap().slug, "");
        let children: Vec<_> = tree.children("guides").iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(children, vec!["guides/props", "guides/state"]);
        assert_eq!(
            tree.find_node_by_slug("guides/state").unwrap().source_path,
            Some(PathBuf::from("guides/state.md"))
        );
    }

    #[test]
    fn test_load_promotes_pages_without_section_index() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "# Home\n");
        write(dir.path(), "advanced/hooks/effects.md", "# Effects\n");

        let content = load_content(dir.path(), &renderer()).unwrap();
        assert!(content.tree.find_node_by_slug("advanced").is_none());
        assert_eq!(content.tree.parent("advanced/hooks/effects").unwrap().slug, "");
    }

    #[test]
    fn test_load_keeps_sources_and_texts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "jsx.md", "# JSX\n\nMarkup in JavaScript.\n");

        let content = load_content(dir.path(), &renderer()).unwrap();
        assert!(content.sources["jsx"].starts_with("# JSX"));
        assert!(content.texts["jsx"].contains("Markup in JavaScript."));
    }

    #[test]
    fn test_load_slug_collision_prefers_section_index() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "# Home\n");
        write(dir.path(), "guides.md", "# From Leaf\n\nleaf body\n");
        write(dir.path(), "guides/index.md", "# From Index\n\nindex body\n");

        let content = load_content(dir.path(), &renderer()).unwrap();
        assert_eq!(content.tree.len(), 2);

        let node = content.tree.find_node_by_slug("guides").unwrap();
        assert_eq!(node.title, "From Index");
        assert_eq!(node.source_path, Some(PathBuf::from("guides/index.md")));
        assert!(content.sources["guides"].contains("index body"));
        assert!(content.texts["guides"].contains("index body"));

        let nav: Vec<_> = content
            .tree
            .navigation()
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(nav, vec!["From Index"]);
    }

    #[test]
    fn test_load_invalid_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.md", "---\ntitle: [unclosed\n---\nBody\n");

        let err = load_content(dir.path(), &renderer()).unwrap_err();
        assert!(matches!(err, SiteError::FrontMatter { .. }));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("guides/my_first-page"), "My First Page");
        assert_eq!(title_from_slug(""), "Home");
    }
}
