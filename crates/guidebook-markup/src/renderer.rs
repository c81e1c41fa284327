//! Markdown to HTML rendering with component overrides.

use std::sync::Arc;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::components::ComponentMap;
use crate::parser::{Block, FenceTracker, parse_blocks};

/// Result of rendering a markup document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Text of the first H1 heading, if any.
    pub title: Option<String>,
    /// Plain text of the document, one line per text run, for search.
    pub text: String,
    /// Problems found while rendering (unknown components, bad nesting).
    pub warnings: Vec<String>,
}

/// Renders markdown with `:::Name` blocks resolved through a [`ComponentMap`].
#[derive(Clone, Debug)]
pub struct MarkupRenderer {
    components: Arc<ComponentMap>,
}

impl MarkupRenderer {
    /// Create a renderer backed by a validated component table.
    #[must_use]
    pub fn new(components: Arc<ComponentMap>) -> Self {
        Self { components }
    }

    /// Component table used for overrides.
    #[must_use]
    pub fn components(&self) -> &ComponentMap {
        &self.components
    }

    /// Render a document. Front matter is skipped.
    #[must_use]
    pub fn render(&self, source: &str) -> RenderResult {
        let (_, body) = split_front_matter(source);
        let doc = parse_blocks(body);

        let mut result = RenderResult {
            warnings: doc.warnings,
            ..Default::default()
        };
        for block in &doc.blocks {
            let html = self.render_block(block, &mut result);
            result.html.push_str(&html);
        }
        result
    }

    /// Render a slide deck: the body is split on `---` lines outside of
    /// fenced code, and each slide is rendered on its own.
    #[must_use]
    pub fn render_slides(&self, source: &str) -> Vec<RenderResult> {
        let (_, body) = split_front_matter(source);
        split_slides(body)
            .into_iter()
            .map(|slide| self.render(slide))
            .collect()
    }

    fn render_block(&self, block: &Block, result: &mut RenderResult) -> String {
        match block {
            Block::Markdown(markdown) => render_markdown(markdown, result),
            Block::Component {
                name,
                props,
                children,
                line,
            } => {
                let inner: String = children
                    .iter()
                    .map(|child| self.render_block(child, result))
                    .collect();
                match self.components.get(name) {
                    Some(component) => component.render(props, &inner),
                    None => {
                        result
                            .warnings
                            .push(format!("Unknown component :::{name} at line {line}"));
                        inner
                    }
                }
            }
        }
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render one markdown run, collecting title and text into `result`.
fn render_markdown(markdown: &str, result: &mut RenderResult) -> String {
    let events: Vec<Event<'_>> = Parser::new_ext(markdown, parser_options()).collect();

    let mut in_h1 = false;
    let mut heading = String::new();
    for event in &events {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if result.title.is_none() => {
                in_h1 = true;
                heading.clear();
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_h1 => {
                in_h1 = false;
                result.title = Some(heading.trim().to_owned());
            }
            Event::Text(text) | Event::Code(text) => {
                if in_h1 {
                    heading.push_str(text);
                }
                result.text.push_str(text);
                result.text.push('\n');
            }
            _ => {}
        }
    }

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    html
}

/// Split a `---` delimited front matter block off the top of `source`.
///
/// Returns `(front_matter, body)`. The front matter excludes the delimiters.
#[must_use]
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(front), body);
        }
        offset += line.len();
    }

    (None, source)
}

/// Split a slide deck on thematic-break lines (`---`).
fn split_slides(body: &str) -> Vec<&str> {
    let mut slides = Vec::new();
    let mut fence = FenceTracker::default();
    let mut start = 0;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let in_fence = fence.update(line);
        if !in_fence && line.trim_end() == "---" {
            slides.push(&body[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    slides.push(&body[start..]);

    slides.retain(|s| !s.trim().is_empty());
    slides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentMapBuilder, ComponentProps, site_components};
    use pretty_assertions::assert_eq;

    fn renderer() -> MarkupRenderer {
        MarkupRenderer::new(Arc::new(site_components().unwrap()))
    }

    #[test]
    fn test_render_paragraph() {
        let result = renderer().render("Hello **world**");
        assert_eq!(result.html, "<p>Hello <strong>world</strong></p>\n");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_render_extracts_first_h1() {
        let result = renderer().render("# Intro to `JSX`\n\n# Second\n");
        assert_eq!(result.title.as_deref(), Some("Intro to JSX"));
    }

    #[test]
    fn test_render_collects_text() {
        let result = renderer().render("# Props\n\nPass data down.\n");
        assert!(result.text.contains("Props"));
        assert!(result.text.contains("Pass data down."));
    }

    #[test]
    fn test_render_skips_front_matter() {
        let result = renderer().render("---\ntitle: Hooks\n---\nBody\n");
        assert_eq!(result.html, "<p>Body</p>\n");
    }

    #[test]
    fn test_render_component_override() {
        let result = renderer().render(":::Example{title=\"Counter\"}\n```jsx\n<Counter />\n```\n:::\n");
        assert!(result.html.contains("editor-console"));
        assert!(result.html.contains("Counter"));
        assert!(result.html.contains("&lt;Counter /&gt;"));
    }

    #[test]
    fn test_render_details_is_pass_through() {
        let result = renderer().render(":::Details\nSecret\n:::\n");
        assert_eq!(result.html, "<p>Secret</p>\n");
    }

    #[test]
    fn test_render_unknown_component_warns() {
        let result = renderer().render(":::Quiz\nWhat is JSX?\n:::\n");
        assert_eq!(result.html, "<p>What is JSX?</p>\n");
        assert_eq!(result.warnings, vec!["Unknown component :::Quiz at line 1".to_owned()]);
    }

    #[test]
    fn test_render_with_custom_table() {
        let map = ComponentMapBuilder::new()
            .with("Box", |p: &ComponentProps, c: &str| {
                format!("<div data-label=\"{}\">{c}</div>", p.label)
            })
            .build()
            .unwrap();
        let result = MarkupRenderer::new(Arc::new(map)).render(":::Box[a]\nx\n:::\n");
        assert_eq!(result.html, "<div data-label=\"a\"><p>x</p>\n</div>");
    }

    #[test]
    fn test_split_front_matter() {
        assert_eq!(
            split_front_matter("---\ntitle: A\n---\nbody"),
            (Some("title: A\n"), "body")
        );
        assert_eq!(split_front_matter("no front matter"), (None, "no front matter"));
        assert_eq!(split_front_matter("---\nunterminated"), (None, "---\nunterminated"));
    }

    #[test]
    fn test_split_slides() {
        let slides = split_slides("# One\n---\n# Two\n```\n---\n```\n---\n");
        assert_eq!(slides, vec!["# One\n", "# Two\n```\n---\n```\n"]);
    }

    #[test]
    fn test_render_slides() {
        let slides = renderer().render_slides("# A\n\n---\n\n# B\n");
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title.as_deref(), Some("B"));
    }
}
