//! Component override table for container blocks.
//!
//! A container block `:::Name{key="value"}` ... `:::` is rendered by looking
//! `Name` up in a [`ComponentMap`]. The map is assembled once with
//! [`ComponentMapBuilder`] and validated when built, so a bad registration
//! fails at startup instead of at render time.
//!
//! Later registrations replace earlier ones with the same name. This is how
//! a site layers its own overrides on top of [`page_components`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::escape::escape_html;

/// Arguments of a container block: `:::Name[label]{key="value"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentProps {
    /// Text from brackets (empty if not provided).
    pub label: String,
    /// Key-value attributes from braces.
    pub attrs: BTreeMap<String, String>,
}

impl ComponentProps {
    /// Get an attribute value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

/// Render capability for one element name.
///
/// `children` is the already rendered HTML of the block body.
pub trait Component: Send + Sync {
    /// Render the block to HTML.
    fn render(&self, props: &ComponentProps, children: &str) -> String;
}

impl<F> Component for F
where
    F: Fn(&ComponentProps, &str) -> String + Send + Sync,
{
    fn render(&self, props: &ComponentProps, children: &str) -> String {
        self(props, children)
    }
}

/// Error returned when a component table fails validation.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// Name is not a valid component identifier.
    #[error("Invalid component name {0:?}: must start with an uppercase letter and be alphanumeric")]
    InvalidName(String),
}

/// Validated mapping from element name to render capability.
#[derive(Clone, Default)]
pub struct ComponentMap {
    components: HashMap<String, Arc<dyn Component>>,
}

impl ComponentMap {
    /// Look up a component by element name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Component>> {
        self.components.get(name)
    }

    /// Check whether a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for ComponentMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentMap")
            .field("names", &self.names())
            .finish()
    }
}

/// Builder for [`ComponentMap`].
#[derive(Default)]
pub struct ComponentMapBuilder {
    entries: Vec<(String, Arc<dyn Component>)>,
}

impl ComponentMapBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component, replacing any earlier one with the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, component: impl Component + 'static) -> Self {
        self.entries.push((name.into(), Arc::new(component)));
        self
    }

    /// Validate every name and build the table.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidName`] for the first invalid name.
    pub fn build(self) -> Result<ComponentMap, ComponentError> {
        let mut components = HashMap::with_capacity(self.entries.len());
        for (name, component) in self.entries {
            if !is_valid_component_name(&name) {
                return Err(ComponentError::InvalidName(name));
            }
            components.insert(name, component);
        }
        Ok(ComponentMap { components })
    }
}

/// Component identifiers look like `Example` or `Note2`.
pub(crate) fn is_valid_component_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Base components every page understands: `Note` and `Warning` callouts.
#[must_use]
pub fn page_components() -> ComponentMapBuilder {
    ComponentMapBuilder::new()
        .with("Note", Callout { kind: "note", default_title: "Note" })
        .with("Warning", Callout { kind: "warning", default_title: "Warning" })
}

/// Page components plus the guidebook overrides: `Example`, `Author` and
/// `Details`.
///
/// # Errors
///
/// Returns [`ComponentError`] if validation fails.
pub fn site_components() -> Result<ComponentMap, ComponentError> {
    page_components()
        .with("Example", EditorConsole)
        .with("Author", Author)
        .with("Details", Details)
        .build()
}

/// Titled aside box.
struct Callout {
    kind: &'static str,
    default_title: &'static str,
}

impl Component for Callout {
    fn render(&self, props: &ComponentProps, children: &str) -> String {
        let title = if props.label.is_empty() {
            self.default_title
        } else {
            &props.label
        };
        format!(
            r#"<aside class="callout callout-{}"><p class="callout-title">{}</p>{children}</aside>"#,
            self.kind,
            escape_html(title)
        )
    }
}

/// Code example framed as an editor with an output console.
///
/// Attributes: `title`, `height` (pixels).
struct EditorConsole;

impl Component for EditorConsole {
    fn render(&self, props: &ComponentProps, children: &str) -> String {
        let title = props
            .get("title")
            .or(Some(props.label.as_str()).filter(|s| !s.is_empty()))
            .unwrap_or("Example");
        let style = props
            .get("height")
            .and_then(|h| h.parse::<u32>().ok())
            .map(|h| format!(r#" style="min-height: {h}px""#))
            .unwrap_or_default();
        format!(
            "<div class=\"editor-console\"{style}>\
             <div class=\"editor-console-header\">{}</div>\
             <div class=\"editor-console-editor\">{children}</div>\
             <div class=\"editor-console-output\" data-empty=\"true\"></div>\
             </div>",
            escape_html(title)
        )
    }
}

/// Author byline. Attributes: `name`, `url`.
struct Author;

impl Component for Author {
    fn render(&self, props: &ComponentProps, children: &str) -> String {
        let name = props.get("name").unwrap_or(props.label.as_str());
        let name_html = match props.get("url") {
            Some(url) => format!(
                r#"<a class="author-name" href="{}">{}</a>"#,
                escape_html(url),
                escape_html(name)
            ),
            None => format!(r#"<span class="author-name">{}</span>"#, escape_html(name)),
        };
        format!(r#"<div class="author">{name_html}<div class="author-bio">{children}</div></div>"#)
    }
}

/// Renders its children without a wrapper.
struct Details;

impl Component for Details {
    fn render(&self, _props: &ComponentProps, children: &str) -> String {
        children.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_site_components_registers_overrides() {
        let map = site_components().unwrap();
        assert_eq!(map.names(), vec!["Author", "Details", "Example", "Note", "Warning"]);
    }

    #[test]
    fn test_builder_rejects_lowercase_name() {
        let err = ComponentMapBuilder::new()
            .with("example", |_: &ComponentProps, c: &str| c.to_owned())
            .build()
            .unwrap_err();
        assert!(matches!(err, ComponentError::InvalidName(ref n) if n == "example"));
    }

    #[test]
    fn test_builder_rejects_empty_and_punctuated_names() {
        for name in ["", "Code-Block", "Two Words"] {
            let result = ComponentMapBuilder::new()
                .with(name, |_: &ComponentProps, c: &str| c.to_owned())
                .build();
            assert!(result.is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_later_registration_overrides_earlier() {
        let map = page_components()
            .with("Note", |_: &ComponentProps, c: &str| format!("<b>{c}</b>"))
            .build()
            .unwrap();
        let html = map.get("Note").unwrap().render(&ComponentProps::default(), "x");
        assert_eq!(html, "<b>x</b>");
    }

    #[test]
    fn test_details_passes_children_through() {
        let map = site_components().unwrap();
        let html = map
            .get("Details")
            .unwrap()
            .render(&ComponentProps::default(), "<p>hidden</p>");
        assert_eq!(html, "<p>hidden</p>");
    }

    #[test]
    fn test_callout_uses_label_as_title() {
        let props = ComponentProps {
            label: "Heads up".to_owned(),
            ..Default::default()
        };
        let html = page_components()
            .build()
            .unwrap()
            .get("Warning")
            .unwrap()
            .render(&props, "<p>careful</p>");
        assert!(html.contains("callout-warning"));
        assert!(html.contains("Heads up"));
        assert!(html.contains("<p>careful</p>"));
    }

    #[test]
    fn test_editor_console_title_and_height() {
        let mut props = ComponentProps::default();
        props.attrs.insert("title".to_owned(), "Hello <World>".to_owned());
        props.attrs.insert("height".to_owned(), "240".to_owned());
        let html = EditorConsole.render(&props, "<pre><code>x</code></pre>");
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("min-height: 240px"));
    }

    #[test]
    fn test_author_links_name_when_url_given() {
        let mut props = ComponentProps::default();
        props.attrs.insert("name".to_owned(), "Devin".to_owned());
        props.attrs.insert("url".to_owned(), "https://example.com".to_owned());
        let html = Author.render(&props, "");
        assert!(html.contains(r#"<a class="author-name" href="https://example.com">Devin</a>"#));
    }

    #[test]
    fn test_is_valid_component_name() {
        assert!(is_valid_component_name("Example"));
        assert!(is_valid_component_name("H2"));
        assert!(!is_valid_component_name("2H"));
        assert!(!is_valid_component_name("ex"));
    }
}
