//! Shell assembly: theme and frame selection plus HTML rendering.
//!
//! [`ShellPlan::for_mode`] maps a render mode to a theme, a frame, and an
//! HTTP status. [`render_route`] classifies a path, looks up the routed
//! page, and renders the HTML document the plan describes.
//!
//! | Mode       | Theme   | Frame      | Head metadata | Status |
//! |------------|---------|------------|---------------|--------|
//! | Slides     | slides  | bare       | no            | 200    |
//! | Playground | default | bare       | no            | 200    |
//! | Content    | default | page       | yes           | 200    |
//! | NotFound   | default | not-found  | no            | 404    |

use std::collections::BTreeMap;
use std::fmt::Write;

use axum::http::StatusCode;
use guidebook_config::Config;
use guidebook_markup::{RenderResult, escape_html};
use guidebook_site::{BreadcrumbItem, ContentNode, NavItem, RenderKind, RenderMode, Route, Site};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::theme::{DEFAULT_THEME, SLIDES_THEME, Theme};

/// Endpoint answering page searches (`?q=`).
pub const SEARCH_PAGES_ENDPOINT: &str = "/api/search";

/// Endpoint prefix answering in-page text matches (`/{slug}?q=`).
pub const SEARCH_TEXT_MATCH_ENDPOINT: &str = "/api/search/";

/// Wrapper around the routed component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Component rendered as-is.
    Bare,
    /// Page chrome: navigation, logo, GitHub link, search, breadcrumbs.
    Page,
    /// Not-found view.
    NotFound,
}

/// How a render mode is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShellPlan {
    pub theme: &'static Theme,
    pub frame: Frame,
    /// Emit `<html lang>`, `<title>`, and `og:title`.
    pub head_metadata: bool,
    pub status: StatusCode,
}

impl ShellPlan {
    /// Select theme and frame for a render mode.
    #[must_use]
    pub fn for_mode(kind: RenderKind) -> Self {
        match kind {
            RenderKind::Slides => Self {
                theme: &SLIDES_THEME,
                frame: Frame::Bare,
                head_metadata: false,
                status: StatusCode::OK,
            },
            RenderKind::Playground => Self {
                theme: &DEFAULT_THEME,
                frame: Frame::Bare,
                head_metadata: false,
                status: StatusCode::OK,
            },
            RenderKind::Content => Self {
                theme: &DEFAULT_THEME,
                frame: Frame::Page,
                head_metadata: true,
                status: StatusCode::OK,
            },
            RenderKind::NotFound => Self {
                theme: &DEFAULT_THEME,
                frame: Frame::NotFound,
                head_metadata: false,
                status: StatusCode::NOT_FOUND,
            },
        }
    }
}

/// GitHub repository linked from the page frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GithubLink {
    pub user: String,
    pub repo: String,
}

impl GithubLink {
    /// Repository URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.user, self.repo)
    }
}

/// Site-wide branding passed to the page frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteChrome {
    /// Site name shown next to the logo.
    pub title: String,
    /// Value of `<html lang>`.
    pub lang: String,
    /// Logo URL.
    pub logo: Option<String>,
    pub github: Option<GithubLink>,
}

impl Default for SiteChrome {
    fn default() -> Self {
        Self {
            title: "Guidebook".to_owned(),
            lang: "en".to_owned(),
            logo: None,
            github: None,
        }
    }
}

impl SiteChrome {
    /// Branding from the `[site]` and `[github]` config sections.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.site.title.clone(),
            lang: config.site.lang.clone(),
            logo: config.site.logo.clone(),
            github: config.github.as_ref().map(|g| GithubLink {
                user: g.user.clone(),
                repo: g.repo.clone(),
            }),
        }
    }
}

/// Final HTML for one route.
#[derive(Debug)]
pub struct RenderedRoute {
    /// Shell that was rendered. `NotFound` when the route had no page.
    pub kind: RenderKind,
    pub status: StatusCode,
    pub html: String,
    /// Markup warnings from rendering the page.
    pub warnings: Vec<String>,
}

/// Classify `path` and render the shell for its mode.
///
/// Slides and playground routes without a backing page fall back to the
/// not-found shell.
#[must_use]
pub fn render_route(site: &Site, chrome: &SiteChrome, path: &str) -> RenderedRoute {
    let slug = Route::from_path(path).slug();

    match site.classify(path) {
        RenderMode::Slides => match site.render_slides(slug) {
            Some(slides) => render_slides(&slides),
            None => render_not_found(chrome),
        },
        RenderMode::Playground => match site.render(slug) {
            Some(result) => render_playground(result),
            None => render_not_found(chrome),
        },
        RenderMode::Content(node) => render_content(site, chrome, node),
        RenderMode::NotFound => render_not_found(chrome),
    }
}

/// Not-found shell with an empty route map.
#[must_use]
pub fn render_not_found(chrome: &SiteChrome) -> RenderedRoute {
    let plan = ShellPlan::for_mode(RenderKind::NotFound);
    let mut body = String::new();
    render_not_found_view(&mut body, chrome, &BTreeMap::new());
    RenderedRoute {
        kind: RenderKind::NotFound,
        status: plan.status,
        html: document(&plan, None, &body),
        warnings: Vec::new(),
    }
}

fn render_slides(slides: &[RenderResult]) -> RenderedRoute {
    let plan = ShellPlan::for_mode(RenderKind::Slides);
    let mut body = String::from("<div class=\"deck\">\n");
    for (i, slide) in slides.iter().enumerate() {
        let _ = writeln!(
            body,
            "<section class=\"slide\" id=\"slide-{}\">\n{}</section>",
            i + 1,
            slide.html
        );
    }
    body.push_str("</div>\n");

    RenderedRoute {
        kind: RenderKind::Slides,
        status: plan.status,
        html: document(&plan, None, &body),
        warnings: slides.iter().flat_map(|s| s.warnings.clone()).collect(),
    }
}

fn render_playground(result: RenderResult) -> RenderedRoute {
    let plan = ShellPlan::for_mode(RenderKind::Playground);
    let body = format!("<main class=\"playground\">\n{}</main>\n", result.html);
    RenderedRoute {
        kind: RenderKind::Playground,
        status: plan.status,
        html: document(&plan, None, &body),
        warnings: result.warnings,
    }
}

fn render_content(site: &Site, chrome: &SiteChrome, node: &ContentNode) -> RenderedRoute {
    let plan = ShellPlan::for_mode(RenderKind::Content);
    let page = site.render(&node.slug).unwrap_or_default();

    let frame = PageFrame {
        chrome,
        navigation: site.tree().navigation(),
        breadcrumbs: site.tree().breadcrumbs(&node.slug),
        active_path: node.url_path(),
        slug: &node.slug,
    };
    let mut body = String::with_capacity(page.html.len() + 4096);
    frame.render(&mut body, &page.html);

    let head = Head {
        lang: &chrome.lang,
        title: &node.title,
    };
    RenderedRoute {
        kind: RenderKind::Content,
        status: plan.status,
        html: document(&plan, Some(&head), &body),
        warnings: page.warnings,
    }
}

/// Head metadata for content pages.
struct Head<'a> {
    lang: &'a str,
    title: &'a str,
}

/// Wrap `body` in a complete HTML document styled by the plan's theme.
fn document(plan: &ShellPlan, head: Option<&Head<'_>>, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 2048);
    html.push_str("<!DOCTYPE html>\n");
    match head.filter(|_| plan.head_metadata) {
        Some(head) => {
            let _ = writeln!(html, "<html lang=\"{}\">", escape_html(head.lang));
            html.push_str("<head>\n<meta charset=\"utf-8\">\n");
            html.push_str(
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            );
            let title = escape_html(head.title);
            let _ = writeln!(html, "<title>{title}</title>");
            let _ = writeln!(html, "<meta property=\"og:title\" content=\"{title}\">");
        }
        None => {
            html.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n");
            html.push_str(
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            );
        }
    }
    let _ = write!(html, "<style>\n{}</style>\n", plan.theme.css());
    html.push_str("</head>\n");
    let _ = writeln!(html, "<body data-theme=\"{}\">", plan.theme.name);
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

/// Page chrome wrapping a content page.
/// Bytes escaped in page hrefs. `/` stays literal so slugs keep their shape.
const HREF_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Attribute-ready href for a page path (`/getting started` -> `/getting%20started`).
fn page_href(path: &str) -> String {
    escape_html(&utf8_percent_encode(path, HREF_ENCODE_SET).to_string())
}

struct PageFrame<'a> {
    chrome: &'a SiteChrome,
    navigation: Vec<NavItem>,
    breadcrumbs: Vec<BreadcrumbItem>,
    active_path: String,
    slug: &'a str,
}

impl PageFrame<'_> {
    fn render(&self, html: &mut String, content: &str) {
        html.push_str("<div class=\"guidebook\">\n");
        self.render_sidebar(html);

        html.push_str("<main class=\"page\">\n");
        render_breadcrumbs(html, &self.breadcrumbs);
        html.push_str("<article class=\"content\">\n");
        html.push_str(content);
        html.push_str("</article>\n</main>\n</div>\n");
    }

    fn render_sidebar(&self, html: &mut String) {
        let chrome = self.chrome;
        html.push_str("<aside class=\"sidebar\">\n");

        html.push_str("<a href=\"/\" class=\"logo\">");
        if let Some(logo) = &chrome.logo {
            let _ = write!(html, "<img src=\"{}\" alt=\"\">", escape_html(logo));
        }
        let _ = writeln!(html, "<span>{}</span></a>", escape_html(&chrome.title));

        if let Some(github) = &chrome.github {
            let _ = writeln!(
                html,
                "<a href=\"{}\" class=\"github\">{}/{}</a>",
                escape_html(&github.url()),
                escape_html(&github.user),
                escape_html(&github.repo),
            );
        }

        let _ = writeln!(
            html,
            "<form class=\"search\" action=\"{SEARCH_PAGES_ENDPOINT}\" method=\"get\" \
             data-search-pages=\"{SEARCH_PAGES_ENDPOINT}\" \
             data-search-text-match=\"{SEARCH_TEXT_MATCH_ENDPOINT}{}\">",
            page_href(self.slug),
        );
        html.push_str("<input type=\"search\" name=\"q\" placeholder=\"Search\">\n</form>\n");

        html.push_str("<nav>\n<ul>\n");
        self.render_nav_items(html, &self.navigation);
        html.push_str("</ul>\n</nav>\n</aside>\n");
    }

    fn render_nav_items(&self, html: &mut String, items: &[NavItem]) {
        for item in items {
            html.push_str("<li>");
            let class = if item.path == self.active_path {
                " class=\"active\""
            } else {
                ""
            };
            let _ = write!(
                html,
                "<a href=\"{}\"{class}>{}</a>",
                page_href(&item.path),
                escape_html(&item.title),
            );
            if !item.children.is_empty() {
                html.push_str("\n<ul>\n");
                self.render_nav_items(html, &item.children);
                html.push_str("</ul>\n");
            }
            html.push_str("</li>\n");
        }
    }
}

fn render_breadcrumbs(html: &mut String, breadcrumbs: &[BreadcrumbItem]) {
    if breadcrumbs.is_empty() {
        return;
    }
    html.push_str("<nav class=\"breadcrumbs\">\n<ol>\n");
    for crumb in breadcrumbs {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            page_href(&crumb.path),
            escape_html(&crumb.title),
        );
    }
    html.push_str("</ol>\n</nav>\n");
}

/// Not-found view. `route_map` maps suggested paths to titles.
fn render_not_found_view(html: &mut String, chrome: &SiteChrome, route_map: &BTreeMap<String, String>) {
    html.push_str("<main class=\"not-found\">\n");
    html.push_str("<h1>Page not found</h1>\n");
    html.push_str("<p>The page you requested does not exist.</p>\n");
    if !route_map.is_empty() {
        html.push_str("<ul class=\"suggestions\">\n");
        for (path, title) in route_map {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a></li>",
                page_href(path),
                escape_html(title),
            );
        }
        html.push_str("</ul>\n");
    }
    let _ = writeln!(
        html,
        "<p><a href=\"/\">Back to {}</a></p>",
        escape_html(&chrome.title)
    );
    html.push_str("</main>\n");
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use guidebook_markup::{MarkupRenderer, site_components};
    use guidebook_site::ContentTreeBuilder;
    use pretty_assertions::assert_eq;

    use super::*;

    fn site() -> Site {
        let mut builder = ContentTreeBuilder::new();
        let root = builder.add_node("React Express", "", None, None);
        let guides = builder.add_node("Guides", "guides", None, Some(root));
        builder.add_node("Props & State", "guides/props", None, Some(guides));
        builder.add_node("Intro Deck", "intro/slides", None, Some(root));
        let sources = HashMap::from([
            (String::new(), "# React Express\n".to_owned()),
            ("guides".to_owned(), "# Guides\n".to_owned()),
            (
                "guides/props".to_owned(),
                "# Props\n\n:::Note\nRead this.\n:::\n".to_owned(),
            ),
            ("intro/slides".to_owned(), "# One\n---\n# Two\n".to_owned()),
            ("sandbox/playgrounds".to_owned(), "# Sandbox\n".to_owned()),
        ]);
        let renderer = MarkupRenderer::new(Arc::new(site_components().unwrap()));
        Site::new(builder.build(), sources, renderer)
    }

    fn chrome() -> SiteChrome {
        SiteChrome {
            title: "React Express".to_owned(),
            lang: "en".to_owned(),
            logo: Some("/public/logo.svg".to_owned()),
            github: Some(GithubLink {
                user: "dabbott".to_owned(),
                repo: "react-express".to_owned(),
            }),
        }
    }

    #[test]
    fn test_plan_for_each_mode() {
        let slides = ShellPlan::for_mode(RenderKind::Slides);
        assert_eq!(slides.theme.name, "slides");
        assert_eq!(slides.frame, Frame::Bare);

        let playground = ShellPlan::for_mode(RenderKind::Playground);
        assert_eq!(playground.theme.name, "default");
        assert_eq!(playground.frame, Frame::Bare);

        let content = ShellPlan::for_mode(RenderKind::Content);
        assert_eq!(content.frame, Frame::Page);
        assert!(content.head_metadata);

        let not_found = ShellPlan::for_mode(RenderKind::NotFound);
        assert_eq!(not_found.frame, Frame::NotFound);
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_content_page_head_metadata() {
        let route = render_route(&site(), &chrome(), "/guides/props");
        assert_eq!(route.kind, RenderKind::Content);
        assert_eq!(route.status, StatusCode::OK);
        assert!(route.html.contains("<html lang=\"en\">"));
        assert!(route.html.contains("<title>Props &amp; State</title>"));
        assert!(
            route
                .html
                .contains("<meta property=\"og:title\" content=\"Props &amp; State\">")
        );
        assert!(route.html.contains("data-theme=\"default\""));
    }

    #[test]
    fn test_content_page_frame() {
        let html = render_route(&site(), &chrome(), "/guides/props").html;
        assert!(html.contains("<img src=\"/public/logo.svg\""));
        assert!(html.contains("https://github.com/dabbott/react-express"));
        assert!(html.contains("data-search-pages=\"/api/search\""));
        assert!(html.contains("data-search-text-match=\"/api/search/guides/props\""));
        assert!(html.contains("<a href=\"/guides/props\" class=\"active\">"));
        assert!(html.contains("<li><a href=\"/guides\">Guides</a></li>"));
        // Component overrides apply to the page body
        assert!(html.contains("callout-note"));
    }

    #[test]
    fn test_slides_bare_with_slides_theme() {
        let route = render_route(&site(), &chrome(), "/intro/slides");
        assert_eq!(route.kind, RenderKind::Slides);
        assert!(route.html.contains("data-theme=\"slides\""));
        assert!(route.html.contains("id=\"slide-2\""));
        assert!(!route.html.contains("<title>"));
        assert!(!route.html.contains("class=\"sidebar\""));
    }

    #[test]
    fn test_playground_bare_with_default_theme() {
        let route = render_route(&site(), &chrome(), "/sandbox/playgrounds");
        assert_eq!(route.kind, RenderKind::Playground);
        assert!(route.html.contains("data-theme=\"default\""));
        assert!(route.html.contains("<main class=\"playground\">"));
        assert!(!route.html.contains("<title>"));
    }

    #[test]
    fn test_unknown_slug_renders_not_found() {
        let route = render_route(&site(), &chrome(), "/missing/page");
        assert_eq!(route.kind, RenderKind::NotFound);
        assert_eq!(route.status, StatusCode::NOT_FOUND);
        assert!(route.html.contains("Page not found"));
        assert!(!route.html.contains("class=\"suggestions\""));
    }

    #[test]
    fn test_slides_without_page_fall_back_to_not_found() {
        let route = render_route(&site(), &chrome(), "/other/slides");
        assert_eq!(route.kind, RenderKind::NotFound);
        assert_eq!(route.status, StatusCode::NOT_FOUND);
        assert!(route.html.contains("data-theme=\"default\""));
    }

    #[test]
    fn test_root_has_no_breadcrumbs() {
        let html = render_route(&site(), &chrome(), "/").html;
        assert!(!html.contains("class=\"breadcrumbs\""));
        assert!(html.contains("<title>React Express</title>"));
    }

    #[test]
    fn test_chrome_from_config() {
        let mut config = Config::default();
        config.site.title = "React Express".to_owned();
        let chrome = SiteChrome::from_config(&config);
        assert_eq!(chrome.title, "React Express");
        assert_eq!(chrome.lang, "en");
        assert!(chrome.github.is_none());
    }

    #[test]
    fn test_not_found_view_lists_suggestions() {
        let mut html = String::new();
        let map = BTreeMap::from([("/guides".to_owned(), "Guides".to_owned())]);
        render_not_found_view(&mut html, &chrome(), &map);
        assert!(html.contains("<li><a href=\"/guides\">Guides</a></li>"));
    }

    #[test]
    fn test_page_href_encodes_reserved_bytes() {
        assert_eq!(page_href("/guides/props"), "/guides/props");
        assert_eq!(page_href("/getting started"), "/getting%20started");
        assert_eq!(page_href("/\u{fc}ber"), "/%C3%BCber");
        assert_eq!(page_href("/a?b#c"), "/a%3Fb%23c");
    }

    #[test]
    fn test_nav_links_are_percent_encoded() {
        let mut builder = ContentTreeBuilder::new();
        let root = builder.add_node("Home", "", None, None);
        builder.add_node("Getting Started", "getting started", None, Some(root));
        let sources = HashMap::from([
            (String::new(), "# Home\n".to_owned()),
            ("getting started".to_owned(), "# Getting Started\n".to_owned()),
        ]);
        let renderer = MarkupRenderer::new(Arc::new(site_components().unwrap()));
        let site = Site::new(builder.build(), sources, renderer);

        let html = render_route(&site, &chrome(), "/getting started").html;
        assert!(html.contains("<a href=\"/getting%20started\" class=\"active\">"));
        assert!(html.contains("data-search-text-match=\"/api/search/getting%20started\""));
    }
}
