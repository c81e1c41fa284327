//! Theme tokens.
//!
//! A theme is a fixed set of design tokens emitted as CSS custom properties
//! on `:root`. Pages pick exactly one theme through their shell plan.

use std::fmt::Write;

/// Design tokens for one theme.
#[derive(Debug, PartialEq, Eq)]
pub struct Theme {
    /// Theme identifier, emitted as `data-theme` on `<body>`.
    pub name: &'static str,
    pub text: &'static str,
    pub background: &'static str,
    pub primary: &'static str,
    pub divider: &'static str,
    pub code_background: &'static str,
    pub body_font: &'static str,
    pub code_font: &'static str,
    pub body_size: &'static str,
}

/// Theme for guidebook pages, playgrounds, and the not-found view.
pub const DEFAULT_THEME: Theme = Theme {
    name: "default",
    text: "#333333",
    background: "#ffffff",
    primary: "#3f51b5",
    divider: "#e5e5e5",
    code_background: "#f8f8f8",
    body_font: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif",
    code_font: "Menlo, Monaco, Consolas, monospace",
    body_size: "16px",
};

/// Theme for slide decks: dark, large type.
pub const SLIDES_THEME: Theme = Theme {
    name: "slides",
    text: "#f5f5f5",
    background: "#1e1e1e",
    primary: "#61dafb",
    divider: "#3a3a3a",
    code_background: "#282c34",
    body_font: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif",
    code_font: "Menlo, Monaco, Consolas, monospace",
    body_size: "28px",
};

impl Theme {
    /// CSS custom properties plus the base rules that consume them.
    #[must_use]
    pub fn css(&self) -> String {
        let mut css = String::with_capacity(512);
        css.push_str(":root {\n");
        let tokens = [
            ("color-text", self.text),
            ("color-background", self.background),
            ("color-primary", self.primary),
            ("color-divider", self.divider),
            ("color-code-background", self.code_background),
            ("font-body", self.body_font),
            ("font-code", self.code_font),
            ("font-size-body", self.body_size),
        ];
        for (name, value) in tokens {
            let _ = writeln!(css, "  --{name}: {value};");
        }
        css.push_str("}\n");
        css.push_str(
            "body { margin: 0; color: var(--color-text); background: var(--color-background); \
             font-family: var(--font-body); font-size: var(--font-size-body); }\n",
        );
        css.push_str("a { color: var(--color-primary); }\n");
        css.push_str(
            "pre, code { font-family: var(--font-code); background: var(--color-code-background); }\n",
        );
        css
    }
}
