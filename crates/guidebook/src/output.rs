//! Colored terminal output on stderr.

use console::{Style, Term};

/// Message styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Highlight,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red(),
            Self::Highlight => Style::new().cyan().bold(),
        }
    }
}

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Print one styled line. Write errors are ignored.
    pub(crate) fn line(&self, tone: Tone, msg: &str) {
        let _ = self.term.write_line(&tone.style().apply_to(msg).to_string());
    }

    /// Print `label: value` with a dimmed, aligned label.
    pub(crate) fn field(&self, label: &str, value: impl std::fmt::Display) {
        let padded = format!("{:<10}", format!("{label}:"));
        let _ = self
            .term
            .write_line(&format!("  {} {value}", Style::new().dim().apply_to(padded)));
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(Tone::Error, msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.line(Tone::Highlight, msg);
    }
}
