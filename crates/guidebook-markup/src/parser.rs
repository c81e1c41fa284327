//! Container block parsing.
//!
//! Splits a markdown source into plain markdown runs and nested
//! `:::Name[label]{attrs}` ... `:::` blocks. Lines inside fenced code are
//! never treated as block markers.

use std::collections::BTreeMap;

use crate::components::ComponentProps;

/// Parsed piece of a document.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Block {
    /// Markdown text rendered as-is.
    Markdown(String),
    /// Container block with its parsed body.
    Component {
        name: String,
        props: ComponentProps,
        children: Vec<Block>,
        line: usize,
    },
}

/// Output of [`parse_blocks`].
#[derive(Debug, Default)]
pub(crate) struct ParsedDocument {
    pub blocks: Vec<Block>,
    pub warnings: Vec<String>,
}

/// Open container while parsing.
struct Frame {
    name: String,
    props: ComponentProps,
    line: usize,
    children: Vec<Block>,
}

/// Line that opens or closes a container.
#[derive(Debug, PartialEq, Eq)]
enum Marker {
    Open { name: String, props: ComponentProps },
    Close,
}

/// Parse `source` into blocks.
pub(crate) fn parse_blocks(source: &str) -> ParsedDocument {
    let mut doc = ParsedDocument::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut buffer = String::new();
    let mut fence = FenceTracker::default();

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;

        if fence.update(line) {
            buffer.push_str(line);
            buffer.push('\n');
            continue;
        }

        match parse_marker(line) {
            Some(Marker::Open { name, props }) => {
                flush(&mut buffer, current_children(&mut doc.blocks, &mut stack));
                stack.push(Frame {
                    name,
                    props,
                    line: line_no,
                    children: Vec::new(),
                });
            }
            Some(Marker::Close) => {
                if let Some(frame) = stack.pop() {
                    let mut children = frame.children;
                    flush(&mut buffer, &mut children);
                    current_children(&mut doc.blocks, &mut stack).push(Block::Component {
                        name: frame.name,
                        props: frame.props,
                        children,
                        line: frame.line,
                    });
                } else {
                    doc.warnings
                        .push(format!("Unmatched closing ::: at line {line_no}"));
                    buffer.push_str(line);
                    buffer.push('\n');
                }
            }
            None => {
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
    }

    // Close anything left open so no content is lost
    while let Some(frame) = stack.pop() {
        doc.warnings.push(format!(
            "Unclosed :::{} opened at line {}",
            frame.name, frame.line
        ));
        let mut children = frame.children;
        flush(&mut buffer, &mut children);
        current_children(&mut doc.blocks, &mut stack).push(Block::Component {
            name: frame.name,
            props: frame.props,
            children,
            line: frame.line,
        });
    }
    flush(&mut buffer, &mut doc.blocks);

    doc
}

fn current_children<'a>(root: &'a mut Vec<Block>, stack: &'a mut [Frame]) -> &'a mut Vec<Block> {
    match stack.last_mut() {
        Some(frame) => &mut frame.children,
        None => root,
    }
}

fn flush(buffer: &mut String, target: &mut Vec<Block>) {
    if !buffer.trim().is_empty() {
        target.push(Block::Markdown(std::mem::take(buffer)));
    }
    buffer.clear();
}

/// Parse a whole line as a container marker.
fn parse_marker(line: &str) -> Option<Marker> {
    let trimmed = line.trim();
    if !trimmed.starts_with(":::") {
        return None;
    }

    let after_colons = trimmed.trim_start_matches(':').trim();
    if after_colons.is_empty() {
        return Some(Marker::Close);
    }

    let name_end = after_colons
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(after_colons.len());
    let name = &after_colons[..name_end];
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return None;
    }

    let rest = after_colons[name_end..].trim_start();
    let (label, label_len) = take_delimited(rest, '[', ']');
    let rest = rest[label_len..].trim_start();
    let (attrs, attrs_len) = take_delimited(rest, '{', '}');
    if !rest[attrs_len..].trim().is_empty() {
        return None;
    }

    Some(Marker::Open {
        name: name.to_owned(),
        props: ComponentProps {
            label: label.trim().to_owned(),
            attrs: parse_attrs(attrs),
        },
    })
}

/// Take `open ... close` from the start of `s`, honoring nesting.
///
/// Returns the inner text and the number of bytes consumed.
fn take_delimited(s: &str, open: char, close: char) -> (&str, usize) {
    if !s.starts_with(open) {
        return ("", 0);
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (&s[1..i], i + 1);
            }
        }
    }
    ("", 0)
}

/// Parse `key="value" key='value' key=value flag` into a map.
///
/// A bare key is stored with the value `"true"`.
fn parse_attrs(s: &str) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    let mut remaining = s.trim();

    while !remaining.is_empty() {
        let key_end = remaining
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(remaining.len());
        let key = &remaining[..key_end];
        remaining = &remaining[key_end..];

        let value = if let Some(after_eq) = remaining.strip_prefix('=') {
            let (value, rest) = take_value(after_eq);
            remaining = rest;
            value
        } else {
            "true"
        };

        if !key.is_empty() {
            attrs.insert(key.to_owned(), value.to_owned());
        }
        remaining = remaining.trim_start();
    }

    attrs
}

fn take_value(s: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(stripped) = s.strip_prefix(quote) {
            return match stripped.find(quote) {
                Some(end) => (&stripped[..end], &stripped[end + 1..]),
                None => (stripped, ""),
            };
        }
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Tracks fenced code blocks (``` and ~~~).
#[derive(Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    /// Feed one line. Returns `true` if the line is part of a fence
    /// (including the opening and closing lines).
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let fence = ['`', '~'].into_iter().find_map(|ch| {
            let len = trimmed.chars().take_while(|&c| c == ch).count();
            (len >= 3).then_some((ch, len))
        });

        match (self.open, fence) {
            (Some((ch, len)), Some((fch, flen))) if ch == fch && flen >= len => {
                if trimmed.trim_start_matches(ch).trim().is_empty() {
                    self.open = None;
                }
                true
            }
            (Some(_), _) => true,
            (None, Some(f)) => {
                self.open = Some(f);
                true
            }
            (None, None) => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn md(s: &str) -> Block {
        Block::Markdown(s.to_owned())
    }

    #[test]
    fn test_plain_markdown_is_one_block() {
        let doc = parse_blocks("# Title\n\nBody\n");
        assert_eq!(doc.blocks, vec![md("# Title\n\nBody\n")]);
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_container_block() {
        let doc = parse_blocks("Intro\n\n:::Note[Tip]\nInside\n:::\n\nOutro\n");
        assert_eq!(doc.blocks.len(), 3);
        let Block::Component {
            name,
            props,
            children,
            line,
        } = &doc.blocks[1]
        else {
            panic!("expected component, got {:?}", doc.blocks[1]);
        };
        assert_eq!(name, "Note");
        assert_eq!(props.label, "Tip");
        assert_eq!(children, &vec![md("Inside\n")]);
        assert_eq!(*line, 3);
    }

    #[test]
    fn test_nested_blocks() {
        let doc = parse_blocks(":::Details\n:::Example\ncode\n:::\n:::\n");
        let Block::Component { name, children, .. } = &doc.blocks[0] else {
            panic!("expected component");
        };
        assert_eq!(name, "Details");
        assert!(matches!(&children[0], Block::Component { name, .. } if name == "Example"));
    }

    #[test]
    fn test_markers_inside_fence_are_text() {
        let source = "```\n:::Note\n:::\n```\n";
        let doc = parse_blocks(source);
        assert_eq!(doc.blocks, vec![md(source)]);
    }

    #[test]
    fn test_unmatched_close_warns_and_keeps_text() {
        let doc = parse_blocks("text\n:::\n");
        assert_eq!(doc.warnings.len(), 1);
        assert!(doc.warnings[0].contains("line 2"));
        assert_eq!(doc.blocks, vec![md("text\n:::\n")]);
    }

    #[test]
    fn test_unclosed_block_warns_and_closes() {
        let doc = parse_blocks(":::Example\nbody\n");
        assert_eq!(doc.warnings, vec!["Unclosed :::Example opened at line 1".to_owned()]);
        assert!(matches!(&doc.blocks[0], Block::Component { children, .. } if children.len() == 1));
    }

    #[test]
    fn test_parse_marker_attrs() {
        let marker = parse_marker(r#":::Example{title="Hello world" height=200 live}"#).unwrap();
        let Marker::Open { name, props } = marker else {
            panic!("expected open marker");
        };
        assert_eq!(name, "Example");
        assert_eq!(props.get("title"), Some("Hello world"));
        assert_eq!(props.get("height"), Some("200"));
        assert_eq!(props.get("live"), Some("true"));
    }

    #[test]
    fn test_parse_marker_rejects_invalid_name() {
        assert_eq!(parse_marker(":::not valid!"), None);
        assert_eq!(parse_marker("text ::: here"), None);
        assert_eq!(parse_marker("::::"), Some(Marker::Close));
    }

    #[test]
    fn test_parse_attrs_single_quotes() {
        let attrs = parse_attrs("name='Devin Abbott' url=https://example.com");
        assert_eq!(attrs.get("name").map(String::as_str), Some("Devin Abbott"));
        assert_eq!(
            attrs.get("url").map(String::as_str),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_fence_tracker_longer_close() {
        let mut fence = FenceTracker::default();
        assert!(fence.update("````js"));
        assert!(fence.update("```"));
        assert!(fence.in_fence());
        assert!(fence.update("`````"));
        assert!(!fence.in_fence());
        assert!(!fence.update("plain"));
    }
}
