//! Page search and in-page text matching.
//!
//! Matching is ASCII case-insensitive so byte offsets in the lowered text
//! line up with the original text.

use std::collections::HashMap;

use serde::Serialize;

use crate::tree::ContentTree;

/// Maximum number of hits returned by [`SearchIndex::search_pages`].
const MAX_HITS: usize = 20;

/// Bytes of context kept on each side of a text match.
const SNIPPET_CONTEXT: usize = 40;

/// Weight of a title occurrence relative to a body occurrence.
const TITLE_WEIGHT: usize = 10;

/// Page matching a search query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Node slug.
    pub slug: String,
    /// Node title.
    pub title: String,
    /// URL path with leading slash.
    pub path: String,
    /// Relevance; higher is better.
    pub score: usize,
}

/// Occurrence of a query inside a page's text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextMatch {
    /// Byte offset of the match in the page text.
    pub offset: usize,
    /// Context before the match.
    pub before: String,
    /// Matched text as written in the page.
    pub matched: String,
    /// Context after the match.
    pub after: String,
}

#[derive(Debug)]
struct Entry {
    slug: String,
    title: String,
    title_lower: String,
    text: String,
    text_lower: String,
}

/// Searchable titles and texts of every page.
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<Entry>,
}

impl SearchIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every tree node, taking page text from `texts` by slug.
    #[must_use]
    pub fn build(tree: &ContentTree, texts: &HashMap<String, String>) -> Self {
        let mut index = Self::new();
        for node in tree.nodes() {
            let text = texts.get(&node.slug).map_or("", String::as_str);
            index.insert(&node.slug, &node.title, text);
        }
        index
    }

    /// Add a page.
    pub fn insert(&mut self, slug: &str, title: &str, text: &str) {
        self.entries.push(Entry {
            slug: slug.to_owned(),
            title: title.to_owned(),
            title_lower: title.to_ascii_lowercase(),
            text: text.to_owned(),
            text_lower: text.to_ascii_lowercase(),
        });
    }

    /// Number of indexed pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find pages containing every term of `query`.
    ///
    /// Terms are whitespace separated. Title occurrences weigh more than
    /// body occurrences. Results are ordered by score, then slug.
    #[must_use]
    pub fn search_pages(&self, query: &str) -> Vec<SearchHit> {
        let query = query.to_ascii_lowercase();
        let terms: Vec<&str> = query.split_whitespace().collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let mut score = 0;
                for term in &terms {
                    let in_title = entry.title_lower.matches(term).count();
                    let in_text = entry.text_lower.matches(term).count();
                    if in_title + in_text == 0 {
                        return None;
                    }
                    score += in_title * TITLE_WEIGHT + in_text;
                }
                Some(SearchHit {
                    slug: entry.slug.clone(),
                    title: entry.title.clone(),
                    path: format!("/{}", entry.slug),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.slug.cmp(&b.slug)));
        hits.truncate(MAX_HITS);
        hits
    }

    /// Find every occurrence of `query` in the text of page `slug`.
    ///
    /// The whole trimmed query is matched as one phrase. Unknown slugs and
    /// empty queries give no matches.
    #[must_use]
    pub fn search_text_match(&self, slug: &str, query: &str) -> Vec<TextMatch> {
        let needle = query.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let Some(entry) = self.entries.iter().find(|e| e.slug == slug) else {
            return Vec::new();
        };

        entry
            .text_lower
            .match_indices(&needle)
            .map(|(offset, m)| {
                let end = offset + m.len();
                let text = &entry.text;
                let start_ctx = floor_char_boundary(text, offset.saturating_sub(SNIPPET_CONTEXT));
                let end_ctx = ceil_char_boundary(text, end + SNIPPET_CONTEXT);
                TextMatch {
                    offset,
                    before: collapse_whitespace(&text[start_ctx..offset]),
                    matched: text[offset..end].to_owned(),
                    after: collapse_whitespace(&text[end..end_ctx]),
                }
            })
            .collect()
    }
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Turn newlines between text runs into single spaces.
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}
