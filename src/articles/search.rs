use serde::{Deserialize, Serialize};

use crate::articles::ArticleTable;

/// Default number of keyword hits
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Snippet length in characters before the ellipsis
pub const SNIPPET_CHARS: usize = 100;

/// One keyword search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub idx: usize,
    pub title: String,
    pub description: String,
}

impl ArticleTable {
    /// Case-insensitive substring search over the text columns.
    ///
    /// Hits come back in corpus order, at most `limit` of them. An empty
    /// query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let needle = query.to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }
        (0..self.len())
            .filter(|&idx| self.text_cells(idx).any(|cell| cell.to_lowercase().contains(&needle)))
            .take(limit)
            .map(|idx| SearchHit {
                idx,
                title: self.title(idx).unwrap_or_default().to_string(),
                description: snippet(self.description(idx)),
            })
            .collect()
    }

    /// description column, or `full_text` when the table has none
    fn description(&self, idx: usize) -> &str {
        self.field(idx, "description")
            .or_else(|| self.full_text(idx))
            .unwrap_or_default()
    }
}

fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
