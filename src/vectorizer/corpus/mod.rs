use indexmap::IndexMap;

use crate::vectorizer::term::TermFrequency;

/// Per-term statistics over the whole corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermStats {
    /// number of documents containing the term
    pub doc_freq: u64,
    /// total occurrences across all documents
    pub total_count: u64,
}

/// Corpus statistics used for IDF calculation and vocabulary selection.
///
/// Does not store document text; it only keeps
/// - the number of documents
/// - for every term, its document frequency and total occurrence count
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    doc_num: u64,
    term_stats: IndexMap<Box<str>, TermStats>,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            term_stats: IndexMap::new(),
        }
    }

    /// Add one document's term counts
    pub fn add_doc(&mut self, freq: &TermFrequency) {
        self.doc_num += 1;
        for (term, count) in freq.iter() {
            if let Some(stats) = self.term_stats.get_mut(term) {
                stats.doc_freq += 1;
                stats.total_count += count;
            } else {
                self.term_stats.insert(
                    term.into(),
                    TermStats {
                        doc_freq: 1,
                        total_count: count,
                    },
                );
            }
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `term`
    #[inline]
    pub fn get_doc_freq(&self, term: &str) -> u64 {
        self.term_stats.get(term).map_or(0, |s| s.doc_freq)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_stats.len()
    }

    /// Pick at most `max_terms` terms, most frequent first.
    ///
    /// Ranking is by total corpus count descending, ties by term ascending.
    /// The result is returned in lexical order.
    pub fn top_terms(&self, max_terms: usize) -> Vec<Box<str>> {
        let mut ranked: Vec<(&Box<str>, u64)> = self
            .term_stats
            .iter()
            .map(|(t, s)| (t, s.total_count))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_terms);
        let mut terms: Vec<Box<str>> = ranked.into_iter().map(|(t, _)| t.clone()).collect();
        terms.sort_unstable();
        terms
    }
}
