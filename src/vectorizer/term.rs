use indexmap::IndexMap;

/// TermFrequency struct
/// Counts how many times each term occurs in one document.
///
/// Terms keep their order of first appearance, so iteration is deterministic.
///
/// # Examples
/// ```
/// use news_similarity::vectorizer::term::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_terms(&["dogs", "play", "dogs"]);
///
/// assert_eq!(term_freq.term_count("dogs"), 2);
/// assert_eq!(term_freq.term_count("cats"), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    term_count: IndexMap<String, u64>,
}

impl TermFrequency {
    /// Create a new TermFrequency
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
        }
    }

    /// Add a term
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        if let Some(count) = self.term_count.get_mut(term) {
            *count += 1;
        } else {
            self.term_count.insert(term.to_string(), 1);
        }
        self
    }

    /// Add multiple terms
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Occurrences of `term`, 0 if absent
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Iterate `(term, count)` in order of first appearance
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count.iter().map(|(t, &c)| (t.as_str(), c))
    }
}
