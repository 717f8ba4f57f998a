use crate::vectorizer::stop_words::is_stop_word;

/// Splits text into normalized terms.
///
/// - lowercases the whole text
/// - splits on every non-alphabetic character (punctuation, digits, spaces)
/// - drops empty runs, stop words and runs shorter than `min_term_len` chars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    pub min_term_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self { min_term_len: 1 }
    }
}

impl Tokenizer {
    pub fn new(min_term_len: usize) -> Self {
        Self { min_term_len }
    }

    /// Tokenize `text` into terms, in order of appearance
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        lower
            .split(|c: char| !c.is_alphabetic())
            .filter(|term| !term.is_empty())
            .filter(|term| term.chars().count() >= self.min_term_len)
            .filter(|term| !is_stop_word(term))
            .map(str::to_string)
            .collect()
    }
}
