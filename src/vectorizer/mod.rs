pub mod corpus;
pub mod stop_words;
pub mod term;
pub mod tfidf;
pub mod tokenizer;

use std::marker::PhantomData;

use indexmap::IndexSet;
use num::Float;
use rayon::prelude::*;
use ::serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::math::vector::SparseVec;
use crate::vectorizer::{corpus::Corpus, term::TermFrequency, tfidf::{DefaultTFIDFEngine, TFIDFEngine}, tokenizer::Tokenizer};

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 10_000;

/// Vectorizer settings, fixed at fit time and stored with the fitted model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// keep at most this many terms
    pub max_features: usize,
    /// drop terms shorter than this many characters
    pub min_term_len: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            min_term_len: 1,
        }
    }
}

/// TF-IDF Vectorizer
///
/// Learns a fixed vocabulary and IDF weights from a corpus, then maps any text
/// to an L2-normalized sparse TF-IDF vector over that vocabulary.
///
/// - column index = position of the term in `vocabulary` (lexical order)
/// - `idf[i]` is the weight of column `i`
///
/// `TFIDFVectorizer<N, E>` has the following generic parameters:
/// - `N`: weight type (`f32` or `f64`)
/// - `E`: TF-IDF calculation engine (e.g. `DefaultTFIDFEngine`)
///
/// Fitting is deterministic: the same texts and config give the same
/// vocabulary and bit-identical weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TFIDFVectorizer<N = f64, E = DefaultTFIDFEngine>
where
    N: Float,
{
    config: VectorizerConfig,
    /// 語彙 (列順)
    vocabulary: IndexSet<Box<str>>,
    /// IDF Vector
    idf: Vec<N>,
    /// number of documents seen at fit time
    doc_num: u64,
    #[serde(skip)]
    _marker: PhantomData<fn() -> E>,
}

impl<N, E> TFIDFVectorizer<N, E>
where
    N: Float + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    /// Learn vocabulary and IDF from `texts`
    ///
    /// Fails with `EmptyVocabulary` when no term survives filtering.
    pub fn fit<S>(config: VectorizerConfig, texts: &[S]) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        if config.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".into()));
        }
        let tokenizer = Tokenizer::new(config.min_term_len);
        let freqs: Vec<TermFrequency> = texts
            .par_iter()
            .map(|text| Self::term_frequency(&tokenizer, text.as_ref()))
            .collect();

        // コーパス統計は順序通りに積む
        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_doc(freq);
        }
        if corpus.vocab_size() == 0 {
            return Err(Error::EmptyVocabulary { docs: texts.len() });
        }

        let vocabulary: IndexSet<Box<str>> = corpus.top_terms(config.max_features).into_iter().collect();
        let idf = E::idf_vec(&corpus, &vocabulary);
        debug!(
            docs = corpus.get_doc_num(),
            distinct_terms = corpus.vocab_size(),
            vocabulary = vocabulary.len(),
            "fitted tf-idf vocabulary"
        );

        Ok(Self {
            config,
            vocabulary,
            idf,
            doc_num: corpus.get_doc_num(),
            _marker: PhantomData,
        })
    }

    /// Fit then transform the same texts
    pub fn fit_transform<S>(config: VectorizerConfig, texts: &[S]) -> Result<(Self, Vec<SparseVec<N>>)>
    where
        S: AsRef<str> + Sync,
    {
        let vectorizer = Self::fit(config, texts)?;
        let matrix = vectorizer.transform(texts);
        Ok((vectorizer, matrix))
    }

    /// Map texts to normalized TF-IDF vectors, one per text, in input order
    pub fn transform<S>(&self, texts: &[S]) -> Vec<SparseVec<N>>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.transform_one(text.as_ref()))
            .collect()
    }

    /// Map one text to its normalized TF-IDF vector
    ///
    /// A text with no vocabulary term becomes the zero vector.
    pub fn transform_one(&self, text: &str) -> SparseVec<N> {
        let freq = Self::term_frequency(&self.tokenizer(), text);
        let mut vec = E::tf_idf_vec(&freq, &self.vocabulary, &self.idf);
        vec.normalize();
        vec.shrink_to_fit();
        vec
    }

    fn term_frequency(tokenizer: &Tokenizer, text: &str) -> TermFrequency {
        let mut freq = TermFrequency::new();
        freq.add_terms(&tokenizer.tokenize(text));
        freq
    }
}

impl<N, E> TFIDFVectorizer<N, E>
where
    N: Float,
{
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.config.min_term_len)
    }

    /// Terms in column order
    pub fn vocabulary(&self) -> &IndexSet<Box<str>> {
        &self.vocabulary
    }

    /// Dimensionality of produced vectors
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column of `term`, if it is in the vocabulary
    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    pub fn idf(&self) -> &[N] {
        &self.idf
    }

    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Structural check for a deserialized model
    pub(crate) fn is_consistent(&self) -> bool {
        !self.vocabulary.is_empty()
            && self.vocabulary.len() == self.idf.len()
            && self.idf.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS: [&str; 3] = [
        "Cats and dogs play",
        "Dogs play in the park",
        "Stock market rises today",
    ];

    fn fit(docs: &[&str]) -> TFIDFVectorizer {
        TFIDFVectorizer::fit(VectorizerConfig::default(), docs).unwrap()
    }

    #[test]
    fn vocabulary_is_lexical_and_stop_word_free() {
        let v = fit(&DOCS);
        let terms: Vec<&str> = v.vocabulary().iter().map(|t| t.as_ref()).collect();
        assert_eq!(
            terms,
            vec!["cats", "dogs", "market", "park", "play", "rises", "stock", "today"]
        );
        assert_eq!(v.column_of("dogs"), Some(1));
        assert_eq!(v.column_of("the"), None);
        assert_eq!(v.idf().len(), v.vocab_size());
        assert_eq!(v.doc_num(), 3);
    }

    #[test]
    fn max_features_keeps_most_frequent_terms() {
        let config = VectorizerConfig { max_features: 2, ..Default::default() };
        let v: TFIDFVectorizer = TFIDFVectorizer::fit(config, &DOCS).unwrap();
        let terms: Vec<&str> = v.vocabulary().iter().map(|t| t.as_ref()).collect();
        // dogs=2, play=2 beat every single-occurrence term
        assert_eq!(terms, vec!["dogs", "play"]);
    }

    #[test]
    fn empty_vocabulary_is_an_error() {
        let err = TFIDFVectorizer::<f64>::fit(VectorizerConfig::default(), &["the and of", "123 !!"]).unwrap_err();
        assert!(matches!(err, Error::EmptyVocabulary { docs: 2 }));
        let err = TFIDFVectorizer::<f64>::fit::<&str>(VectorizerConfig::default(), &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyVocabulary { docs: 0 }));
    }

    #[test]
    fn zero_max_features_is_rejected() {
        let config = VectorizerConfig { max_features: 0, ..Default::default() };
        assert!(matches!(
            TFIDFVectorizer::<f64>::fit(config, &DOCS),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn transform_produces_unit_vectors_of_vocab_dimension() {
        let v = fit(&DOCS);
        for vec in v.transform(&DOCS) {
            assert_eq!(vec.len(), v.vocab_size());
            assert!((vec.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn unseen_terms_are_ignored() {
        let v = fit(&DOCS);
        let vec = v.transform_one("unicorn galaxy");
        assert!(vec.is_zero());
        assert_eq!(vec.len(), v.vocab_size());
        let vec = v.transform_one("unicorn dogs");
        assert_eq!(vec.nnz(), 1);
        assert!((vec.get(v.column_of("dogs").unwrap()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn transform_preserves_input_order() {
        let v = fit(&DOCS);
        let batch = v.transform(&DOCS);
        for (i, doc) in DOCS.iter().enumerate() {
            assert_eq!(batch[i], v.transform_one(doc));
        }
    }

    #[test]
    fn fit_is_deterministic() {
        let a = fit(&DOCS);
        let b = fit(&DOCS);
        assert_eq!(a.vocabulary(), b.vocabulary());
        let a_bits: Vec<u64> = a.idf().iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u64> = b.idf().iter().map(|v| v.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
        assert_eq!(a.transform(&DOCS), b.transform(&DOCS));
    }

    #[test]
    fn cbor_roundtrip_keeps_column_semantics() {
        let v = fit(&DOCS);
        let bytes = serde_cbor::to_vec(&v).unwrap();
        let de: TFIDFVectorizer = serde_cbor::from_slice(&bytes).unwrap();
        assert!(de.is_consistent());
        assert_eq!(de.vocabulary(), v.vocabulary());
        assert_eq!(de.transform(&DOCS), v.transform(&DOCS));
    }

    /// idf = 1 for every term, so weights are plain counts before normalization.
    /// The marker keeps the engine `!Sync`; the vectorizer itself stays shareable.
    #[derive(Debug, Clone)]
    struct CountOnlyEngine(PhantomData<std::cell::Cell<u8>>);

    impl TFIDFEngine<f64> for CountOnlyEngine {
        fn idf_vec(_corpus: &Corpus, vocabulary: &IndexSet<Box<str>>) -> Vec<f64> {
            vec![1.0; vocabulary.len()]
        }

        fn tf_idf_vec(freq: &TermFrequency, vocabulary: &IndexSet<Box<str>>, idf: &[f64]) -> SparseVec<f64> {
            let pairs = freq
                .iter()
                .filter_map(|(term, count)| {
                    let col = vocabulary.get_index_of(term)?;
                    Some((col as u32, count as f64 * idf[col]))
                })
                .collect();
            SparseVec::from_pairs(vocabulary.len(), pairs)
        }
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engine_without_sync_still_transforms_in_parallel() {
        assert_send_sync::<TFIDFVectorizer<f64, CountOnlyEngine>>();

        let v: TFIDFVectorizer<f64, CountOnlyEngine> =
            TFIDFVectorizer::fit(VectorizerConfig::default(), &DOCS).unwrap();
        let m = v.transform(&DOCS);
        assert_eq!(m.len(), DOCS.len());
        // "cats dogs play": three columns of equal weight
        let third = 1.0 / 3.0f64.sqrt();
        for term in ["cats", "dogs", "play"] {
            assert!((m[0].get(v.column_of(term).unwrap()) - third).abs() < 1e-12);
        }
        assert_eq!(m[0].nnz(), 3);
    }

    #[test]
    fn f32_weights_are_supported() {
        let v: TFIDFVectorizer<f32> = TFIDFVectorizer::fit(VectorizerConfig::default(), &DOCS).unwrap();
        let m = v.transform(&DOCS);
        assert!((m[0].norm() - 1.0).abs() < 1e-6);
    }
}
