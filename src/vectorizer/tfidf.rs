use indexmap::IndexSet;
use num::Float;

use crate::{utils::math::vector::SparseVec, vectorizer::{corpus::Corpus, term::TermFrequency}};

/// TF-IDF calculation engine
///
/// Plug a different weighting strategy into `TFIDFVectorizer<N, E>`
/// by implementing this trait.
pub trait TFIDFEngine<N>
where
    N: Float,
{
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `corpus` - コーパス
    /// * `vocabulary` - 列順に並んだ語彙
    /// # Returns
    /// * `Vec<N>` - IDFベクトル (vocabulary と同じ長さ)
    fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<Box<str>>) -> Vec<N>;

    /// 1 文書の TF-IDF ベクトル (未正規化)
    /// Terms outside `vocabulary` are ignored.
    fn tf_idf_vec(freq: &TermFrequency, vocabulary: &IndexSet<Box<str>>, idf: &[N]) -> SparseVec<N>;
}

/// デフォルトのTF-IDFエンジン
///
/// - tf  = raw count of the term in the document
/// - idf = ln((1 + n) / (1 + df)) + 1
///
/// The `+1` smoothing keeps idf finite for unseen terms and positive for
/// terms present in every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    #[inline]
    pub fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}

impl<N> TFIDFEngine<N> for DefaultTFIDFEngine
where
    N: Float + Into<f64>,
{
    fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<Box<str>>) -> Vec<N> {
        let doc_num = corpus.get_doc_num();
        vocabulary
            .iter()
            .map(|term| {
                let idf = Self::idf(doc_num, corpus.get_doc_freq(term));
                num::cast::<f64, N>(idf).unwrap_or_else(N::zero)
            })
            .collect()
    }

    fn tf_idf_vec(freq: &TermFrequency, vocabulary: &IndexSet<Box<str>>, idf: &[N]) -> SparseVec<N> {
        let pairs: Vec<(u32, N)> = freq
            .iter()
            .filter_map(|(term, count)| {
                // 語彙外は無視
                let col = vocabulary.get_index_of(term)?;
                let idf: f64 = idf[col].into();
                let weight = num::cast::<f64, N>(count as f64 * idf)?;
                Some((col as u32, weight))
            })
            .collect();
        SparseVec::from_pairs(vocabulary.len(), pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus_of(docs: &[&[&str]]) -> Corpus {
        let mut corpus = Corpus::new();
        for doc in docs {
            let mut tf = TermFrequency::new();
            tf.add_terms(doc);
            corpus.add_doc(&tf);
        }
        corpus
    }

    #[test]
    fn idf_is_smoothed() {
        // term in every document still has idf 1
        assert_eq!(DefaultTFIDFEngine::idf(3, 3), 1.0);
        // rarer terms weigh more
        assert!(DefaultTFIDFEngine::idf(3, 1) > DefaultTFIDFEngine::idf(3, 2));
        // unseen term is finite
        assert!(DefaultTFIDFEngine::idf(3, 0).is_finite());
    }

    #[test]
    fn idf_vec_follows_vocabulary_order() {
        let corpus = corpus_of(&[&["cats", "dogs"], &["dogs"]]);
        let vocab: IndexSet<Box<str>> = ["cats", "dogs"].iter().map(|s| Box::<str>::from(*s)).collect();
        let idf: Vec<f64> = <DefaultTFIDFEngine as TFIDFEngine<f64>>::idf_vec(&corpus, &vocab);
        assert_eq!(idf.len(), 2);
        assert!((idf[0] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert_eq!(idf[1], 1.0);
    }

    #[test]
    fn tf_idf_vec_multiplies_count_by_idf_and_skips_unknown_terms() {
        let vocab: IndexSet<Box<str>> = ["cats", "dogs"].iter().map(|s| Box::<str>::from(*s)).collect();
        let idf = vec![2.0f64, 0.5];
        let mut tf = TermFrequency::new();
        tf.add_terms(&["dogs", "dogs", "unicorn", "cats"]);
        let v = <DefaultTFIDFEngine as TFIDFEngine<f64>>::tf_idf_vec(&tf, &vocab, &idf);
        assert_eq!(v.len(), 2);
        assert_eq!(v.get(0), 2.0);
        assert_eq!(v.get(1), 1.0);
    }

    #[test]
    fn works_for_f32() {
        let corpus = corpus_of(&[&["a"], &["b"]]);
        let vocab: IndexSet<Box<str>> = ["a", "b"].iter().map(|s| Box::<str>::from(*s)).collect();
        let idf: Vec<f32> = <DefaultTFIDFEngine as TFIDFEngine<f32>>::idf_vec(&corpus, &vocab);
        assert_eq!(idf[0], idf[1]);
    }
}
