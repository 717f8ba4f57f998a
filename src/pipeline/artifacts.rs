use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::articles::{search::SearchHit, ArticleTable, TextLayout};
use crate::error::{Error, Result};
use crate::knn::{BruteForceIndex, NeighborIndex};
use crate::vectorizer::TFIDFVectorizer;

/// Corpus table with `full_text`
pub const ARTICLES_FILE: &str = "articles.csv";
/// Fitted vectorizer plus the text layout of the corpus table
pub const VECTORIZER_FILE: &str = "tfidf.cbor";
/// Fitted neighbor index
pub const INDEX_FILE: &str = "knn.cbor";

/// Contents of `VECTORIZER_FILE`
#[derive(Serialize, Deserialize)]
struct VectorizerData<V> {
    layout: TextLayout,
    vectorizer: V,
}

/// The fitted model: corpus, vectorizer and index, always handled together.
///
/// Row `i` of the corpus is row `i` of the index matrix. Instances are
/// immutable once built or loaded.
#[derive(Debug, Clone)]
pub struct Artifacts {
    articles: ArticleTable,
    vectorizer: TFIDFVectorizer,
    index: BruteForceIndex,
}

impl Artifacts {
    /// Bundle freshly fitted parts, checking that they line up
    pub fn new(articles: ArticleTable, vectorizer: TFIDFVectorizer, index: BruteForceIndex) -> Result<Self> {
        let artifacts = Self {
            articles,
            vectorizer,
            index,
        };
        artifacts.check_consistency()?;
        Ok(artifacts)
    }

    pub fn articles(&self) -> &ArticleTable {
        &self.articles
    }

    pub fn vectorizer(&self) -> &TFIDFVectorizer {
        &self.vectorizer
    }

    pub fn index(&self) -> &BruteForceIndex {
        &self.index
    }

    /// Number of articles
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Keyword search over the corpus text columns
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.articles.search(query, limit)
    }

    fn check_consistency(&self) -> Result<()> {
        if !self.vectorizer.is_consistent() {
            return Err(Error::ModelNotReady("vectorizer vocabulary and idf disagree".into()));
        }
        if !self.index.is_consistent() {
            return Err(Error::ModelNotReady("index rows have mixed dimensions".into()));
        }
        if self.articles.len() != self.index.len() {
            return Err(Error::ModelNotReady(format!(
                "corpus has {} articles but index has {} rows",
                self.articles.len(),
                self.index.len()
            )));
        }
        if !self.index.is_empty() && self.index.dim() != self.vectorizer.vocab_size() {
            return Err(Error::ModelNotReady(format!(
                "index dimension {} does not match vocabulary size {}",
                self.index.dim(),
                self.vectorizer.vocab_size()
            )));
        }
        Ok(())
    }

    /// Load from `dir`.
    ///
    /// The corpus is read with the text layout saved at build time. Every
    /// failure, including inconsistency between the three files, is reported
    /// as `ModelNotReady`.
    pub fn load<P>(dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        Self::read_dir(dir).map_err(|e| match e {
            Error::ModelNotReady(_) => e,
            other => Error::ModelNotReady(format!("{}: {other}", dir.display())),
        })
    }

    fn read_dir(dir: &Path) -> Result<Self> {
        for name in [ARTICLES_FILE, VECTORIZER_FILE, INDEX_FILE] {
            if !dir.join(name).is_file() {
                return Err(Error::ModelNotReady(format!("{} is missing {name}", dir.display())));
            }
        }
        let data: VectorizerData<TFIDFVectorizer> = serde_cbor::from_slice(&fs::read(dir.join(VECTORIZER_FILE))?)?;
        let articles = ArticleTable::read_artifact(dir.join(ARTICLES_FILE), &data.layout)?;
        let index: BruteForceIndex = serde_cbor::from_slice(&fs::read(dir.join(INDEX_FILE))?)?;
        let artifacts = Self::new(articles, data.vectorizer, index)?;
        debug!(dir = %dir.display(), articles = artifacts.len(), "loaded artifacts");
        Ok(artifacts)
    }

    /// Publish all three files to `dir` as one unit.
    ///
    /// Files are written into a staging directory beside `dir` and swapped in
    /// by rename. On failure the previous contents of `dir` stay in place.
    pub fn save<P>(&self, dir: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let parent = match dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let staging = tempfile::Builder::new().prefix(".artifacts-staging-").tempdir_in(parent)?;
        self.articles.write_csv(staging.path().join(ARTICLES_FILE))?;
        let data = VectorizerData {
            layout: self.articles.layout(),
            vectorizer: &self.vectorizer,
        };
        fs::write(staging.path().join(VECTORIZER_FILE), serde_cbor::to_vec(&data)?)?;
        fs::write(staging.path().join(INDEX_FILE), serde_cbor::to_vec(&self.index)?)?;

        // 旧ディレクトリを退避してから差し替える
        let backup = tempfile::Builder::new().prefix(".artifacts-previous-").tempdir_in(parent)?;
        let backup_path = backup.path().join("artifacts");
        let had_previous = dir.exists();
        if had_previous {
            fs::rename(dir, &backup_path)?;
        }
        if let Err(e) = fs::rename(staging.path(), dir) {
            if had_previous {
                if let Err(restore) = fs::rename(&backup_path, dir) {
                    warn!(dir = %dir.display(), error = %restore, "failed to restore previous artifacts");
                }
            }
            return Err(e.into());
        }
        info!(
            dir = %dir.display(),
            articles = self.len(),
            vocabulary = self.vectorizer.vocab_size(),
            "published artifacts"
        );
        Ok(())
    }
}

/// Load artifacts from `dir`; see [`Artifacts::load`]
pub fn load_artifacts<P>(dir: P) -> Result<Artifacts>
where
    P: AsRef<Path>,
{
    Artifacts::load(dir)
}
