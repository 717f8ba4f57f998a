use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::articles::ArticleTable;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::knn::{BruteForceIndex, NeighborIndex};
use crate::pipeline::artifacts::Artifacts;
use crate::vectorizer::TFIDFVectorizer;

/// Articles shown in the post-build sample
const SAMPLE_K: usize = 3;

/// First `*.csv` in `data_dir`, by file name
pub fn find_input_csv(data_dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(data_dir)
        .map_err(|e| Error::NoInputData(format!("cannot read {}: {e}", data_dir.display())))?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoInputData(format!("no csv file in {}", data_dir.display())))
}

/// Run the whole build: load, fit, index, publish.
///
/// `input` overrides the data directory lookup. Nothing is published unless
/// every stage succeeds.
pub fn build_artifacts(config: &Config, input: Option<&Path>) -> Result<Artifacts> {
    config.validate()?;
    let input = match input {
        Some(path) => path.to_path_buf(),
        None => find_input_csv(&config.data_dir)?,
    };
    info!(input = %input.display(), "loading corpus");
    let articles = ArticleTable::from_csv_path(&input, &config.corpus.text_columns)?;
    info!(
        articles = articles.len(),
        text_columns = ?articles.text_column_names(),
        "derived full_text"
    );

    let (vectorizer, matrix) = TFIDFVectorizer::fit_transform(config.vectorizer, articles.full_texts())?;
    info!(vocabulary = vectorizer.vocab_size(), "fitted vectorizer");
    let index = BruteForceIndex::fit(matrix)?;
    info!(rows = index.len(), dim = index.dim(), "fitted similarity index");

    let artifacts = Artifacts::new(articles, vectorizer, index)?;
    artifacts.save(&config.artifacts_dir)?;
    report_sample(&artifacts);
    Ok(artifacts)
}

fn report_sample(artifacts: &Artifacts) {
    if artifacts.len() < 2 {
        return;
    }
    match artifacts.recommend(0, SAMPLE_K) {
        Ok(recs) => {
            for rec in recs {
                info!(idx = rec.idx, title = %rec.title, "sample recommendation for article 0");
            }
        }
        Err(e) => warn!(error = %e, "sample recommendation failed"),
    }
}
