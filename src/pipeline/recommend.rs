use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::knn::{Neighbor, NeighborIndex};
use crate::pipeline::artifacts::Artifacts;

/// Reason attached to every recommendation
pub const REASON: &str = "Textually similar article";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub idx: usize,
    pub title: String,
    pub reason: String,
}

/// Top `k` articles similar to article `idx`.
///
/// Fails with `ModelNotReady` when `artifacts` is absent, before any
/// computation.
pub fn recommend(artifacts: Option<&Artifacts>, idx: usize, k: usize) -> Result<Vec<Recommendation>> {
    let artifacts = artifacts.ok_or_else(|| Error::ModelNotReady("artifacts are not loaded".into()))?;
    artifacts.recommend(idx, k)
}

impl Artifacts {
    /// Top `k` articles similar to `idx`, as recommendations
    pub fn recommend(&self, idx: usize, k: usize) -> Result<Vec<Recommendation>> {
        let neighbors = self.similar(idx, k)?;
        Ok(neighbors
            .into_iter()
            .map(|n| Recommendation {
                idx: n.index,
                title: self.articles().title(n.index).unwrap_or_default().to_string(),
                reason: REASON.to_string(),
            })
            .collect())
    }

    /// Top `k` neighbors of `idx` with their distances, `idx` itself excluded.
    ///
    /// The query vector is recomputed from the stored `full_text`.
    pub fn similar(&self, idx: usize, k: usize) -> Result<Vec<Neighbor>> {
        let text = self.articles().full_text(idx).ok_or(Error::ArticleNotFound {
            idx,
            len: self.len(),
        })?;
        if k == 0 {
            return Err(Error::InvalidNeighborCount { k });
        }
        let query = self.vectorizer().transform_one(text);
        let mut neighbors = self.index().kneighbors(&query, k.saturating_add(1))?;
        neighbors.retain(|n| n.index != idx);
        neighbors.truncate(k);
        Ok(neighbors)
    }
}
