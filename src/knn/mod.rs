use std::cmp::Ordering;

use num::Float;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::math::vector::SparseVec;

/// One search result: row index and cosine distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

impl Neighbor {
    /// ascending distance, ties by ascending index
    #[inline]
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Nearest-neighbor index over a fixed matrix of L2-normalized rows.
///
/// Results are ordered by ascending cosine distance, ties by ascending row
/// index. The query row itself is part of the result set; excluding it is up
/// to the caller.
pub trait NeighborIndex<N>
where
    N: Float,
{
    /// Build the index over `matrix`, rows in corpus order
    fn fit(matrix: Vec<SparseVec<N>>) -> Result<Self>
    where
        Self: Sized;

    /// Up to `k + 1` nearest rows to row `vector_index` (itself included)
    fn query(&self, vector_index: usize, k: usize) -> Result<Vec<Neighbor>>;

    /// Up to `n_neighbors` nearest rows to an arbitrary vector
    fn kneighbors(&self, vector: &SparseVec<N>, n_neighbors: usize) -> Result<Vec<Neighbor>>;

    /// number of rows
    fn len(&self) -> usize;

    /// dimensionality of every row
    fn dim(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exhaustive cosine-distance search.
///
/// Every query compares against all rows, O(rows · nnz). No auxiliary
/// structure is kept; this is the scaling ceiling of the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BruteForceIndex<N = f64>
where
    N: Float,
{
    matrix: Vec<SparseVec<N>>,
    dim: usize,
}

impl<N> BruteForceIndex<N>
where
    N: Float + Into<f64> + Send + Sync,
{
    /// Row `index` of the fitted matrix
    pub fn row(&self, index: usize) -> Option<&SparseVec<N>> {
        self.matrix.get(index)
    }

    /// Structural check for a deserialized index
    pub(crate) fn is_consistent(&self) -> bool {
        self.matrix.iter().all(|row| row.len() == self.dim)
    }

    fn search(&self, vector: &SparseVec<N>, n: usize) -> Vec<Neighbor> {
        let mut scored: Vec<Neighbor> = self
            .matrix
            .par_iter()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: vector.cosine_distance_normalized(row),
            })
            .collect();

        let n = n.min(scored.len());
        if n == 0 {
            return Vec::new();
        }
        // 上位 n 件だけ選んでからソート
        if n < scored.len() {
            scored.select_nth_unstable_by(n - 1, Neighbor::rank_cmp);
            scored.truncate(n);
        }
        scored.sort_unstable_by(Neighbor::rank_cmp);
        scored
    }
}

impl<N> NeighborIndex<N> for BruteForceIndex<N>
where
    N: Float + Into<f64> + Send + Sync,
{
    fn fit(matrix: Vec<SparseVec<N>>) -> Result<Self> {
        let dim = matrix.first().map_or(0, |row| row.len());
        if let Some(row) = matrix.iter().find(|row| row.len() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: row.len(),
            });
        }
        Ok(Self { matrix, dim })
    }

    fn query(&self, vector_index: usize, k: usize) -> Result<Vec<Neighbor>> {
        let rows = self.matrix.len();
        let vector = self.matrix.get(vector_index).ok_or(Error::IndexOutOfRange {
            index: vector_index,
            rows,
        })?;
        if k == 0 {
            return Err(Error::InvalidNeighborCount { k });
        }
        Ok(self.search(vector, k.saturating_add(1)))
    }

    fn kneighbors(&self, vector: &SparseVec<N>, n_neighbors: usize) -> Result<Vec<Neighbor>> {
        if n_neighbors == 0 {
            return Err(Error::InvalidNeighborCount { k: n_neighbors });
        }
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        Ok(self.search(vector, n_neighbors))
    }

    fn len(&self) -> usize {
        self.matrix.len()
    }

    fn dim(&self) -> usize {
        self.dim
    }
}
