use std::cmp::Ordering;

use num::Float;

use super::SparseVec;

impl<N> SparseVec<N>
where
    N: Float + Into<f64>,
{
    /// ドット積を計算するメソッド
    /// d(a, b) = Σ(a_i * b_i)
    ///
    /// Accumulates in `f64` regardless of `N`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );

        let mut result = 0.0_f64;
        if self.is_zero() || other.is_zero() {
            return result;
        }

        let (a_inds, a_vals) = (&self.inds, &self.vals);
        let (b_inds, b_vals) = (&other.inds, &other.vals);
        let mut i = 0;
        let mut j = 0;
        while i < a_inds.len() && j < b_inds.len() {
            match a_inds[i].cmp(&b_inds[j]) {
                Ordering::Equal => {
                    let a: f64 = a_vals[i].into();
                    let b: f64 = b_vals[j].into();
                    result += a * b;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// 二乗ノルム
    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.vals
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .sum()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// L2 正規化
    /// The zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm == 0.0 {
            return;
        }
        for v in self.vals.iter_mut() {
            let value: f64 = (*v).into();
            *v = num::cast::<f64, N>(value / norm).unwrap_or_else(N::zero);
        }
    }

    /// Cosine distance between two L2-normalized vectors: `1 - dot(a, b)`.
    ///
    /// Clamped to `[0, 2]` so rounding never produces a negative distance
    /// for identical vectors.
    #[inline]
    pub fn cosine_distance_normalized(&self, other: &Self) -> f64 {
        (1.0 - self.dot(other)).clamp(0.0, 2.0)
    }

    /// コサイン類似度
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    ///
    /// Works on unnormalized vectors; 0.0 if either side is the zero vector.
    pub fn cosine_similarity(&self, other: &Self) -> f64 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            0.0
        } else {
            self.dot(other) / denom
        }
    }
}
