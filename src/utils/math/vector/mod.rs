pub mod math;
pub mod serde;

use std::fmt::Debug;

use num::Float;

/// SparseVec は 0 要素を疎とした疎ベクトルの実装です
///
/// Only non-zero entries are stored, as two parallel arrays:
/// `inds` holds the column of each entry and `vals` its value.
/// `len` is the logical dimensionality of the vector.
///
/// Entries are guaranteed to be sorted by `inds` in strictly ascending order,
/// which lets `dot` walk both vectors with a single merge pass.
#[derive(Clone, PartialEq)]
pub struct SparseVec<N>
where
    N: Float,
{
    inds: Vec<u32>,
    vals: Vec<N>,
    len: usize,
}

impl<N> SparseVec<N>
where
    N: Float,
{
    /// Create the zero vector of dimensionality `len`
    #[inline]
    pub fn new(len: usize) -> Self {
        Self {
            inds: Vec::new(),
            vals: Vec::new(),
            len,
        }
    }

    /// Build a vector from `(column, value)` pairs in any order.
    ///
    /// Duplicate columns are summed and zero values are dropped.
    /// Every column must be `< len`.
    pub fn from_pairs(len: usize, mut pairs: Vec<(u32, N)>) -> Self {
        pairs.sort_unstable_by_key(|(ind, _)| *ind);
        let mut inds: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut vals: Vec<N> = Vec::with_capacity(pairs.len());
        for (ind, val) in pairs {
            debug_assert!((ind as usize) < len, "column {ind} out of range for len {len}");
            match inds.last() {
                Some(&last) if last == ind => {
                    // 同一列は加算
                    if let Some(prev) = vals.last_mut() {
                        *prev = *prev + val;
                    }
                }
                _ => {
                    inds.push(ind);
                    vals.push(val);
                }
            }
        }
        let mut vec = Self { inds, vals, len };
        vec.drop_zeros();
        vec
    }

    /// Build a vector from a dense slice, keeping only non-zero values
    pub fn from_dense(dense: &[N]) -> Self {
        let mut inds = Vec::new();
        let mut vals = Vec::new();
        for (i, &v) in dense.iter().enumerate() {
            if v != N::zero() {
                inds.push(i as u32);
                vals.push(v);
            }
        }
        Self {
            inds,
            vals,
            len: dense.len(),
        }
    }

    /// Assemble from already validated parts (used by deserialization)
    pub(crate) fn from_raw_parts(inds: Vec<u32>, vals: Vec<N>, len: usize) -> Self {
        debug_assert_eq!(inds.len(), vals.len());
        Self { inds, vals, len }
    }

    /// logical dimensionality
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// number of stored (non-zero) entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// true if no entry is stored, i.e. this is the zero vector
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    /// Get the value at `index`, zero if the entry is not stored
    #[inline]
    pub fn get(&self, index: usize) -> N {
        if index > u32::MAX as usize {
            return N::zero();
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate stored entries as `(column, value)` in ascending column order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter())
            .map(|(&i, &v)| (i as usize, v))
    }

    /// Expand into a dense vector of length `len`
    pub fn to_dense(&self) -> Vec<N> {
        let mut dense = vec![N::zero(); self.len];
        for (i, v) in self.raw_iter() {
            dense[i] = v;
        }
        dense
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }

    fn drop_zeros(&mut self) {
        if self.vals.iter().all(|v| *v != N::zero()) {
            return;
        }
        let mut w = 0;
        for r in 0..self.vals.len() {
            if self.vals[r] != N::zero() {
                self.inds[w] = self.inds[r];
                self.vals[w] = self.vals[r];
                w += 1;
            }
        }
        self.inds.truncate(w);
        self.vals.truncate(w);
    }
}

impl<N> Debug for SparseVec<N>
where
    N: Float + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "SparseVec(len: {}, nnz: {}) [", self.len, self.nnz())?;
            for (i, v) in self.raw_iter() {
                writeln!(f, "    {}: {:?}", i, v)?;
            }
            write!(f, "]")
        } else {
            f.debug_struct("SparseVec")
                .field("len", &self.len)
                .field("entries", &self.raw_iter().collect::<Vec<_>>())
                .finish()
        }
    }
}
