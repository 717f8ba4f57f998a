use num::Float;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::SparseVec;

impl<N> Serialize for SparseVec<N>
where
    N: Float + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // len, nnz, entries の 3 フィールド
        let mut state = serializer.serialize_struct("SparseVec", 3)?;
        state.serialize_field("len", &(self.len as u64))?;
        state.serialize_field("nnz", &(self.nnz() as u64))?;
        // entries: (index, value) を昇順で出力
        let entries: Vec<(u32, N)> = self
            .inds
            .iter()
            .copied()
            .zip(self.vals.iter().copied())
            .collect();
        state.serialize_field("entries", &entries)?;
        state.end()
    }
}

impl<'de, N> Deserialize<'de> for SparseVec<N>
where
    N: Float + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SparseVecData<N> {
            len: u64,
            nnz: u64,
            entries: Vec<(u32, N)>,
        }

        let data = SparseVecData::<N>::deserialize(deserializer)?;
        if data.nnz as usize != data.entries.len() {
            return Err(D::Error::custom(format!(
                "nnz {} does not match {} entries",
                data.nnz,
                data.entries.len()
            )));
        }
        let len = data.len as usize;
        let mut inds = Vec::with_capacity(data.entries.len());
        let mut vals = Vec::with_capacity(data.entries.len());
        for (ind, val) in data.entries {
            if ind as usize >= len {
                return Err(D::Error::custom(format!(
                    "entry index {ind} out of range for len {len}"
                )));
            }
            if let Some(&last) = inds.last() {
                if ind <= last {
                    return Err(D::Error::custom("entry indices must be strictly ascending"));
                }
            }
            if !val.is_finite() {
                return Err(D::Error::custom(format!("non-finite value at index {ind}")));
            }
            inds.push(ind);
            vals.push(val);
        }
        Ok(SparseVec::from_raw_parts(inds, vals, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbor_roundtrip_preserves_entries_and_len() {
        let v = SparseVec::<f64>::from_pairs(8, vec![(5, 0.25), (1, 0.5)]);
        let bytes = serde_cbor::to_vec(&v).unwrap();
        let de: SparseVec<f64> = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(de, v);
        assert_eq!(de.len(), 8);
    }

    #[test]
    fn rejects_unsorted_entries() {
        let bad = r#"{"len":4,"nnz":2,"entries":[[3,1.0],[1,1.0]]}"#;
        assert!(serde_json::from_str::<SparseVec<f64>>(bad).is_err());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let bad = r#"{"len":2,"nnz":1,"entries":[[2,1.0]]}"#;
        assert!(serde_json::from_str::<SparseVec<f64>>(bad).is_err());
    }

    #[test]
    fn rejects_nnz_mismatch() {
        let bad = r#"{"len":4,"nnz":3,"entries":[[0,1.0]]}"#;
        assert!(serde_json::from_str::<SparseVec<f64>>(bad).is_err());
    }
}
