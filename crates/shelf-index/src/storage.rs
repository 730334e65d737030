//! Flat vector storage shared by the index structures.

use crate::error::IndexError;

/// A fixed-dimension vector set in flat row-major storage.
///
/// Row `i` lives at `data[i * dimension .. (i + 1) * dimension]`. Built once
/// from a snapshot and never mutated afterwards.
#[derive(Debug)]
pub(crate) struct VectorSet {
    data: Vec<f64>,
    dimension: usize,
    len: usize,
}

impl VectorSet {
    /// Copy a snapshot into flat storage.
    ///
    /// The dimension is taken from the first vector; an empty snapshot has
    /// dimension 0.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] if any vector disagrees
    /// with the first one's length, [`IndexError::InvalidParameter`] for
    /// zero-component vectors.
    pub fn copy_from(vectors: &[Vec<f64>]) -> Result<Self, IndexError> {
        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 && !vectors.is_empty() {
            return Err(IndexError::InvalidParameter(
                "vectors must have at least one component".to_string(),
            ));
        }
        let mut data = Vec::with_capacity(vectors.len() * dimension);
        for v in vectors {
            if v.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: v.len(),
                });
            }
            data.extend_from_slice(v);
        }
        Ok(Self {
            data,
            dimension,
            len: vectors.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Row `idx` as a slice.
    pub fn row(&self, idx: usize) -> &[f64] {
        let start = idx * self.dimension;
        &self.data[start..start + self.dimension]
    }

    /// Fail unless `query` matches the stored dimension.
    pub fn check_query(&self, query: &[f64]) -> Result<(), IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        Ok(())
    }
}
