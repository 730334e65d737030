//! Exhaustive linear-scan index.

use uuid::Uuid;

use crate::error::IndexError;
use crate::similarity;
use crate::storage::VectorSet;
use crate::topk::{Scored, TopK};

/// Brute-force cosine index.
///
/// Scores every stored vector against the query and keeps the top k by
/// partial heap selection: O(n·d) per query, nothing to build beyond the
/// snapshot copy. This is the reference ranking the other index structures
/// are held to.
pub struct LinearScan {
    set: VectorSet,
    ids: Vec<Uuid>,
}

impl LinearScan {
    /// Build from parallel `(vectors, ids)` slices, copying both.
    ///
    /// # Errors
    ///
    /// [`IndexError::DimensionMismatch`] if the vectors are not uniform
    /// length, [`IndexError::InvalidParameter`] if the slices disagree in
    /// length.
    pub fn build(vectors: &[Vec<f64>], ids: &[Uuid]) -> Result<Self, IndexError> {
        if vectors.len() != ids.len() {
            return Err(IndexError::InvalidParameter(format!(
                "{} vectors but {} ids",
                vectors.len(),
                ids.len()
            )));
        }
        Ok(Self {
            set: VectorSet::copy_from(vectors)?,
            ids: ids.to_vec(),
        })
    }

    /// Up to k `(id, similarity)` pairs, best first.
    ///
    /// # Errors
    ///
    /// [`IndexError::DimensionMismatch`] if the query length differs from
    /// the index dimension (never raised by an empty index).
    pub fn knn(&self, query: &[f64], k: usize) -> Result<Vec<(Uuid, f64)>, IndexError> {
        if self.set.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        self.set.check_query(query)?;

        let mut top = TopK::new(k);
        for i in 0..self.set.len() {
            let score = similarity::cosine(query, self.set.row(i))?;
            top.push(Scored { score, ord: i as u32 });
        }
        Ok(top
            .into_ranked()
            .into_iter()
            .map(|s| (self.ids[s.ord as usize], s.score))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.set.dimension()
    }
}
