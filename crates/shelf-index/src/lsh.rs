//! Random-projection LSH index.
//!
//! Single-table sign-of-projection hashing for cosine similarity: each
//! vector gets one bit per sampled hyperplane (1 iff its dot product with
//! the plane normal is non-negative), and the packed bit signature selects
//! a bucket. A query linear-scans only the bucket its own signature lands
//! in, so recall is approximate and shrinks as the plane count grows.
//!
//! Plane sampling is the only randomness; with a fixed seed the bucketing
//! is reproducible for the same input.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use uuid::Uuid;

use crate::error::IndexError;
use crate::similarity;
use crate::storage::VectorSet;
use crate::topk::{Scored, TopK};

/// Signatures are packed into a `u64`, one bit per plane.
const MAX_PLANES: usize = 64;

/// Build controls for [`RandomProjection`].
#[derive(Clone, Debug)]
pub struct LshParams {
    /// Number of hyperplanes (signature bits). More planes make smaller,
    /// purer buckets at the cost of recall.
    pub planes: usize,
    /// Seed for plane sampling. `None` samples fresh planes per build.
    pub seed: Option<u64>,
}

impl Default for LshParams {
    fn default() -> Self {
        Self {
            planes: 12,
            seed: None,
        }
    }
}

/// Single-table random-projection LSH over a snapshot.
pub struct RandomProjection {
    set: VectorSet,
    ids: Vec<Uuid>,
    planes: Vec<Vec<f64>>,
    /// Signature -> positions of the vectors bucketed under it.
    buckets: HashMap<u64, Vec<u32>>,
}

impl RandomProjection {
    /// Build from parallel `(vectors, ids)` slices, copying both.
    ///
    /// # Errors
    ///
    /// [`IndexError::InvalidParameter`] if the plane count is 0 or above
    /// 64, or the slices disagree in length;
    /// [`IndexError::DimensionMismatch`] if the vectors are not uniform
    /// length.
    pub fn build(
        vectors: &[Vec<f64>],
        ids: &[Uuid],
        params: &LshParams,
    ) -> Result<Self, IndexError> {
        if params.planes == 0 || params.planes > MAX_PLANES {
            return Err(IndexError::InvalidParameter(format!(
                "plane count must be in 1..={}, got {}",
                MAX_PLANES, params.planes
            )));
        }
        if vectors.len() != ids.len() {
            return Err(IndexError::InvalidParameter(format!(
                "{} vectors but {} ids",
                vectors.len(),
                ids.len()
            )));
        }
        let set = VectorSet::copy_from(vectors)?;

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let planes: Vec<Vec<f64>> = (0..params.planes)
            .map(|_| {
                (0..set.dimension())
                    .map(|_| rng.sample(StandardNormal))
                    .collect()
            })
            .collect();

        let mut buckets: HashMap<u64, Vec<u32>> = HashMap::new();
        for i in 0..set.len() {
            let sig = signature(&planes, set.row(i));
            buckets.entry(sig).or_default().push(i as u32);
        }

        Ok(Self {
            set,
            ids: ids.to_vec(),
            planes,
            buckets,
        })
    }

    /// Up to k `(id, similarity)` pairs from the query's bucket, best first.
    ///
    /// A signature with no bucket yields the empty result.
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

        let sig = signature(&self.planes, query);
        let Some(bucket) = self.buckets.get(&sig) else {
            return Ok(Vec::new());
        };

        let mut top = TopK::new(k);
        for &i in bucket {
            let score = similarity::cosine(query, self.set.row(i as usize))?;
            top.push(Scored { score, ord: i });
        }
        Ok(top
            .into_ranked()
            .into_iter()
            .map(|s| (self.ids[s.ord as usize], s.score))
            .collect())
    }

    /// Number of occupied buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
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

/// Sign-of-projection signature, one bit per plane, first plane in the
/// highest position.
fn signature(planes: &[Vec<f64>], vector: &[f64]) -> u64 {
    let mut sig = 0u64;
    for plane in planes {
        let bit = u64::from(similarity::dot(plane, vector) >= 0.0);
        sig = (sig << 1) | bit;
    }
    sig
}
