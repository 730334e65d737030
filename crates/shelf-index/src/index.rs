//! Tagged index variant and algorithm selection.

use std::fmt;

use uuid::Uuid;

use crate::error::IndexError;
use crate::kdtree::KdTree;
use crate::linear::LinearScan;
use crate::lsh::{LshParams, RandomProjection};

/// The index algorithms the engine can build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Linear,
    KdTree,
    Lsh,
}

impl IndexKind {
    /// Parse a wire name (`"linear"`, `"kd"`, `"lsh"`).
    pub fn parse(name: &str) -> Option<IndexKind> {
        match name {
            "linear" => Some(IndexKind::Linear),
            "kd" => Some(IndexKind::KdTree),
            "lsh" => Some(IndexKind::Lsh),
            _ => None,
        }
    }

    /// The wire name callers select this algorithm by.
    pub fn name(self) -> &'static str {
        match self {
            IndexKind::Linear => "linear",
            IndexKind::KdTree => "kd",
            IndexKind::Lsh => "lsh",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A built kNN index of one of the three variants.
///
/// Self-contained and immutable after build: the snapshot is copied in, so
/// later mutation of the source corpus does not affect an installed index.
pub enum VectorIndex {
    Linear(LinearScan),
    KdTree(KdTree),
    Lsh(RandomProjection),
}

impl VectorIndex {
    /// Build the chosen variant from parallel `(vectors, ids)` slices.
    ///
    /// `lsh` only applies to [`IndexKind::Lsh`].
    pub fn build(
        kind: IndexKind,
        vectors: &[Vec<f64>],
        ids: &[Uuid],
        lsh: &LshParams,
    ) -> Result<Self, IndexError> {
        Ok(match kind {
            IndexKind::Linear => VectorIndex::Linear(LinearScan::build(vectors, ids)?),
            IndexKind::KdTree => VectorIndex::KdTree(KdTree::build(vectors, ids)?),
            IndexKind::Lsh => VectorIndex::Lsh(RandomProjection::build(vectors, ids, lsh)?),
        })
    }

    /// Up to k `(id, similarity)` pairs, best first.
    pub fn knn(&self, query: &[f64], k: usize) -> Result<Vec<(Uuid, f64)>, IndexError> {
        match self {
            VectorIndex::Linear(index) => index.knn(query, k),
            VectorIndex::KdTree(index) => index.knn(query, k),
            VectorIndex::Lsh(index) => index.knn(query, k),
        }
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            VectorIndex::Linear(_) => IndexKind::Linear,
            VectorIndex::KdTree(_) => IndexKind::KdTree,
            VectorIndex::Lsh(_) => IndexKind::Lsh,
        }
    }

    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        match self {
            VectorIndex::Linear(index) => index.len(),
            VectorIndex::KdTree(index) => index.len(),
            VectorIndex::Lsh(index) => index.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Embedding dimension the index was built over (0 when empty).
    pub fn dimension(&self) -> usize {
        match self {
            VectorIndex::Linear(index) => index.dimension(),
            VectorIndex::KdTree(index) => index.dimension(),
            VectorIndex::Lsh(index) => index.dimension(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in [IndexKind::Linear, IndexKind::KdTree, IndexKind::Lsh] {
            assert_eq!(IndexKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(IndexKind::parse("hnsw"), None);
        assert_eq!(IndexKind::parse("Linear"), None);
    }

    #[test]
    fn build_dispatches_to_the_chosen_variant() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let ids = vec![Uuid::from_u128(1), Uuid::from_u128(2)];
        let lsh = LshParams {
            planes: 4,
            seed: Some(1),
        };
        for kind in [IndexKind::Linear, IndexKind::KdTree, IndexKind::Lsh] {
            let index = VectorIndex::build(kind, &vectors, &ids, &lsh).unwrap();
            assert_eq!(index.kind(), kind);
            assert_eq!(index.len(), 2);
            assert_eq!(index.dimension(), 2);
        }
    }
}
