//! Library-scoped kNN index family.
//!
//! This crate is the retrieval engine of the shelf vector store: three
//! interchangeable index structures over a bulk snapshot of `(embedding,
//! chunk-id)` pairs, ranked by cosine similarity.
//!
//! # Index family
//!
//! - [`LinearScan`] — exhaustive scoring with partial heap selection.
//!   O(n·d) per query; the reference ranking.
//! - [`KdTree`] — median-split tree with unpruned traversal. Matches
//!   `LinearScan` exactly (axis-aligned pruning is unsound under cosine,
//!   so none is attempted).
//! - [`RandomProjection`] — single-table sign-of-projection LSH. Approximate:
//!   a query sees only its own bucket. Seedable for reproducible builds.
//!
//! The three share ranking semantics: descending cosine similarity, ties
//! broken by insertion order, at most k results, empty input yields empty
//! output. [`VectorIndex`] is the tagged variant the store installs per
//! library, and [`IndexKind`] selects an algorithm by wire name.
//!
//! # Build contract
//!
//! Indices are built in bulk from a snapshot and never mutated; updating a
//! corpus means rebuilding its index. Builds copy their input, so the
//! snapshot may be dropped (or the corpus mutated) immediately afterwards.
//!
//! # Example
//!
//! ```rust
//! use shelf_index::{IndexKind, LshParams, VectorIndex};
//! use uuid::Uuid;
//!
//! let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
//! let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
//!
//! let index = VectorIndex::build(IndexKind::Linear, &vectors, &ids, &LshParams::default())?;
//! let hits = index.knn(&[1.0, 0.1], 5)?;
//! assert_eq!(hits[0].0, ids[0]);
//! # Ok::<(), shelf_index::IndexError>(())
//! ```

/// Cosine similarity kernel.
pub mod similarity;

/// Error types for build and query operations.
pub mod error;

/// Exhaustive linear-scan index (reference implementation).
pub mod linear;

/// Median-split KD-tree index.
pub mod kdtree;

/// Single-table random-projection LSH index.
pub mod lsh;

/// Tagged index variant and algorithm selection.
pub mod index;

mod storage;
mod topk;

pub use error::IndexError;
pub use index::{IndexKind, VectorIndex};
pub use kdtree::KdTree;
pub use linear::LinearScan;
pub use lsh::{LshParams, RandomProjection};

/// Re-export of commonly used types.
pub mod prelude {
    pub use crate::error::IndexError;
    pub use crate::index::{IndexKind, VectorIndex};
    pub use crate::kdtree::KdTree;
    pub use crate::linear::LinearScan;
    pub use crate::lsh::{LshParams, RandomProjection};
    pub use crate::similarity::cosine;
}
