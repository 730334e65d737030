//! KD-tree index.
//!
//! Classic median-split tree: at depth d the splitting axis is `d mod D`,
//! the median point (by stable sort on the axis coordinate) becomes the
//! node, the lower half goes left and the strictly-upper half goes right.
//! Every node holds exactly one point.
//!
//! Axis-aligned bounds are not monotone in cosine similarity, so the query
//! cannot soundly prune a subtree; traversal visits both sides (near side
//! first) and feeds every point through the same bounded heap as
//! [`LinearScan`](crate::LinearScan). The ranking is therefore identical to
//! the linear scan's, including tie-breaks.

use uuid::Uuid;

use crate::error::IndexError;
use crate::similarity;
use crate::storage::VectorSet;
use crate::topk::{Scored, TopK};

struct Node {
    /// Position of the pivot point in the vector set.
    point: u32,
    axis: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

/// Median-split KD-tree over a snapshot.
pub struct KdTree {
    set: VectorSet,
    ids: Vec<Uuid>,
    root: Option<Box<Node>>,
}

impl KdTree {
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
        let set = VectorSet::copy_from(vectors)?;
        let mut positions: Vec<u32> = (0..set.len() as u32).collect();
        let root = Self::split(&set, &mut positions, 0);
        Ok(Self {
            set,
            ids: ids.to_vec(),
            root,
        })
    }

    fn split(set: &VectorSet, positions: &mut [u32], depth: usize) -> Option<Box<Node>> {
        if positions.is_empty() {
            return None;
        }
        let axis = depth % set.dimension();
        // Stable sort: equal coordinates keep insertion order, which keeps
        // rebuilds of the same snapshot structurally identical.
        positions.sort_by(|&a, &b| {
            set.row(a as usize)[axis].total_cmp(&set.row(b as usize)[axis])
        });
        let median = positions.len() / 2;
        let point = positions[median];
        let (lower, rest) = positions.split_at_mut(median);
        let upper = &mut rest[1..];
        Some(Box::new(Node {
            point,
            axis,
            left: Self::split(set, lower, depth + 1),
            right: Self::split(set, upper, depth + 1),
        }))
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
        if let Some(root) = &self.root {
            self.descend(root, query, &mut top)?;
        }
        Ok(top
            .into_ranked()
            .into_iter()
            .map(|s| (self.ids[s.ord as usize], s.score))
            .collect())
    }

    fn descend(&self, node: &Node, query: &[f64], top: &mut TopK) -> Result<(), IndexError> {
        let pivot = self.set.row(node.point as usize);
        let score = similarity::cosine(query, pivot)?;
        top.push(Scored { score, ord: node.point });

        let (near, far) = if query[node.axis] < pivot[node.axis] {
            (&node.left, &node.right)
        } else {
            (&node.right, &node.left)
        };
        if let Some(child) = near {
            self.descend(child, query, top)?;
        }
        if let Some(child) = far {
            self.descend(child, query, top)?;
        }
        Ok(())
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
