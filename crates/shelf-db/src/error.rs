//! Service error taxonomy.

use std::fmt;

use shelf_index::IndexError;
use thiserror::Error;
use uuid::Uuid;

/// The kinds of entity an operation can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Library,
    Document,
    Chunk,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Library => "library",
            Entity::Document => "document",
            Entity::Chunk => "chunk",
        })
    }
}

/// Errors surfaced to callers of the service.
///
/// Everything here is reported to the caller; the only tolerated
/// inconsistencies are stale chunk ids inside an installed index (dropped
/// from query results) and dangling references during listing (skipped).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The identifier has no binding of the expected kind.
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: Uuid },

    /// The library has no installed index; build one first.
    #[error("library {0} is not indexed")]
    NotIndexed(Uuid),

    /// Unrecognized index algorithm name.
    #[error("unknown index algorithm {0:?}")]
    InvalidAlgo(String),

    /// Engine-level failure: dimension mismatch or a bad build parameter.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A hierarchical reference points at an entity that should exist but
    /// does not. Fatal for the request; the store stays readable.
    #[error("corpus corruption: {0}")]
    Corruption(String),
}

impl ServiceError {
    pub(crate) fn not_found(entity: Entity, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }
}
