//! In-memory vector database.
//!
//! Text chunks are grouped into libraries, embedded through a pluggable
//! [`Embedder`], and served by per-library kNN indices from the
//! [`shelf_index`] engine. The crate is the corpus half of the system:
//!
//! - [`model`] — the entity hierarchy (Library → Document → Chunk, by id).
//! - [`store`] — the four corpus maps behind one reader–writer lock.
//! - [`embed`] — the embedding seam and the reference letter-count
//!   embedder.
//! - [`service`] — the orchestrator request handlers call into.
//!
//! # Concurrency
//!
//! Readers share the corpus; a writer excludes everyone. The lock is fair,
//! so writers do not starve. Embedding and index construction — the slow
//! phases — always run between lock scopes. Indices are bulk-built
//! snapshots: mutating the corpus never mutates an installed index, a
//! rebuild replaces it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use shelf_db::{LetterCountEmbedder, VectorService};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), shelf_db::ServiceError> {
//! let service = VectorService::new(Arc::new(LetterCountEmbedder));
//!
//! let lib = service.create_library("demo").await;
//! service.add_chunk(lib.id, "hello vector world").await?;
//! service.build_index(lib.id, "linear").await?;
//!
//! let hits = service.query(lib.id, &[1.0; 26], 5).await?;
//! assert!(!hits.is_empty());
//! # Ok(())
//! # }
//! ```

/// Corpus entities.
pub mod model;

/// Embedding seam and the reference embedder.
pub mod embed;

/// In-memory corpus store with reader–writer discipline.
pub mod store;

/// Service orchestrator.
pub mod service;

/// Service error taxonomy.
pub mod error;

pub use embed::{Embedder, LetterCountEmbedder};
pub use error::{Entity, ServiceError};
pub use model::{Chunk, Document, Library, Metadata};
pub use service::{ServiceConfig, VectorService};
pub use store::CorpusStore;

/// Re-export of commonly used types.
pub mod prelude {
    pub use crate::embed::{Embedder, LetterCountEmbedder};
    pub use crate::error::{Entity, ServiceError};
    pub use crate::model::{Chunk, Document, Library};
    pub use crate::service::{ServiceConfig, VectorService};
    pub use shelf_index::{IndexKind, LshParams};
}
