//! Service orchestrator.
//!
//! One long-lived [`VectorService`] value owns the corpus store, the
//! embedder, and the index build configuration; request handlers share it
//! by reference. Operations serialize through the store's reader–writer
//! lock; the slow phases (embedding, index construction) run between lock
//! scopes, never inside one.

use std::sync::Arc;

use shelf_index::{IndexKind, LshParams, VectorIndex};
use tracing::debug;
use uuid::Uuid;

use crate::embed::Embedder;
use crate::error::{Entity, ServiceError};
use crate::model::{Chunk, Document, Library};
use crate::store::CorpusStore;

/// Tunables for index construction.
#[derive(Clone, Debug, Default)]
pub struct ServiceConfig {
    /// Parameters for LSH builds: plane count and the optional fixed seed
    /// that makes bucketing reproducible.
    pub lsh: LshParams,
}

/// The orchestrator gluing corpus mutations, embedding, index builds, and
/// queries together.
pub struct VectorService {
    store: CorpusStore,
    embedder: Arc<dyn Embedder>,
    config: ServiceConfig,
}

impl VectorService {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self::with_config(embedder, ServiceConfig::default())
    }

    pub fn with_config(embedder: Arc<dyn Embedder>, config: ServiceConfig) -> Self {
        Self {
            store: CorpusStore::new(),
            embedder,
            config,
        }
    }

    // ---- libraries ----

    pub async fn create_library(&self, name: impl Into<String>) -> Library {
        let lib = Library::new(name);
        debug!(library = %lib.id, name = %lib.name, "create library");
        self.store.save_library(lib.clone()).await;
        lib
    }

    pub async fn get_library(&self, id: Uuid) -> Result<Library, ServiceError> {
        self.store
            .get_library(id)
            .await
            .ok_or_else(|| ServiceError::not_found(Entity::Library, id))
    }

    /// Rename a library; its documents and creation time are untouched.
    pub async fn update_library(
        &self,
        id: Uuid,
        name: impl Into<String>,
    ) -> Result<Library, ServiceError> {
        self.store
            .update_library_name(id, name.into())
            .await
            .ok_or_else(|| ServiceError::not_found(Entity::Library, id))
    }

    /// Delete a library and everything under it: documents, chunks, and
    /// any installed index.
    pub async fn delete_library(&self, id: Uuid) -> Result<(), ServiceError> {
        debug!(library = %id, "delete library");
        self.store
            .delete_library(id)
            .await
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found(Entity::Library, id))
    }

    pub async fn list_libraries(&self) -> Vec<Library> {
        self.store.list_libraries().await
    }

    // ---- chunks ----

    /// Embed `text` and register the resulting chunk under `lib_id`.
    ///
    /// Each chunk gets its own synthetic `"default"` document, so document
    /// count grows with chunk count. That is the external contract this
    /// store inherited; callers group logically by library, not document.
    pub async fn add_chunk(
        &self,
        lib_id: Uuid,
        text: impl Into<String>,
    ) -> Result<Chunk, ServiceError> {
        // Fail fast before paying for an embedding; attach_chunk re-checks
        // under the writer lock in case the library is deleted meanwhile.
        self.get_library(lib_id).await?;

        let text = text.into();
        let embedding = self.embedder.embed(&text).await;
        let chunk = Chunk::new(text, embedding);
        let doc = Document::new("default");
        debug!(library = %lib_id, chunk = %chunk.id, "add chunk");
        self.store.attach_chunk(lib_id, doc, chunk.clone()).await?;
        Ok(chunk)
    }

    pub async fn get_chunk(&self, id: Uuid) -> Result<Chunk, ServiceError> {
        self.store
            .get_chunk(id)
            .await
            .ok_or_else(|| ServiceError::not_found(Entity::Chunk, id))
    }

    /// Replace a chunk's text, recomputing its embedding.
    pub async fn update_chunk(
        &self,
        id: Uuid,
        text: impl Into<String>,
    ) -> Result<Chunk, ServiceError> {
        // Existence check first, embedding second: same fail-fast shape as
        // add_chunk.
        self.get_chunk(id).await?;

        let text = text.into();
        let embedding = self.embedder.embed(&text).await;
        self.store
            .update_chunk(id, text, embedding)
            .await
            .ok_or_else(|| ServiceError::not_found(Entity::Chunk, id))
    }

    /// Remove a chunk from the global table. References to it in document
    /// lists and installed indices go stale and are tolerated.
    pub async fn delete_chunk(&self, id: Uuid) -> Result<(), ServiceError> {
        debug!(chunk = %id, "delete chunk");
        self.store
            .delete_chunk(id)
            .await
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found(Entity::Chunk, id))
    }

    /// All chunks under the library, in document-insertion then
    /// chunk-insertion order. Dangling references are skipped; an unknown
    /// library yields the empty list.
    pub async fn list_chunks(&self, lib_id: Uuid) -> Vec<Chunk> {
        self.store.list_chunks(lib_id).await
    }

    // ---- indexing and query ----

    /// Build an index over the library's current chunks and install it,
    /// replacing any previous index.
    ///
    /// `algo` is a wire name: `"linear"`, `"kd"` or `"lsh"`. The snapshot
    /// is taken under a read guard, construction runs with no lock held,
    /// and installation retakes the writer lock briefly.
    pub async fn build_index(&self, lib_id: Uuid, algo: &str) -> Result<(), ServiceError> {
        let (vectors, ids) = self.store.snapshot(lib_id).await?;
        let kind = IndexKind::parse(algo)
            .ok_or_else(|| ServiceError::InvalidAlgo(algo.to_string()))?;

        let index = VectorIndex::build(kind, &vectors, &ids, &self.config.lsh)?;
        debug!(library = %lib_id, algo = %kind, vectors = ids.len(), "index built");
        self.store.install_index(lib_id, index).await
    }

    /// kNN query against the library's installed index.
    ///
    /// Returns up to `k` chunks in descending cosine similarity.
    /// Identifiers that were deleted after the build are dropped from the
    /// result.
    pub async fn query(
        &self,
        lib_id: Uuid,
        query: &[f64],
        k: usize,
    ) -> Result<Vec<Chunk>, ServiceError> {
        self.store.knn(lib_id, query, k).await
    }

    /// Algorithm of the library's installed index, if one is installed.
    pub async fn index_kind(&self, lib_id: Uuid) -> Option<IndexKind> {
        self.store.index_kind(lib_id).await
    }
}
