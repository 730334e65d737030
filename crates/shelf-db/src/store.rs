//! In-memory corpus store.
//!
//! Four maps — libraries, documents, chunks, installed indices — behind a
//! single reader–writer lock. tokio's `RwLock` is fair: a pending writer
//! blocks later readers, so a stream of reads cannot starve mutation.
//!
//! Every method is one lock scope, and nothing awaits while a guard is
//! held. The slow phases around the store (embedding, index construction)
//! happen in the service between lock scopes, so a writer critical section
//! is never longer than the map mutation itself. Dropping a caller's
//! future at an `.await` releases any guard it held, leaving no partially
//! mutated state behind — each mutation lands in a single scope.

use std::collections::HashMap;

use shelf_index::{IndexKind, VectorIndex};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Entity, ServiceError};
use crate::model::{Chunk, Document, Library};

#[derive(Default)]
struct CorpusState {
    libraries: HashMap<Uuid, Library>,
    documents: HashMap<Uuid, Document>,
    chunks: HashMap<Uuid, Chunk>,
    indices: HashMap<Uuid, VectorIndex>,
}

/// The in-memory corpus.
///
/// The global chunk table is authoritative; document and library lists
/// hold references into it, and readers tolerate references that have
/// gone stale.
#[derive(Default)]
pub struct CorpusStore {
    state: RwLock<CorpusState>,
}

impl CorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- reads ----

    pub async fn get_library(&self, id: Uuid) -> Option<Library> {
        self.state.read().await.libraries.get(&id).cloned()
    }

    pub async fn get_document(&self, id: Uuid) -> Option<Document> {
        self.state.read().await.documents.get(&id).cloned()
    }

    pub async fn get_chunk(&self, id: Uuid) -> Option<Chunk> {
        self.state.read().await.chunks.get(&id).cloned()
    }

    pub async fn list_libraries(&self) -> Vec<Library> {
        self.state.read().await.libraries.values().cloned().collect()
    }

    /// All chunks reachable through the library, in document-insertion then
    /// chunk-insertion order.
    ///
    /// Lenient traversal: dangling document or chunk references are
    /// skipped, and an unknown library yields the empty list.
    pub async fn list_chunks(&self, lib_id: Uuid) -> Vec<Chunk> {
        let state = self.state.read().await;
        let Some(lib) = state.libraries.get(&lib_id) else {
            return Vec::new();
        };
        let mut chunks = Vec::new();
        for doc_id in &lib.documents {
            let Some(doc) = state.documents.get(doc_id) else {
                continue;
            };
            for chunk_id in &doc.chunks {
                if let Some(chunk) = state.chunks.get(chunk_id) {
                    chunks.push(chunk.clone());
                }
            }
        }
        chunks
    }

    /// Snapshot of `(embeddings, chunk ids)` for an index build, taken
    /// under one read guard.
    ///
    /// Strict on documents: a library referencing a missing document is an
    /// ownership-invariant violation (nothing deletes documents
    /// individually) and surfaces as [`ServiceError::Corruption`]. Lenient
    /// on chunks: `delete_chunk` legally leaves stale chunk references
    /// behind, so those are skipped.
    pub async fn snapshot(&self, lib_id: Uuid) -> Result<(Vec<Vec<f64>>, Vec<Uuid>), ServiceError> {
        let state = self.state.read().await;
        let lib = state
            .libraries
            .get(&lib_id)
            .ok_or_else(|| ServiceError::not_found(Entity::Library, lib_id))?;

        let mut vectors = Vec::new();
        let mut ids = Vec::new();
        for doc_id in &lib.documents {
            let doc = state.documents.get(doc_id).ok_or_else(|| {
                ServiceError::Corruption(format!(
                    "library {} references missing document {}",
                    lib_id, doc_id
                ))
            })?;
            for chunk_id in &doc.chunks {
                if let Some(chunk) = state.chunks.get(chunk_id) {
                    vectors.push(chunk.embedding.clone());
                    ids.push(chunk.id);
                }
            }
        }
        Ok((vectors, ids))
    }

    /// Query the installed index and resolve the hits, all under one read
    /// guard.
    ///
    /// Identifiers the index returns that no longer resolve in the chunk
    /// table were deleted after the build; they are dropped from the
    /// result.
    pub async fn knn(
        &self,
        lib_id: Uuid,
        query: &[f64],
        k: usize,
    ) -> Result<Vec<Chunk>, ServiceError> {
        let state = self.state.read().await;
        if !state.libraries.contains_key(&lib_id) {
            return Err(ServiceError::not_found(Entity::Library, lib_id));
        }
        let index = state
            .indices
            .get(&lib_id)
            .ok_or(ServiceError::NotIndexed(lib_id))?;
        let hits = index.knn(query, k)?;
        Ok(hits
            .into_iter()
            .filter_map(|(id, _)| state.chunks.get(&id).cloned())
            .collect())
    }

    /// Algorithm of the installed index, if any.
    pub async fn index_kind(&self, lib_id: Uuid) -> Option<IndexKind> {
        self.state.read().await.indices.get(&lib_id).map(VectorIndex::kind)
    }

    // ---- writes ----

    pub async fn save_library(&self, lib: Library) {
        self.state.write().await.libraries.insert(lib.id, lib);
    }

    pub async fn save_document(&self, doc: Document) {
        self.state.write().await.documents.insert(doc.id, doc);
    }

    pub async fn save_chunk(&self, chunk: Chunk) {
        self.state.write().await.chunks.insert(chunk.id, chunk);
    }

    /// Rename a library in place, returning the updated value.
    pub async fn update_library_name(&self, id: Uuid, name: String) -> Option<Library> {
        let mut state = self.state.write().await;
        let lib = state.libraries.get_mut(&id)?;
        lib.name = name;
        Some(lib.clone())
    }

    /// Register a chunk under a library in one writer scope: the chunk
    /// joins the global table, its document joins the document table, and
    /// the document id is appended to the library's list. Doing all three
    /// under one guard is what keeps concurrent attaches from losing
    /// updates to the library's document list.
    ///
    /// Fails with `NotFound` if the library vanished while the caller was
    /// off embedding.
    pub async fn attach_chunk(
        &self,
        lib_id: Uuid,
        mut doc: Document,
        chunk: Chunk,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.write().await;
        let lib = state
            .libraries
            .get_mut(&lib_id)
            .ok_or_else(|| ServiceError::not_found(Entity::Library, lib_id))?;
        lib.documents.push(doc.id);
        doc.chunks.push(chunk.id);
        state.documents.insert(doc.id, doc);
        state.chunks.insert(chunk.id, chunk);
        Ok(())
    }

    /// Replace a chunk's text and embedding in place, returning the
    /// updated value.
    pub async fn update_chunk(
        &self,
        id: Uuid,
        text: String,
        embedding: Vec<f64>,
    ) -> Option<Chunk> {
        let mut state = self.state.write().await;
        let chunk = state.chunks.get_mut(&id)?;
        chunk.text = text;
        chunk.embedding = embedding;
        Some(chunk.clone())
    }

    /// Remove a chunk from the global table.
    ///
    /// Document lists keep their reference; readers and installed indices
    /// tolerate the stale id.
    pub async fn delete_chunk(&self, id: Uuid) -> Option<Chunk> {
        self.state.write().await.chunks.remove(&id)
    }

    /// Cascade-delete a library: its documents, their chunks, and any
    /// installed index go with it.
    pub async fn delete_library(&self, id: Uuid) -> Option<Library> {
        let mut state = self.state.write().await;
        let lib = state.libraries.remove(&id)?;
        for doc_id in &lib.documents {
            if let Some(doc) = state.documents.remove(doc_id) {
                for chunk_id in &doc.chunks {
                    state.chunks.remove(chunk_id);
                }
            }
        }
        state.indices.remove(&id);
        Some(lib)
    }

    /// Install a freshly built index, replacing any previous one.
    ///
    /// Fails with `NotFound` if the library was deleted while the index
    /// was under construction; installing would otherwise resurrect an
    /// index for a dead library.
    pub async fn install_index(&self, lib_id: Uuid, index: VectorIndex) -> Result<(), ServiceError> {
        let mut state = self.state.write().await;
        if !state.libraries.contains_key(&lib_id) {
            return Err(ServiceError::not_found(Entity::Library, lib_id));
        }
        state.indices.insert(lib_id, index);
        Ok(())
    }
}
