//! Corpus entities.
//!
//! Ownership is hierarchical and held by identifier, not by pointer:
//! libraries own documents, documents own chunks, and the global chunk
//! table is the ground truth a reference may dangle against.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Arbitrary JSON-valued annotations on chunks and documents.
pub type Metadata = HashMap<String, Value>;

/// An atomic unit of text plus its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub text: String,
    /// Fixed-length embedding; the length equals the embedder dimension
    /// for every chunk indexed together.
    pub embedding: Vec<f64>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    pub fn new(text: String, embedding: Vec<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            embedding,
            metadata: Metadata::new(),
            created_at: Utc::now(),
        }
    }
}

/// An ordered grouping of chunks within a library.
///
/// A document is a grouping only; it carries no embedding of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    /// Owned chunk ids in insertion order. References into the global
    /// chunk table; deleting a chunk leaves its id behind here.
    pub chunks: Vec<Uuid>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            chunks: Vec::new(),
            metadata: Metadata::new(),
        }
    }
}

/// The top-level unit of ownership and indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    pub id: Uuid,
    pub name: String,
    /// Owned document ids in insertion order.
    pub documents: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            documents: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
