//! Embedding seam.

use async_trait::async_trait;

/// Maps text to a fixed-length embedding.
///
/// Implementations must be deterministic for a given text. Production
/// embedders call out to a model API, which is why `embed` is async and
/// why the service never holds the corpus lock across it.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embedding length. Every vector returned by [`Embedder::embed`] has
    /// exactly this many components.
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Vec<f64>;
}

/// Reference embedder: counts of the lowercase letters a–z.
///
/// Deterministic and dependency-free, which makes it the test embedder.
/// Empty text (or text with no letters) embeds to the zero vector — a
/// valid, degenerate input for cosine similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterCountEmbedder;

impl LetterCountEmbedder {
    pub const DIMENSION: usize = 26;
}

#[async_trait]
impl Embedder for LetterCountEmbedder {
    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    async fn embed(&self, text: &str) -> Vec<f64> {
        let mut counts = vec![0.0; Self::DIMENSION];
        for ch in text.chars().flat_map(char::to_lowercase) {
            if ch.is_ascii_lowercase() {
                counts[(ch as u8 - b'a') as usize] += 1.0;
            }
        }
        counts
    }
}
