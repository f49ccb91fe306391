//! Embedding generation

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts
    ///
    /// Returns one vector per input, preserving input order. A provider may
    /// return fewer vectors than inputs; callers must check.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
