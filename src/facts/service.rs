//! Fact ingestion pipeline

use super::error::FactsError;
use super::models::{Fact, FactInsertResponse};
use super::store::FactStore;
use crate::embedding::EmbeddingProvider;
use crate::error::GatewayError;
use crate::vector::{VectorEntry, VectorIndex};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Persists, embeds, and indexes facts
#[derive(Clone)]
pub struct FactIngestion {
    store: Arc<dyn FactStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl FactIngestion {
    pub fn new(
        store: Arc<dyn FactStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            store,
            embedder,
            index,
        }
    }

    /// Run the full pipeline for one piece of text
    ///
    /// Stops at the first failing step. Earlier steps are not undone.
    pub async fn ingest(&self, text: &str) -> Result<FactInsertResponse, FactsError> {
        if text.is_empty() {
            return Err(FactsError::Validation);
        }

        let fact = self.persist(text).await?;
        let values = self.embed(&fact).await?;
        let inserted = self.upsert_vector(&fact, values).await?;

        Ok(FactInsertResponse {
            id: fact.id,
            text: fact.text,
            inserted,
        })
    }

    async fn persist(&self, text: &str) -> Result<Fact, FactsError> {
        info!("Pushing to database...");

        let rows = self.store.insert(text).await.map_err(|e| {
            error!("Fact insert failed: {}", e);
            FactsError::Persistence
        })?;

        let record = rows.into_iter().next().ok_or_else(|| {
            error!("Fact insert returned no rows");
            FactsError::Persistence
        })?;

        info!("Pushed {} to database", record.id);

        Ok(Fact {
            id: record.id,
            text: text.to_string(),
        })
    }

    async fn embed(&self, fact: &Fact) -> Result<Vec<f32>, FactsError> {
        info!("Getting embedding...");

        let vectors = self
            .embedder
            .embed_batch(std::slice::from_ref(&fact.text))
            .await
            .map_err(|e| {
                error!("Embedding request failed for fact {}: {}", fact.id, e);
                FactsError::Embedding
            })?;

        let values = vectors
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                warn!("No embedding returned; fact {} persisted without vector", fact.id);
                FactsError::Embedding
            })?;

        info!("Got embedding: {}", preview(&values));

        Ok(values)
    }

    async fn upsert_vector(&self, fact: &Fact, values: Vec<f32>) -> Result<Value, FactsError> {
        info!("Pushing to vector store...");

        let entry = VectorEntry {
            id: fact.id.clone(),
            values,
        };

        let inserted = self.index.upsert(vec![entry]).await.map_err(|e| {
            warn!("Vector upsert failed; fact {} persisted without vector: {}", fact.id, e);
            FactsError::Index(index_failure_message(e))
        })?;

        info!("Pushed {} to vector store", fact.id);

        Ok(inserted)
    }
}

/// Message of the index's own error, without the crate's category prefix
fn index_failure_message(err: GatewayError) -> String {
    match err {
        GatewayError::VectorDb(msg) => msg,
        other => other.to_string(),
    }
}

/// First few components of a vector for logging
fn preview(values: &[f32]) -> String {
    let head: Vec<String> = values.iter().take(3).map(|v| v.to_string()).collect();
    if values.len() > head.len() {
        format!("{}, ... ({} dims)", head.join(", "), values.len())
    } else {
        head.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_failure_message_is_raw() {
        let msg = index_failure_message(GatewayError::VectorDb("bad dims".to_string()));
        assert_eq!(msg, "bad dims");

        let msg = index_failure_message(GatewayError::Internal("other".to_string()));
        assert_eq!(msg, "Internal error: other");
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview(&[0.5, 0.25, 1.0, 2.0]), "0.5, 0.25, 1, ... (4 dims)");
        assert_eq!(preview(&[0.5]), "0.5");
        assert_eq!(preview(&[]), "");
    }
}
