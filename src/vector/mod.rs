//! Vector index abstraction

pub mod qdrant;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use qdrant::QdrantIndex;

/// A single entry keyed by fact id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    pub id: String,
    pub values: Vec<f32>,
}

/// Trait for vector index backends
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace entries, returning the backend's confirmation payload
    async fn upsert(&self, entries: Vec<VectorEntry>) -> Result<Value>;
}
