//! Vector index implementation using Qdrant

use super::{VectorEntry, VectorIndex};
use crate::config::VectorDbConfig;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointId, PointStruct, UpdateStatus,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Qdrant-backed vector index
pub struct QdrantIndex {
    client: Qdrant,
    collection_name: String,
    vector_size: u64,
}

impl QdrantIndex {
    /// Connect and make sure the collection exists
    pub async fn connect(config: &VectorDbConfig) -> Result<Self> {
        let mut builder = Qdrant::from_url(&config.url).timeout(config.timeout());

        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.expose_secret().clone());
        }

        let client = builder
            .build()
            .map_err(|e| GatewayError::VectorDb(format!("Failed to build client: {}", e)))?;

        let index = Self {
            client,
            collection_name: config.collection_name.clone(),
            vector_size: config.vector_size,
        };
        index.ensure_collection().await?;
        Ok(index)
    }

    /// Create the collection if it is missing
    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| GatewayError::VectorDb(format!("Failed to list collections: {}", e)))?;

        if !exists {
            info!("Creating vector collection: {}", self.collection_name);

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection_name).vectors_config(
                        VectorParamsBuilder::new(self.vector_size, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| {
                    GatewayError::VectorDb(format!("Failed to create collection: {}", e))
                })?;
        }

        Ok(())
    }
}

/// Map a fact id onto a Qdrant point id
///
/// Qdrant only accepts unsigned integers or UUIDs. Row ids from the store are
/// integers, so numeric strings become numeric ids; anything else must be a
/// UUID.
pub fn point_id_for(id: &str) -> Result<PointId> {
    if let Ok(num) = id.parse::<u64>() {
        return Ok(PointId::from(num));
    }

    Uuid::parse_str(id)
        .map(|uuid| PointId::from(uuid.to_string()))
        .map_err(|_| {
            GatewayError::VectorDb(format!(
                "Invalid point id '{}': expected an unsigned integer or a UUID",
                id
            ))
        })
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn upsert(&self, entries: Vec<VectorEntry>) -> Result<Value> {
        let ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();

        let points = entries
            .into_iter()
            .map(|entry| {
                Ok(PointStruct::new(
                    point_id_for(&entry.id)?,
                    entry.values,
                    HashMap::<String, QdrantValue>::new(),
                ))
            })
            .collect::<Result<Vec<PointStruct>>>()?;

        debug!("Upserting {} points into {}", points.len(), self.collection_name);

        let response = self
            .client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
            .await?;

        let (operation_id, status) = match response.result {
            Some(result) => (
                result.operation_id,
                UpdateStatus::try_from(result.status)
                    .map(|s| s.as_str_name().to_string())
                    .unwrap_or_else(|_| "Unknown".to_string()),
            ),
            None => (None, "Unknown".to_string()),
        };

        Ok(json!({
            "count": ids.len(),
            "ids": ids,
            "operation_id": operation_id,
            "status": status,
        }))
    }
}
