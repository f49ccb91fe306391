//! Facts API handler

use super::error::FactsError;
use super::models::{FactInsertRequest, FactInsertResponse};
use super::service::FactIngestion;
use crate::metrics::METRICS;
use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Application state for facts handlers
#[derive(Clone)]
pub struct FactsState {
    pub ingestion: Arc<FactIngestion>,
}

fn reject(err: FactsError) -> FactsError {
    warn!("Fact insert rejected: {}", err);
    METRICS.record_facts_insert(false);
    METRICS.record_pipeline_failure(err.stage());
    err
}

/// Insert a fact
///
/// POST {base}/facts
///
/// The body is parsed as JSON whatever its `Content-Type`.
pub async fn insert_fact(
    State(state): State<FactsState>,
    body: Bytes,
) -> Result<Json<FactInsertResponse>, FactsError> {
    let start = Instant::now();

    let request: FactInsertRequest = serde_json::from_slice(&body)
        .map_err(|e| reject(FactsError::InvalidBody(e.to_string())))?;

    let text = request.text().ok_or_else(|| reject(FactsError::Validation))?;
    info!("Parsed fact insert request ({} bytes)", text.len());

    let result = state.ingestion.ingest(&text).await;

    METRICS.observe_duration("facts", start.elapsed().as_secs_f64());

    match result {
        Ok(response) => {
            METRICS.record_facts_insert(true);
            Ok(Json(response))
        }
        Err(e) => {
            METRICS.record_facts_insert(false);
            METRICS.record_pipeline_failure(e.stage());
            Err(e)
        }
    }
}
