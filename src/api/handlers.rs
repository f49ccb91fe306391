//! Service-level handlers

use crate::metrics::METRICS;
use axum::{http::header, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Liveness check
///
/// GET {base}/status
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Prometheus scrape endpoint
///
/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}
