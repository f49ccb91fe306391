//! Chat API handler

use super::models::{build_conversation, ChatRequest};
use super::ChatModel;
use crate::metrics::METRICS;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Application state for the chat handler
#[derive(Clone)]
pub struct ChatState {
    pub model: Arc<dyn ChatModel>,
}

/// Relay a message to the chat model
///
/// POST {base}/chat
///
/// The body is parsed as JSON whatever its `Content-Type`.
pub async fn chat(
    State(state): State<ChatState>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, String)> {
    let start = Instant::now();
    info!("Chat request received");

    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        METRICS.record_chat(false);
        (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
    })?;

    let messages = build_conversation(request.text);
    let result = state.model.complete(&messages).await;

    METRICS.observe_duration("chat", start.elapsed().as_secs_f64());

    match result {
        Ok(response) => {
            METRICS.record_chat(true);
            Ok(Json(response))
        }
        Err(e) => {
            METRICS.record_chat(false);
            error!("Chat completion failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
