//! Router assembly

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::chat::{self, ChatState};
use crate::config::ServerConfig;
use crate::facts::{self, FactsState};

/// Build facts API routes
pub fn build_facts_routes(facts_state: FactsState) -> Router {
    Router::new()
        .route("/facts", post(facts::insert_fact))
        .with_state(facts_state)
}

/// Build chat API routes
pub fn build_chat_routes(chat_state: ChatState) -> Router {
    Router::new()
        .route("/chat", post(chat::chat))
        .with_state(chat_state)
}

/// Build the complete router
///
/// API routes are mounted under `server.base_path`; `/metrics` stays at the
/// root so scrapers do not depend on the prefix.
pub fn build_router(server: &ServerConfig, facts_state: FactsState, chat_state: ChatState) -> Router {
    let api_routes = Router::new()
        .route("/status", get(handlers::status))
        .merge(build_facts_routes(facts_state))
        .merge(build_chat_routes(chat_state));

    let router = match normalize_base_path(&server.base_path) {
        Some(base) => Router::new().nest(&base, api_routes),
        None => api_routes,
    };

    router
        .route("/metrics", get(handlers::metrics))
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Strip trailing slashes; the root prefix means no nesting
fn normalize_base_path(base_path: &str) -> Option<String> {
    let trimmed = base_path.trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
