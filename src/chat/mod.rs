//! Chat relay to a hosted language model

pub mod handlers;
pub mod models;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use handlers::{chat, ChatState};
pub use models::{build_conversation, ChatMessage, ChatRequest, ChatRole, SYSTEM_PROMPT};

/// Trait for chat-completion backends
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a conversation and return the model's response untouched
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Value>;
}
