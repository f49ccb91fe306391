//! Hosted inference (Workers AI) integration
//!
//! A single REST client serves both the embedding model used during fact
//! ingestion and the chat model behind `/chat`.

pub mod client;

pub use client::{InferenceError, WorkersAiClient};
