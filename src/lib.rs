//! Facts gateway
//!
//! HTTP routing layer in front of three managed services: a relational store
//! for fact text, a vector index for fact embeddings, and a hosted inference
//! API providing both the embedding model and a chat model.

pub mod api;
pub mod chat;
pub mod config;
pub mod embedding;
pub mod error;
pub mod facts;
pub mod metrics;
pub mod vector;
pub mod workers_ai;

pub use error::{GatewayError, Result};
