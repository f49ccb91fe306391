//! Fact ingestion
//!
//! A fact is a piece of caller-supplied text. Ingesting it runs three
//! dependent steps against external services:
//! - persist the text and obtain the store-assigned id
//! - embed the text with a remote model
//! - upsert the embedding into the vector index under the same id
//!
//! Steps are not compensated: a row persisted before a later failure stays.

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;

pub use error::FactsError;
pub use handlers::{insert_fact, FactsState};
pub use models::{Fact, FactInsertRequest, FactInsertResponse};
pub use service::FactIngestion;
pub use store::{FactStore, SqliteFactStore};
