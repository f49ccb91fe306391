//! HTTP surface

pub mod handlers;
pub mod routes;

pub use routes::{build_chat_routes, build_facts_routes, build_router};
