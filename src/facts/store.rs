//! Facts store implementation using SQLite

use super::models::Fact;
use crate::config::DatabaseConfig;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

/// Durable storage for fact text
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Insert a row holding `text` and return the inserted rows
    ///
    /// An empty result means the store accepted the statement but produced
    /// no row.
    async fn insert(&self, text: &str) -> Result<Vec<Fact>>;
}

/// SQLite-backed fact store
pub struct SqliteFactStore {
    pool: SqlitePool,
}

impl SqliteFactStore {
    /// Open a connection pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| GatewayError::Database(format!("Failed to connect: {}", e)))?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the facts table if it does not exist
    pub async fn migrate(&self) -> Result<()> {
        info!("Ensuring facts table exists");

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS facts (\
                id INTEGER PRIMARY KEY AUTOINCREMENT, \
                text TEXT NOT NULL\
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Read a fact from a returned row, coercing the id to a string
fn row_to_fact(row: &SqliteRow) -> Result<Fact> {
    let id = match row.try_get::<i64, _>("id") {
        Ok(num) => num.to_string(),
        Err(_) => row.try_get::<String, _>("id")?,
    };

    if id.is_empty() {
        return Err(GatewayError::Database("Inserted row has an empty id".to_string()));
    }

    Ok(Fact {
        id,
        text: row.try_get("text")?,
    })
}

#[async_trait]
impl FactStore for SqliteFactStore {
    async fn insert(&self, text: &str) -> Result<Vec<Fact>> {
        let rows = sqlx::query("INSERT INTO facts (text) VALUES (?) RETURNING *")
            .bind(text)
            .fetch_all(&self.pool)
            .await?;

        debug!("Insert returned {} rows", rows.len());

        rows.iter().map(row_to_fact).collect()
    }
}
