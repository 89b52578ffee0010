//! Database layer for Glossar
//!
//! Provides:
//! - SeaORM entity model for glossary entries
//! - Repository pattern behind the `EntryStore` trait
//! - Connection pool management and schema bootstrap

pub mod models;
mod repository;

pub use repository::{EntryStore, NewEntry, Repository};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(true);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { conn })
    }

    /// Get the underlying connection
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;

        Ok(())
    }
}

/// Idempotent schema bootstrap, run at startup.
///
/// The UNIQUE constraint on `term` makes duplicate detection atomic; a
/// check-then-insert race between concurrent creates of the same term is
/// resolved here rather than by the handler's lookup.
pub async fn ensure_schema(pool: &DbPool) -> Result<()> {
    pool.conn()
        .execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS glossary_entries (
                id BIGSERIAL PRIMARY KEY,
                term TEXT NOT NULL UNIQUE,
                definition TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .await?;

    info!("Database schema ready");
    Ok(())
}
