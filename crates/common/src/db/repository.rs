//! Repository pattern for glossary data access
//!
//! `EntryStore` is the capability set the handlers depend on; `Repository`
//! is the SeaORM-backed implementation. Handlers hold the store behind a
//! trait object so tests can substitute an in-memory implementation.

use crate::db::models::{EntryActiveModel, EntryColumn, EntryEntity, GlossaryEntry};
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};

/// A glossary entry before the database has assigned its id
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub term: String,
    pub definition: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage capabilities consumed by the request handlers
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Exact, case-sensitive lookup by term
    async fn find_by_term(&self, term: &str) -> Result<Option<GlossaryEntry>>;

    /// Insert a new entry and return the assigned id
    async fn insert(&self, entry: NewEntry) -> Result<i64>;

    /// All entries in insertion order
    async fn list_all(&self) -> Result<Vec<GlossaryEntry>>;

    /// Connectivity check for readiness probes
    async fn ping(&self) -> Result<()>;
}

/// Repository for glossary data access
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for Repository {
    async fn find_by_term(&self, term: &str) -> Result<Option<GlossaryEntry>> {
        EntryEntity::find()
            .filter(EntryColumn::Term.eq(term))
            .one(self.pool.conn())
            .await
            .map_err(Into::into)
    }

    async fn insert(&self, entry: NewEntry) -> Result<i64> {
        let term = entry.term.clone();

        let model = EntryActiveModel {
            term: Set(entry.term),
            definition: Set(entry.definition),
            created_at: Set(entry.created_at.into()),
            updated_at: Set(entry.updated_at.into()),
            ..Default::default()
        };

        match model.insert(self.pool.conn()).await {
            Ok(inserted) => Ok(inserted.id),
            Err(e) => match e.sql_err() {
                // The UNIQUE constraint on term is the authoritative duplicate
                // check; a lost check-then-insert race between concurrent
                // creates lands here.
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AppError::DuplicateTerm { term })
                }
                _ => Err(e.into()),
            },
        }
    }

    async fn list_all(&self) -> Result<Vec<GlossaryEntry>> {
        EntryEntity::find()
            .order_by_asc(EntryColumn::Id)
            .all(self.pool.conn())
            .await
            .map_err(Into::into)
    }

    async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }
}
