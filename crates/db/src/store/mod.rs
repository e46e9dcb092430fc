//! Storage handle shared by every repository.
//!
//! [`Database`] dispatches each generic operation to either Postgres or the
//! in-memory store. Both backends honor the same contract:
//!
//! - listing skips tombstoned rows and orders newest first;
//! - `find` returns tombstoned rows;
//! - `modify` only touches live rows;
//! - unique column sets are enforced among live rows, and `NULL` never conflicts.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use commons_core::error::CoreError;
use commons_core::pagination::{Page, PageWindow};
use commons_core::types::DbId;

use crate::filter::Criteria;
use crate::resource::Resource;
use crate::DbPool;

pub use memory::MemoryStore;

/// Postgres error code for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres error code for `check_violation`.
const CHECK_VIOLATION: &str = "23514";

/// Errors raised by either storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key is already taken by another live row.
    #[error("{0}")]
    Conflict(String),

    /// The written row failed a domain check; nothing was stored.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// A row could not be converted to JSON for in-memory evaluation.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for StoreError {
    /// Violations of our `uq_` indexes become [`StoreError::Conflict`] and of
    /// our `ck_` constraints a validation rejection; everything else is passed
    /// through.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                    return StoreError::Conflict(format!(
                        "Duplicate value violates unique constraint {constraint}"
                    ));
                }
                Some(CHECK_VIOLATION) if constraint.starts_with("ck_") => {
                    return StoreError::Rejected(CoreError::Validation(format!(
                        "Row violates check constraint {constraint}"
                    )));
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Which backend serves the data.
#[derive(Clone)]
pub enum Database {
    Postgres(DbPool),
    Memory(Arc<MemoryStore>),
}

impl Database {
    /// A fresh, empty in-memory backend.
    pub fn memory() -> Self {
        Database::Memory(Arc::new(MemoryStore::default()))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Database::Postgres(_) => "postgres",
            Database::Memory(_) => "memory",
        }
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        match self {
            Database::Postgres(pool) => crate::health_check(pool).await.map_err(StoreError::from),
            Database::Memory(_) => Ok(()),
        }
    }

    pub async fn insert<R: Resource>(&self, row: R) -> Result<R, StoreError> {
        match self {
            Database::Postgres(pool) => postgres::insert(pool, &row).await,
            Database::Memory(store) => store.insert(row).await,
        }
    }

    pub async fn find<R: Resource>(&self, id: DbId) -> Result<Option<R>, StoreError> {
        match self {
            Database::Postgres(pool) => postgres::find(pool, id).await,
            Database::Memory(store) => store.find(id).await,
        }
    }

    pub async fn search<R: Resource>(
        &self,
        criteria: &Criteria,
        window: PageWindow,
    ) -> Result<Page<R>, StoreError> {
        match self {
            Database::Postgres(pool) => postgres::search(pool, criteria, window).await,
            Database::Memory(store) => store.search(criteria, window).await,
        }
    }

    /// Load a live row, apply `change`, and write it back as one unit of work.
    ///
    /// Returns `None` if no live row has this id. If `change` fails, the row
    /// is left untouched and the error is returned.
    pub async fn modify<R, F>(&self, id: DbId, change: F) -> Result<Option<R>, StoreError>
    where
        R: Resource,
        F: FnOnce(&mut R) -> Result<(), StoreError> + Send,
    {
        match self {
            Database::Postgres(pool) => postgres::modify(pool, id, change).await,
            Database::Memory(store) => store.modify(id, change).await,
        }
    }

    /// Remove a row outright, returning it if it existed.
    pub async fn remove<R: Resource>(&self, id: DbId) -> Result<Option<R>, StoreError> {
        match self {
            Database::Postgres(pool) => postgres::remove(pool, id).await,
            Database::Memory(store) => store.remove(id).await,
        }
    }
}
