//! Database layer for linguanodon-sync
//!
//! The local store: SQLite persistence for learning goals and units of
//! meaning, keyed by uid.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`schema`] - Opening the store, table creation
//! - [`learning_goals`] - Learning goal reads and writes
//! - [`units_of_meaning`] - Unit of meaning reads and writes
//! - [`transaction`] - Multi-table transactions scoped to a declared table set
//!
//! Every write goes through a [`StoreTransaction`]. The single-table write
//! methods on [`Database`] open a transaction over that one table, so batched
//! writes are atomic even when they span several SQL statements.

use crate::error::DatabaseError;
use crate::types::{LearningGoal, Uid, UnitOfMeaning, UnitOfMeaningCredit};
use crate::{Error, Result};
use sqlx::pool::PoolConnection;
use sqlx::types::Json;
use sqlx::{FromRow, Sqlite, sqlite::SqlitePool};

mod learning_goals;
mod schema;
mod transaction;
mod units_of_meaning;

pub use schema::SCHEMA_VERSION;
pub use transaction::StoreTransaction;

/// SQLite default SQLITE_MAX_VARIABLE_NUMBER is 999; `IN (...)` lists stay below it.
const MAX_UIDS_PER_QUERY: usize = 500;

/// Learning goal record from database
#[derive(Debug, Clone, FromRow)]
pub(crate) struct LearningGoalRow {
    pub(crate) uid: Uid,
    pub(crate) name: String,
    pub(crate) parents: Json<Vec<Uid>>,
    pub(crate) blocked_by: Json<Vec<Uid>>,
    pub(crate) language: String,
    pub(crate) units_of_meaning: Json<Vec<Uid>>,
    pub(crate) user_created: bool,
}

impl From<LearningGoalRow> for LearningGoal {
    fn from(row: LearningGoalRow) -> Self {
        LearningGoal {
            uid: row.uid,
            name: row.name,
            parents: row.parents.0,
            blocked_by: row.blocked_by.0,
            language: row.language,
            units_of_meaning: row.units_of_meaning.0,
            user_created: row.user_created,
        }
    }
}

/// Unit of meaning record from database
#[derive(Debug, Clone, FromRow)]
pub(crate) struct UnitOfMeaningRow {
    pub(crate) uid: Uid,
    pub(crate) content: String,
    pub(crate) word_type: String,
    pub(crate) pronunciation: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) translations: Json<Vec<Uid>>,
    pub(crate) related: Json<Vec<Uid>>,
    pub(crate) user_created: bool,
    pub(crate) credit: Option<Json<UnitOfMeaningCredit>>,
}

impl From<UnitOfMeaningRow> for UnitOfMeaning {
    fn from(row: UnitOfMeaningRow) -> Self {
        UnitOfMeaning {
            uid: row.uid,
            content: row.content,
            word_type: row.word_type,
            pronunciation: row.pronunciation,
            notes: row.notes,
            translations: row.translations.0,
            related: row.related.0,
            user_created: row.user_created,
            credit: row.credit.map(|c| c.0),
        }
    }
}

/// Database handle for the local store
#[derive(Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Acquire a pooled connection for reads
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool.acquire().await.map_err(|e| {
            Error::Database(DatabaseError::ConnectionFailed(format!(
                "Failed to acquire connection: {}",
                e
            )))
        })
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
