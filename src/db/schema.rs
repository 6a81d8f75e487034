//! Opening the store and creating its tables.

use crate::error::DatabaseError;
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use std::path::Path;

use super::Database;

/// Layout written by this crate, kept in SQLite's `user_version` header field
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_TABLES: [(&str, &str); 3] = [
    (
        "learning_goals",
        r#"
        CREATE TABLE IF NOT EXISTS learning_goals (
            uid TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            parents TEXT NOT NULL DEFAULT '[]',
            blocked_by TEXT NOT NULL DEFAULT '[]',
            language TEXT NOT NULL,
            units_of_meaning TEXT NOT NULL DEFAULT '[]',
            user_created INTEGER NOT NULL DEFAULT 0
        )
        "#,
    ),
    (
        "idx_learning_goals_language",
        "CREATE INDEX IF NOT EXISTS idx_learning_goals_language ON learning_goals(language)",
    ),
    (
        "units_of_meaning",
        r#"
        CREATE TABLE IF NOT EXISTS units_of_meaning (
            uid TEXT PRIMARY KEY NOT NULL,
            content TEXT NOT NULL,
            word_type TEXT NOT NULL,
            pronunciation TEXT,
            notes TEXT,
            translations TEXT NOT NULL DEFAULT '[]',
            related TEXT NOT NULL DEFAULT '[]',
            user_created INTEGER NOT NULL DEFAULT 0,
            credit TEXT
        )
        "#,
    ),
];

fn connection_failed(what: &str, e: impl std::fmt::Display) -> Error {
    Error::Database(DatabaseError::ConnectionFailed(format!("{}: {}", what, e)))
}

fn schema_failed(what: &str, e: impl std::fmt::Display) -> Error {
    Error::Database(DatabaseError::SchemaFailed(format!("{}: {}", what, e)))
}

impl Database {
    /// Open the store at `path`, creating the file, its parent directory and
    /// the tables as needed
    ///
    /// Opening an existing store leaves its rows alone.
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| connection_failed("Failed to create database directory", e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| connection_failed("Failed to open database", e))?;

        let db = Self { pool };
        db.create_schema().await?;

        tracing::debug!(path = %path.display(), "Opened local store");
        Ok(db)
    }

    /// Create any missing table in one transaction and stamp the layout version
    async fn create_schema(&self) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| connection_failed("Failed to begin schema transaction", e))?;

        for (name, statement) in CREATE_TABLES {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| schema_failed(&format!("Failed to create {}", name), e))?;
        }

        // PRAGMA does not take bind parameters
        sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
            .execute(&mut *tx)
            .await
            .map_err(|e| schema_failed("Failed to stamp schema version", e))?;

        tx.commit()
            .await
            .map_err(|e| schema_failed("Failed to commit schema", e))
    }

    /// Layout version stamped in the database file, 0 for a foreign file
    pub async fn schema_version(&self) -> Result<i64> {
        sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::query("Failed to read schema version", e))
    }

    /// Wait for every connection to finish and close the store
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// The connection pool behind this store
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
