//! Multi-table transactions scoped to a declared set of tables.

use crate::error::DatabaseError;
use crate::types::{LearningGoal, Table, Uid, UnitOfMeaning};
use crate::{Error, Result};
use sqlx::Sqlite;

use super::{Database, learning_goals, units_of_meaning};

/// An open write transaction over a fixed set of tables
///
/// Writes to a table outside the declared scope fail with
/// [`DatabaseError::TableNotInScope`]. Nothing is visible to other
/// connections until [`commit`](Self::commit); dropping the transaction
/// without committing rolls every write back.
pub struct StoreTransaction {
    tx: sqlx::Transaction<'static, Sqlite>,
    scope: Vec<Table>,
}

impl Database {
    /// Begin a transaction that may write only the given tables
    pub async fn transaction(&self, scope: &[Table]) -> Result<StoreTransaction> {
        let tx = self.pool.begin().await.map_err(|e| {
            Error::Database(DatabaseError::ConnectionFailed(format!(
                "Failed to begin transaction: {}",
                e
            )))
        })?;

        let mut tables: Vec<Table> = Vec::with_capacity(scope.len());
        for table in scope {
            if !tables.contains(table) {
                tables.push(*table);
            }
        }

        Ok(StoreTransaction { tx, scope: tables })
    }
}

impl StoreTransaction {
    /// Tables this transaction may write
    pub fn scope(&self) -> &[Table] {
        &self.scope
    }

    fn ensure_in_scope(&self, table: Table) -> Result<()> {
        if self.scope.contains(&table) {
            Ok(())
        } else {
            Err(Error::Database(DatabaseError::TableNotInScope {
                table,
                scope: self.scope.clone(),
            }))
        }
    }

    /// Insert a learning goal
    pub async fn insert_learning_goal(&mut self, goal: &LearningGoal) -> Result<()> {
        self.ensure_in_scope(Table::LearningGoals)?;
        learning_goals::insert_goal(&mut self.tx, goal).await
    }

    /// Delete a learning goal by uid, returning whether a row was removed
    pub async fn delete_learning_goal(&mut self, uid: &Uid) -> Result<bool> {
        self.ensure_in_scope(Table::LearningGoals)?;
        learning_goals::delete_goal(&mut self.tx, uid).await
    }

    /// Insert units of meaning in batches
    pub async fn insert_units(&mut self, units: &[UnitOfMeaning]) -> Result<()> {
        self.ensure_in_scope(Table::UnitsOfMeaning)?;
        units_of_meaning::insert_units(&mut self.tx, units).await
    }

    /// Delete units of meaning by uid, returning how many rows were removed
    pub async fn delete_units(&mut self, uids: &[Uid]) -> Result<u64> {
        self.ensure_in_scope(Table::UnitsOfMeaning)?;
        units_of_meaning::delete_units(&mut self.tx, uids).await
    }

    /// Make every write of this transaction visible
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to commit transaction: {}",
                e
            )))
        })
    }

    /// Discard every write of this transaction
    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await.map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to roll back transaction: {}",
                e
            )))
        })
    }
}
