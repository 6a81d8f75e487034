//! Learning goal reads and writes.

use crate::types::{LearningGoal, Table, Uid};
use crate::{Error, Result};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

use super::{Database, LearningGoalRow, MAX_UIDS_PER_QUERY};

const SELECT_LEARNING_GOAL: &str = r#"
    SELECT uid, name, parents, blocked_by, language, units_of_meaning, user_created
    FROM learning_goals
"#;

/// Insert one learning goal; a uid that already exists is a constraint violation
pub(super) async fn insert_goal(conn: &mut SqliteConnection, goal: &LearningGoal) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO learning_goals (
            uid, name, parents, blocked_by, language, units_of_meaning, user_created
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&goal.uid)
    .bind(&goal.name)
    .bind(Json(&goal.parents))
    .bind(Json(&goal.blocked_by))
    .bind(&goal.language)
    .bind(Json(&goal.units_of_meaning))
    .bind(goal.user_created)
    .execute(&mut *conn)
    .await
    .map_err(|e| Error::query("Failed to insert learning goal", e))?;

    Ok(())
}

/// Delete one learning goal, returning whether a row was removed
pub(super) async fn delete_goal(conn: &mut SqliteConnection, uid: &Uid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM learning_goals WHERE uid = ?")
        .bind(uid)
        .execute(&mut *conn)
        .await
        .map_err(|e| Error::query("Failed to delete learning goal", e))?;

    Ok(result.rows_affected() > 0)
}

impl Database {
    /// Get a learning goal by uid
    pub async fn get_learning_goal(&self, uid: &Uid) -> Result<Option<LearningGoal>> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, LearningGoalRow>(&format!(
            "{} WHERE uid = ?",
            SELECT_LEARNING_GOAL
        ))
        .bind(uid)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| Error::query("Failed to get learning goal", e))?;

        Ok(row.map(LearningGoal::from))
    }

    /// Get several learning goals at once
    ///
    /// The result is aligned with `uids`: one entry per requested uid, `None`
    /// where no goal with that uid exists.
    pub async fn get_learning_goals(&self, uids: &[Uid]) -> Result<Vec<Option<LearningGoal>>> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.acquire().await?;
        let mut found: HashMap<Uid, LearningGoal> = HashMap::with_capacity(uids.len());

        for chunk in uids.chunks(MAX_UIDS_PER_QUERY) {
            let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_LEARNING_GOAL);
            query_builder.push(" WHERE uid IN (");
            let mut separated = query_builder.separated(", ");
            for uid in chunk {
                separated.push_bind(uid);
            }
            separated.push_unseparated(")");

            let rows = query_builder
                .build_query_as::<LearningGoalRow>()
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| Error::query("Failed to get learning goals", e))?;

            for row in rows {
                let goal = LearningGoal::from(row);
                found.insert(goal.uid.clone(), goal);
            }
        }

        Ok(uids.iter().map(|uid| found.get(uid).cloned()).collect())
    }

    /// Whether a learning goal with this uid is stored
    pub async fn learning_goal_exists(&self, uid: &Uid) -> Result<bool> {
        let mut conn = self.acquire().await?;
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM learning_goals WHERE uid = ?)")
                .bind(uid)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| Error::query("Failed to check learning goal", e))?;

        Ok(exists)
    }

    /// List all learning goals ordered by uid
    pub async fn list_learning_goals(&self) -> Result<Vec<LearningGoal>> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, LearningGoalRow>(&format!(
            "{} ORDER BY uid ASC",
            SELECT_LEARNING_GOAL
        ))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| Error::query("Failed to list learning goals", e))?;

        Ok(rows.into_iter().map(LearningGoal::from).collect())
    }

    /// Number of stored learning goals
    pub async fn count_learning_goals(&self) -> Result<i64> {
        let mut conn = self.acquire().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM learning_goals")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| Error::query("Failed to count learning goals", e))?;

        Ok(count)
    }

    /// Insert a learning goal in its own transaction
    pub async fn insert_learning_goal(&self, goal: &LearningGoal) -> Result<()> {
        let mut tx = self.transaction(&[Table::LearningGoals]).await?;
        tx.insert_learning_goal(goal).await?;
        tx.commit().await
    }

    /// Delete a learning goal in its own transaction
    ///
    /// Returns whether a goal was removed.
    pub async fn delete_learning_goal(&self, uid: &Uid) -> Result<bool> {
        let mut tx = self.transaction(&[Table::LearningGoals]).await?;
        let removed = tx.delete_learning_goal(uid).await?;
        tx.commit().await?;
        Ok(removed)
    }
}
