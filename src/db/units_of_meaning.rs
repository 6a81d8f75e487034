//! Unit of meaning reads and writes.

use crate::types::{Table, Uid, UnitOfMeaning};
use crate::{Error, Result};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::{HashMap, HashSet};

use super::{Database, MAX_UIDS_PER_QUERY, UnitOfMeaningRow};

const SELECT_UNIT: &str = r#"
    SELECT uid, content, word_type, pronunciation, notes, translations, related,
           user_created, credit
    FROM units_of_meaning
"#;

/// Insert units in batches; any uid that already exists fails the whole call
///
/// Callers run this inside a transaction so a failing chunk leaves no
/// earlier chunk behind.
pub(super) async fn insert_units(
    conn: &mut SqliteConnection,
    units: &[UnitOfMeaning],
) -> Result<()> {
    if units.is_empty() {
        return Ok(());
    }

    // Each unit uses 9 bind variables, so max 111 units per batch.
    const MAX_UNITS_PER_BATCH: usize = 100;

    for chunk in units.chunks(MAX_UNITS_PER_BATCH) {
        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO units_of_meaning \
             (uid, content, word_type, pronunciation, notes, \
             translations, related, user_created, credit) ",
        );

        query_builder.push_values(chunk, |mut b, unit| {
            b.push_bind(&unit.uid)
                .push_bind(&unit.content)
                .push_bind(&unit.word_type)
                .push_bind(&unit.pronunciation)
                .push_bind(&unit.notes)
                .push_bind(Json(&unit.translations))
                .push_bind(Json(&unit.related))
                .push_bind(unit.user_created)
                .push_bind(unit.credit.as_ref().map(Json));
        });

        query_builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|e| Error::query("Failed to insert units of meaning batch", e))?;
    }

    Ok(())
}

/// Delete units by uid in batches, returning how many rows were removed
pub(super) async fn delete_units(conn: &mut SqliteConnection, uids: &[Uid]) -> Result<u64> {
    let mut removed = 0;

    for chunk in uids.chunks(MAX_UIDS_PER_QUERY) {
        let mut query_builder =
            QueryBuilder::<Sqlite>::new("DELETE FROM units_of_meaning WHERE uid IN (");
        let mut separated = query_builder.separated(", ");
        for uid in chunk {
            separated.push_bind(uid);
        }
        separated.push_unseparated(")");

        let result = query_builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|e| Error::query("Failed to delete units of meaning batch", e))?;
        removed += result.rows_affected();
    }

    Ok(removed)
}

impl Database {
    /// Get a unit of meaning by uid
    pub async fn get_unit(&self, uid: &Uid) -> Result<Option<UnitOfMeaning>> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, UnitOfMeaningRow>(&format!("{} WHERE uid = ?", SELECT_UNIT))
            .bind(uid)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| Error::query("Failed to get unit of meaning", e))?;

        Ok(row.map(UnitOfMeaning::from))
    }

    /// Get several units of meaning at once
    ///
    /// The result is aligned with `uids`: one entry per requested uid, `None`
    /// where no unit with that uid exists.
    pub async fn get_units(&self, uids: &[Uid]) -> Result<Vec<Option<UnitOfMeaning>>> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.acquire().await?;
        let mut found: HashMap<Uid, UnitOfMeaning> = HashMap::with_capacity(uids.len());

        for chunk in uids.chunks(MAX_UIDS_PER_QUERY) {
            let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_UNIT);
            query_builder.push(" WHERE uid IN (");
            let mut separated = query_builder.separated(", ");
            for uid in chunk {
                separated.push_bind(uid);
            }
            separated.push_unseparated(")");

            let rows = query_builder
                .build_query_as::<UnitOfMeaningRow>()
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| Error::query("Failed to get units of meaning", e))?;

            for row in rows {
                let unit = UnitOfMeaning::from(row);
                found.insert(unit.uid.clone(), unit);
            }
        }

        Ok(uids.iter().map(|uid| found.get(uid).cloned()).collect())
    }

    /// Subset of `uids` that is already stored, checked in one batched lookup
    pub async fn existing_unit_uids(&self, uids: &[Uid]) -> Result<HashSet<Uid>> {
        let mut existing = HashSet::new();
        if uids.is_empty() {
            return Ok(existing);
        }

        let mut conn = self.acquire().await?;
        for chunk in uids.chunks(MAX_UIDS_PER_QUERY) {
            let mut query_builder =
                QueryBuilder::<Sqlite>::new("SELECT uid FROM units_of_meaning WHERE uid IN (");
            let mut separated = query_builder.separated(", ");
            for uid in chunk {
                separated.push_bind(uid);
            }
            separated.push_unseparated(")");

            let found = query_builder
                .build_query_scalar::<Uid>()
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| Error::query("Failed to check units of meaning", e))?;
            existing.extend(found);
        }

        Ok(existing)
    }

    /// List all units of meaning ordered by uid
    pub async fn list_units(&self) -> Result<Vec<UnitOfMeaning>> {
        let mut conn = self.acquire().await?;
        let sql = format!("{} ORDER BY uid ASC", SELECT_UNIT);
        let rows = sqlx::query_as::<_, UnitOfMeaningRow>(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| Error::query("Failed to list units of meaning", e))?;

        Ok(rows.into_iter().map(UnitOfMeaning::from).collect())
    }

    /// Number of stored units of meaning
    pub async fn count_units(&self) -> Result<i64> {
        let mut conn = self.acquire().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM units_of_meaning")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| Error::query("Failed to count units of meaning", e))?;

        Ok(count)
    }

    /// Insert units of meaning in their own transaction
    pub async fn insert_units(&self, units: &[UnitOfMeaning]) -> Result<()> {
        let mut tx = self.transaction(&[Table::UnitsOfMeaning]).await?;
        tx.insert_units(units).await?;
        tx.commit().await
    }

    /// Delete units of meaning in their own transaction
    ///
    /// Returns the number of units removed; unknown uids are ignored.
    pub async fn delete_units(&self, uids: &[Uid]) -> Result<u64> {
        let mut tx = self.transaction(&[Table::UnitsOfMeaning]).await?;
        let removed = tx.delete_units(uids).await?;
        tx.commit().await?;
        Ok(removed)
    }
}
