//! Reversible content changes

use crate::db::Database;
use crate::error::Result;
use crate::types::{LearningGoal, Table, Uid, UnitOfMeaning};
use serde::Serialize;
use std::collections::HashSet;

/// A set of content rows an operation inserts or removes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentBatch {
    /// Learning goal row, if the batch touches one
    pub goal: Option<LearningGoal>,
    /// Unit of meaning rows
    pub units: Vec<UnitOfMeaning>,
}

impl ContentBatch {
    /// Create a batch from a goal and units
    pub fn new(goal: Option<LearningGoal>, units: Vec<UnitOfMeaning>) -> Self {
        Self { goal, units }
    }

    /// True when the batch holds no rows
    pub fn is_empty(&self) -> bool {
        self.goal.is_none() && self.units.is_empty()
    }

    /// Tables the batch has rows for
    pub fn tables(&self) -> Vec<Table> {
        let mut tables = Vec::with_capacity(2);
        if self.goal.is_some() {
            tables.push(Table::LearningGoals);
        }
        if !self.units.is_empty() {
            tables.push(Table::UnitsOfMeaning);
        }
        tables
    }

    /// Goal name followed by unit contents, skipping empty strings
    pub fn display_names(&self) -> Vec<String> {
        self.goal
            .iter()
            .map(|goal| goal.name.as_str())
            .chain(self.units.iter().map(|unit| unit.content.as_str()))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Uids of the batch's units
    pub fn unit_uids(&self) -> Vec<Uid> {
        self.units.iter().map(|unit| unit.uid.clone()).collect()
    }

    /// Snapshot the stored rows for the given uids
    ///
    /// Uids with no stored row are skipped, as are repeated unit uids.
    /// Used to build a [`Operation::RemoveContent`] that can be reverted.
    pub async fn capture(
        db: &Database,
        goal_uid: Option<&Uid>,
        unit_uids: &[Uid],
    ) -> Result<Self> {
        let goal = match goal_uid {
            Some(uid) => db.get_learning_goal(uid).await?,
            None => None,
        };

        let mut seen = HashSet::new();
        let unique: Vec<Uid> = unit_uids
            .iter()
            .filter(|uid| seen.insert(*uid))
            .cloned()
            .collect();
        let units = db.get_units(&unique).await?.into_iter().flatten().collect();

        Ok(Self { goal, units })
    }

    async fn insert(&self, db: &Database) -> Result<()> {
        let tables = self.tables();
        if tables.is_empty() {
            return Ok(());
        }

        let mut tx = db.transaction(&tables).await?;
        if let Some(goal) = &self.goal {
            tx.insert_learning_goal(goal).await?;
        }
        if !self.units.is_empty() {
            tx.insert_units(&self.units).await?;
        }
        tx.commit().await
    }

    async fn delete(&self, db: &Database) -> Result<()> {
        let tables = self.tables();
        if tables.is_empty() {
            return Ok(());
        }

        let mut tx = db.transaction(&tables).await?;
        if let Some(goal) = &self.goal {
            tx.delete_learning_goal(&goal.uid).await?;
        }
        if !self.units.is_empty() {
            tx.delete_units(&self.unit_uids()).await?;
        }
        tx.commit().await
    }

    fn describe(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(goal) = &self.goal {
            parts.push(format!("learning goal '{}'", goal.name));
        }
        match self.units.len() {
            0 => {}
            1 => parts.push("1 unit of meaning".to_string()),
            n => parts.push(format!("{} units of meaning", n)),
        }

        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(" and ")
        }
    }
}

/// A reversible change to the local store
///
/// Each variant carries the rows it touches, so an operation can be applied,
/// reverted and applied again without consulting anything but the store.
/// Every apply or revert runs in one transaction scoped to the tables the
/// batch touches; an empty batch opens no transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "batch", rename_all = "snake_case")]
pub enum Operation {
    /// Insert the batch; reverting deletes it by uid
    AddContent(ContentBatch),
    /// Delete the batch by uid; reverting re-inserts the captured rows
    RemoveContent(ContentBatch),
}

impl Operation {
    /// The rows this operation touches
    pub fn batch(&self) -> &ContentBatch {
        match self {
            Operation::AddContent(batch) | Operation::RemoveContent(batch) => batch,
        }
    }

    /// Short human-readable description, e.g. for an undo menu entry
    pub fn label(&self) -> String {
        match self {
            Operation::AddContent(batch) => format!("Add {}", batch.describe()),
            Operation::RemoveContent(batch) => format!("Remove {}", batch.describe()),
        }
    }

    /// Perform the change
    ///
    /// # Errors
    /// Fails if any write fails; nothing is written in that case
    pub async fn apply(&self, db: &Database) -> Result<()> {
        match self {
            Operation::AddContent(batch) => batch.insert(db).await,
            Operation::RemoveContent(batch) => batch.delete(db).await,
        }
    }

    /// Undo the change
    ///
    /// # Errors
    /// Fails if any write fails; nothing is written in that case
    pub async fn revert(&self, db: &Database) -> Result<()> {
        match self {
            Operation::AddContent(batch) => batch.delete(db).await,
            Operation::RemoveContent(batch) => batch.insert(db).await,
        }
    }
}
