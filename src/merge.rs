//! Deciding which fetched records are new to the local store

use crate::content::FetchedContent;
use crate::db::Database;
use crate::error::Result;
use crate::types::{LearningGoal, Uid, UnitOfMeaning};
use std::collections::HashSet;

/// Records a download would add
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// The goal, when it is not stored yet
    pub new_goal: Option<LearningGoal>,
    /// Units not stored yet, in fetch order and unique by uid
    pub new_units: Vec<UnitOfMeaning>,
}

impl MergePlan {
    /// True when there is nothing to add
    pub fn is_empty(&self) -> bool {
        self.new_goal.is_none() && self.new_units.is_empty()
    }
}

/// Compare fetched content against what the store already holds
///
/// `goal_exists` tells whether the goal uid is stored; `existing_units` is
/// the subset of fetched unit uids that is stored.
pub fn diff(
    fetched: &FetchedContent,
    goal_exists: bool,
    existing_units: &HashSet<Uid>,
) -> MergePlan {
    let new_goal = (!goal_exists).then(|| fetched.goal.clone());

    let mut seen: HashSet<&Uid> = HashSet::new();
    let mut new_units = Vec::new();
    for unit in fetched.all_units() {
        if !existing_units.contains(&unit.uid) && seen.insert(&unit.uid) {
            new_units.push(unit.clone());
        }
    }

    MergePlan {
        new_goal,
        new_units,
    }
}

/// Query the store and build the merge plan for `fetched`
///
/// Unit existence is checked with one batched lookup over units and
/// translations together; the goal is checked separately.
pub async fn plan(fetched: &FetchedContent, db: &Database) -> Result<MergePlan> {
    let existing_units = db.existing_unit_uids(&fetched.all_unit_uids()).await?;
    let goal_exists = db.learning_goal_exists(&fetched.goal.uid).await?;

    let plan = diff(fetched, goal_exists, &existing_units);
    tracing::debug!(
        goal = %fetched.goal.uid,
        goal_is_new = plan.new_goal.is_some(),
        existing_units = existing_units.len(),
        new_units = plan.new_units.len(),
        "Computed merge plan"
    );
    Ok(plan)
}
