//! Resolving a learning goal into its full fetch set

use super::traits::ContentSource;
use crate::error::Result;
use crate::types::{LearningGoal, LearningGoalSummary, Uid, UnitOfMeaning};
use futures::future::try_join_all;
use std::collections::HashSet;

/// Everything fetched for one learning goal, in fetch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    /// The full learning goal record
    pub goal: LearningGoal,
    /// Units referenced by the goal
    pub units: Vec<UnitOfMeaning>,
    /// Direct translations of those units that were not already among them
    pub translations: Vec<UnitOfMeaning>,
}

impl FetchedContent {
    /// Units followed by translations
    pub fn all_units(&self) -> impl Iterator<Item = &UnitOfMeaning> {
        self.units.iter().chain(self.translations.iter())
    }

    /// Uids of units followed by translations
    pub fn all_unit_uids(&self) -> Vec<Uid> {
        self.all_units().map(|u| u.uid.clone()).collect()
    }
}

/// Deduplicate uids keeping the first occurrence
fn unique_uids<'a>(uids: impl IntoIterator<Item = &'a Uid>) -> Vec<Uid> {
    let mut seen = HashSet::new();
    uids.into_iter()
        .filter(|uid| seen.insert(*uid))
        .cloned()
        .collect()
}

/// Fetch a learning goal, its units and their direct translations
///
/// Runs three phases:
/// 1. the goal record, in `language`
/// 2. every distinct unit the goal references, all requests at once
/// 3. every distinct translation of those units that phase 2 did not
///    already fetch, all requests at once
///
/// Phase 3 starts only after every phase 2 request has completed. Each unit
/// is requested in the language encoded in its own uid. Translations are
/// followed one hop only.
///
/// # Errors
/// The first failing request aborts the whole fetch; no partial result is
/// returned.
pub async fn fetch_learning_goal_bundle(
    source: &dyn ContentSource,
    summary: &LearningGoalSummary,
    language: &str,
) -> Result<FetchedContent> {
    tracing::debug!(
        source = source.name(),
        goal = %summary.uid,
        language,
        "Fetching learning goal"
    );
    let goal = source.fetch_learning_goal(language, &summary.uid).await?;

    let unit_uids = unique_uids(&goal.units_of_meaning);
    tracing::debug!(goal = %goal.uid, count = unit_uids.len(), "Fetching units");
    let units = try_join_all(unit_uids.iter().map(|uid| source.fetch_unit(uid))).await?;

    let already_fetched: HashSet<&Uid> = unit_uids.iter().collect();
    let translation_uids: Vec<Uid> = unique_uids(units.iter().flat_map(|u| &u.translations))
        .into_iter()
        .filter(|uid| !already_fetched.contains(uid))
        .collect();

    let translations = if translation_uids.is_empty() {
        Vec::new()
    } else {
        tracing::debug!(
            goal = %goal.uid,
            count = translation_uids.len(),
            "Fetching translations"
        );
        try_join_all(translation_uids.iter().map(|uid| source.fetch_unit(uid))).await?
    };

    tracing::info!(
        goal = %goal.uid,
        units = units.len(),
        translations = translations.len(),
        "Fetched learning goal"
    );

    Ok(FetchedContent {
        goal,
        units,
        translations,
    })
}
