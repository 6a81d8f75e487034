//! Shared test helpers for creating Downloader instances in tests.

use crate::db::Database;
use crate::downloader::Downloader;
use crate::history::History;
use crate::test_helpers::{MockContentSource, create_test_db, sample_goal, sample_unit};
use crate::types::LearningGoalSummary;
use std::sync::Arc;
use tempfile::TempDir;

/// Downloader over `source` with a fresh on-disk database and history.
/// Returns the tempdir too (which must be kept alive).
pub(crate) async fn create_test_downloader(
    source: MockContentSource,
) -> (Downloader, Arc<MockContentSource>, Arc<Database>, TempDir) {
    let (db, temp_dir) = create_test_db().await;
    let source = Arc::new(source);
    let history = Arc::new(History::new(db.clone()));
    let downloader = Downloader::new(source.clone(), history);
    (downloader, source, db, temp_dir)
}

/// `en_goal1` "Animals" referencing `en_cat` and `fr_chat`, which are each
/// other's translation
pub(crate) fn animals_source() -> MockContentSource {
    MockContentSource::new()
        .with_goal(sample_goal("en_goal1", "Animals", &["en_cat", "fr_chat"]))
        .with_unit(sample_unit("en_cat", "cat", &["fr_chat"]))
        .with_unit(sample_unit("fr_chat", "chat", &["en_cat"]))
}

pub(crate) fn animals() -> LearningGoalSummary {
    LearningGoalSummary::new("en_goal1", "Animals")
}
