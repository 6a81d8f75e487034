//! Custom test assertions for end-to-end tests

use linguanodon_sync::{Downloader, LearningGoal, UnitOfMeaning};

/// Full contents of both tables, ordered by uid
pub async fn store_snapshot(downloader: &Downloader) -> (Vec<LearningGoal>, Vec<UnitOfMeaning>) {
    let db = downloader.history().database();
    (
        db.list_learning_goals().await.unwrap(),
        db.list_units().await.unwrap(),
    )
}

/// Assert how many goals and units are stored
pub async fn assert_store_counts(downloader: &Downloader, goals: i64, units: i64) {
    let db = downloader.history().database();
    assert_eq!(
        db.count_learning_goals().await.unwrap(),
        goals,
        "unexpected number of learning goals"
    );
    assert_eq!(
        db.count_units().await.unwrap(),
        units,
        "unexpected number of units of meaning"
    );
}
