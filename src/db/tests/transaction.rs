use crate::db::*;
use crate::error::DatabaseError;
use crate::test_helpers::{create_test_db, sample_goal, sample_unit};
use crate::types::{Table, Uid};

#[tokio::test]
async fn test_commit_makes_multi_table_writes_visible() {
    let (db, _temp_dir) = create_test_db().await;

    let mut tx = db
        .transaction(&[Table::LearningGoals, Table::UnitsOfMeaning])
        .await
        .unwrap();
    tx.insert_learning_goal(&sample_goal("en_goal1", "Animals", &["en_cat"]))
        .await
        .unwrap();
    tx.insert_units(&[sample_unit("en_cat", "cat", &[])])
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(db.count_learning_goals().await.unwrap(), 1);
    assert_eq!(db.count_units().await.unwrap(), 1);
}

#[tokio::test]
async fn test_dropped_transaction_rolls_back() {
    let (db, _temp_dir) = create_test_db().await;

    {
        let mut tx = db
            .transaction(&[Table::LearningGoals, Table::UnitsOfMeaning])
            .await
            .unwrap();
        tx.insert_learning_goal(&sample_goal("en_goal1", "Animals", &[]))
            .await
            .unwrap();
        tx.insert_units(&[sample_unit("en_cat", "cat", &[])])
            .await
            .unwrap();
        // dropped without commit
    }

    assert_eq!(db.count_learning_goals().await.unwrap(), 0);
    assert_eq!(db.count_units().await.unwrap(), 0);
}

#[tokio::test]
async fn test_explicit_rollback_discards_deletes() {
    let (db, _temp_dir) = create_test_db().await;

    db.insert_units(&[sample_unit("en_cat", "cat", &[])])
        .await
        .unwrap();

    let mut tx = db.transaction(&[Table::UnitsOfMeaning]).await.unwrap();
    assert_eq!(tx.delete_units(&[Uid::from("en_cat")]).await.unwrap(), 1);
    tx.rollback().await.unwrap();

    assert_eq!(db.count_units().await.unwrap(), 1);
}

#[tokio::test]
async fn test_write_outside_scope_is_rejected() {
    let (db, _temp_dir) = create_test_db().await;

    let mut tx = db.transaction(&[Table::LearningGoals]).await.unwrap();
    assert_eq!(tx.scope(), &[Table::LearningGoals]);

    let result = tx.insert_units(&[sample_unit("en_cat", "cat", &[])]).await;
    match result {
        Err(crate::Error::Database(DatabaseError::TableNotInScope { table, scope })) => {
            assert_eq!(table, Table::UnitsOfMeaning);
            assert_eq!(scope, vec![Table::LearningGoals]);
        }
        other => panic!("expected TableNotInScope, got {:?}", other),
    }

    let result = tx.delete_units(&[Uid::from("en_cat")]).await;
    assert!(result.is_err());

    tx.commit().await.unwrap();
    assert_eq!(db.count_units().await.unwrap(), 0);
}

#[tokio::test]
async fn test_scope_is_deduplicated() {
    let (db, _temp_dir) = create_test_db().await;

    let tx = db
        .transaction(&[
            Table::UnitsOfMeaning,
            Table::LearningGoals,
            Table::UnitsOfMeaning,
        ])
        .await
        .unwrap();
    assert_eq!(tx.scope(), &[Table::UnitsOfMeaning, Table::LearningGoals]);
}

#[tokio::test]
async fn test_failure_mid_transaction_leaves_no_partial_write() {
    let (db, _temp_dir) = create_test_db().await;

    db.insert_units(&[sample_unit("en_cat", "cat", &[])])
        .await
        .unwrap();

    let mut tx = db
        .transaction(&[Table::LearningGoals, Table::UnitsOfMeaning])
        .await
        .unwrap();
    tx.insert_learning_goal(&sample_goal("en_goal1", "Animals", &["en_cat"]))
        .await
        .unwrap();
    let result = tx.insert_units(&[sample_unit("en_cat", "cat", &[])]).await;
    assert!(result.is_err());
    drop(tx);

    // The goal written before the failure is gone as well
    assert_eq!(db.count_learning_goals().await.unwrap(), 0);
    assert_eq!(db.count_units().await.unwrap(), 1);
}
