//! Shared test helpers: temporary databases, sample content and an
//! in-memory content source.

use crate::content::ContentSource;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{LearningGoal, Uid, UnitOfMeaning, UnitOfMeaningCredit};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{TempDir, tempdir};
use tokio::sync::Notify;

/// Create a database in a fresh temp directory.
/// Returns the database and the tempdir (which must be kept alive).
pub(crate) async fn create_test_db() -> (Arc<Database>, TempDir) {
    let temp_dir = tempdir().unwrap();
    let db = Database::new(&temp_dir.path().join("test.db")).await.unwrap();
    (Arc::new(db), temp_dir)
}

/// Learning goal referencing the given unit uids
pub(crate) fn sample_goal(uid: &str, name: &str, units: &[&str]) -> LearningGoal {
    LearningGoal {
        uid: Uid::from(uid),
        name: name.to_string(),
        parents: vec![],
        blocked_by: vec![],
        language: Uid::from(uid).language().to_string(),
        units_of_meaning: units.iter().map(|u| Uid::from(*u)).collect(),
        user_created: false,
    }
}

/// Unit of meaning with the given translations
pub(crate) fn sample_unit(uid: &str, content: &str, translations: &[&str]) -> UnitOfMeaning {
    UnitOfMeaning {
        uid: Uid::from(uid),
        content: content.to_string(),
        word_type: "noun".to_string(),
        pronunciation: None,
        notes: None,
        translations: translations.iter().map(|u| Uid::from(*u)).collect(),
        related: vec![],
        user_created: false,
        credit: None,
    }
}

/// Unit of meaning with every optional field populated
pub(crate) fn detailed_unit(uid: &str, content: &str) -> UnitOfMeaning {
    UnitOfMeaning {
        uid: Uid::from(uid),
        content: content.to_string(),
        word_type: "verb".to_string(),
        pronunciation: Some("/ˈrʌn/".to_string()),
        notes: Some("irregular".to_string()),
        translations: vec![Uid::from("fr_courir")],
        related: vec![Uid::from("en_walk"), Uid::from("en_sprint")],
        user_created: true,
        credit: Some(UnitOfMeaningCredit {
            creation_context: "imported from wiktionary".to_string(),
            license: Some("CC-BY-SA 4.0".to_string()),
            owner: Some("Wiktionary".to_string()),
            owner_link: Some("https://wiktionary.org".to_string()),
            source: None,
            source_link: None,
        }),
    }
}

/// Unit fetch lifecycle as observed by [`MockContentSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SourceEvent {
    Started(Uid),
    Finished(Uid),
}

/// In-memory content source
///
/// Unknown uids answer like a missing record on the content host (HTTP 404).
/// Every request is logged so tests can assert on fetch counts, ordering and
/// concurrency.
#[derive(Default)]
pub(crate) struct MockContentSource {
    goals: HashMap<Uid, LearningGoal>,
    units: HashMap<Uid, UnitOfMeaning>,
    delay: Option<Duration>,
    goal_gate: Option<Arc<Notify>>,
    goal_requests: Mutex<Vec<(String, Uid)>>,
    events: Mutex<Vec<SourceEvent>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockContentSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_goal(mut self, goal: LearningGoal) -> Self {
        self.goals.insert(goal.uid.clone(), goal);
        self
    }

    pub(crate) fn with_unit(mut self, unit: UnitOfMeaning) -> Self {
        self.units.insert(unit.uid.clone(), unit);
        self
    }

    /// Delay every unit fetch, so concurrent fetches overlap
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Hold every goal fetch until the gate is notified
    pub(crate) fn with_goal_gate(mut self, gate: Arc<Notify>) -> Self {
        self.goal_gate = Some(gate);
        self
    }

    pub(crate) fn goal_requests(&self) -> Vec<(String, Uid)> {
        self.goal_requests.lock().unwrap().clone()
    }

    pub(crate) fn events(&self) -> Vec<SourceEvent> {
        self.events.lock().unwrap().clone()
    }

    /// How many times a unit fetch was started for `uid`
    pub(crate) fn unit_fetch_count(&self, uid: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, SourceEvent::Started(u) if u == uid))
            .count()
    }

    pub(crate) fn total_unit_fetches(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, SourceEvent::Started(_)))
            .count()
    }

    /// Highest number of unit fetches that were in flight at the same time
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn not_found(collection: &str, uid: &Uid) -> Error {
        Error::HttpStatus {
            url: format!("mock://{}/{}.json", collection, uid),
            status: 404,
        }
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn fetch_learning_goal(&self, language: &str, uid: &Uid) -> Result<LearningGoal> {
        self.goal_requests
            .lock()
            .unwrap()
            .push((language.to_string(), uid.clone()));

        if let Some(gate) = &self.goal_gate {
            gate.notified().await;
        }

        self.goals
            .get(uid)
            .cloned()
            .ok_or_else(|| Self::not_found("learning_goals", uid))
    }

    async fn fetch_unit(&self, uid: &Uid) -> Result<UnitOfMeaning> {
        self.events
            .lock()
            .unwrap()
            .push(SourceEvent::Started(uid.clone()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(SourceEvent::Finished(uid.clone()));

        self.units
            .get(uid)
            .cloned()
            .ok_or_else(|| Self::not_found("units_of_meaning", uid))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
