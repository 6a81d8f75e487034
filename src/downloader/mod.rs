//! Learning goal downloader
//!
//! The [`Downloader`] ties the pipeline together:
//! - [`download`] - fetch, merge and record one learning goal
//!
//! A download fetches the goal bundle from the content source, diffs it
//! against the local store and submits whatever is new as one undoable
//! [`Operation::AddContent`](crate::history::Operation::AddContent) through
//! the shared [`History`]. Progress is published as a [`DownloadState`] on a
//! watch channel.

mod download;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::content::{ContentSource, HttpContentClient};
use crate::db::Database;
use crate::error::Result;
use crate::history::History;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Observable state of a [`Downloader`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadState {
    /// A download is running
    pub busy: bool,
    /// User-facing message of the last download that added nothing
    pub error: Option<String>,
    /// Display names of what the last successful download added
    pub last_downloaded: Vec<String>,
}

/// Downloads learning goals into the local store (cloneable - all fields are Arc-wrapped)
///
/// One download runs at a time per downloader; clones share that limit.
#[derive(Clone)]
pub struct Downloader {
    /// Where learning goals and units are fetched from
    pub(crate) content_source: Arc<dyn ContentSource>,
    /// History new content is recorded in (shared with the embedding app)
    pub(crate) history: Arc<History>,
    /// Set while a download is running
    pub(crate) in_flight: Arc<AtomicBool>,
    /// State published to observers
    pub(crate) state_tx: Arc<watch::Sender<DownloadState>>,
}

impl Downloader {
    /// Create a downloader over an existing content source and history
    pub fn new(content_source: Arc<dyn ContentSource>, history: Arc<History>) -> Self {
        let (state_tx, _rx) = watch::channel(DownloadState::default());
        Self {
            content_source,
            history,
            in_flight: Arc::new(AtomicBool::new(false)),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Build the HTTP content client, open the database and create a history
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the database cannot
    /// be opened
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let content_source = Arc::new(HttpContentClient::new(&config.content)?);
        let db = Arc::new(Database::new(&config.persistence.database_path).await?);
        let history = Arc::new(History::new(db));

        tracing::info!(
            base_url = %content_source.base_url(),
            database = %config.persistence.database_path.display(),
            "Downloader ready"
        );

        Ok(Self::new(content_source, history))
    }

    /// The history downloads are recorded in
    pub fn history(&self) -> &Arc<History> {
        &self.history
    }

    /// Current state
    pub fn state(&self) -> DownloadState {
        self.state_tx.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn watch_state(&self) -> watch::Receiver<DownloadState> {
        self.state_tx.subscribe()
    }

    /// Clear the busy flag, the error message and the last result
    ///
    /// This only resets what observers see; a running download is not
    /// cancelled and still publishes its outcome when it finishes.
    pub fn reset(&self) {
        self.state_tx.send_replace(DownloadState::default());
    }

    /// Whether a download is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Releases the single-flight slot and clears `busy` when a download ends,
/// including when its future is dropped
pub(crate) struct InFlightGuard<'a> {
    in_flight: &'a AtomicBool,
    state_tx: &'a watch::Sender<DownloadState>,
}

impl<'a> InFlightGuard<'a> {
    /// Claim the slot, or `None` if another download holds it
    pub(crate) fn acquire(
        in_flight: &'a AtomicBool,
        state_tx: &'a watch::Sender<DownloadState>,
    ) -> Option<Self> {
        in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                in_flight,
                state_tx,
            })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state_tx.send_if_modified(|state| {
            let was_busy = state.busy;
            state.busy = false;
            was_busy
        });
        self.in_flight.store(false, Ordering::Release);
    }
}
