//! Fetch, merge and record one learning goal

use super::{DownloadState, Downloader, InFlightGuard};
use crate::content::fetch_learning_goal_bundle;
use crate::error::{DownloadError, Error};
use crate::history::{ContentBatch, Operation};
use crate::merge;
use crate::types::LearningGoalSummary;

impl Downloader {
    /// Download a learning goal with its units and their translations
    ///
    /// Fetches the goal in `language`, then its units and their direct
    /// translations, and adds whatever the local store does not have yet as
    /// one undoable history entry. Returns the display names of what was
    /// added: the goal name (when the goal was new) followed by unit contents.
    ///
    /// # Errors
    /// - [`DownloadError::AlreadyExists`] when there was nothing new; the
    ///   history is not touched
    /// - [`DownloadError::FetchFailed`] when a content request failed
    /// - [`DownloadError::WriteFailed`] when reading or writing the store
    ///   failed; nothing was written
    /// - [`DownloadError::InProgress`] when this downloader is already
    ///   running a download; the running download is not affected
    ///
    /// Every error except `InProgress` is also published as the state's
    /// user-facing `error` message.
    pub async fn download_learning_goal(
        &self,
        summary: &LearningGoalSummary,
        language: &str,
    ) -> Result<Vec<String>, DownloadError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &self.state_tx) else {
            tracing::warn!(
                goal = %summary.uid,
                "Rejected download: another download is in progress"
            );
            return Err(DownloadError::InProgress {
                goal_name: summary.name.clone(),
            });
        };

        self.state_tx.send_replace(DownloadState {
            busy: true,
            error: None,
            last_downloaded: Vec::new(),
        });

        let result = self.run_download(summary, language).await;

        self.state_tx.send_modify(|state| {
            state.busy = false;
            match &result {
                Ok(names) => state.last_downloaded = names.clone(),
                Err(e) => state.error = Some(e.user_message()),
            }
        });

        result
    }

    async fn run_download(
        &self,
        summary: &LearningGoalSummary,
        language: &str,
    ) -> Result<Vec<String>, DownloadError> {
        tracing::info!(
            goal = %summary.uid,
            name = %summary.name,
            language,
            "Starting learning goal download"
        );

        let fetched = fetch_learning_goal_bundle(self.content_source.as_ref(), summary, language)
            .await
            .map_err(|e| fetch_failed(summary, e))?;

        let plan = merge::plan(&fetched, self.history.database())
            .await
            .map_err(|e| write_failed(summary, e))?;

        if plan.is_empty() {
            tracing::warn!(goal = %summary.uid, "All items already exist locally");
            return Err(DownloadError::AlreadyExists {
                goal_name: summary.name.clone(),
            });
        }

        let batch = ContentBatch::new(plan.new_goal, plan.new_units);
        let names = batch.display_names();
        let unit_count = batch.units.len();

        self.history
            .execute(Operation::AddContent(batch), true)
            .await
            .map_err(|e| write_failed(summary, e))?;

        tracing::info!(
            goal = %summary.uid,
            added = names.len(),
            units = unit_count,
            "Downloaded learning goal"
        );
        Ok(names)
    }
}

fn fetch_failed(summary: &LearningGoalSummary, e: Error) -> DownloadError {
    tracing::error!(goal = %summary.uid, error = %e, "Failed to fetch learning goal");
    DownloadError::FetchFailed {
        goal_name: summary.name.clone(),
        source: Box::new(e),
    }
}

fn write_failed(summary: &LearningGoalSummary, e: Error) -> DownloadError {
    tracing::error!(goal = %summary.uid, error = %e, "Failed to store learning goal");
    DownloadError::WriteFailed {
        goal_name: summary.name.clone(),
        source: Box::new(e),
    }
}
