//! Error types for linguanodon-sync
//!
//! This module provides error handling for the library:
//! - [`Error`] - crate-wide error for store, network and configuration failures
//! - [`DatabaseError`] - local store failures with context
//! - [`DownloadError`] - discriminated outcome kinds surfaced by the
//!   [`Downloader`](crate::downloader::Downloader), each rendering a
//!   user-facing message while keeping the underlying cause for logging

use crate::types::Table;
use thiserror::Error;

/// Result type alias for linguanodon-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for linguanodon-sync
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "content.base_url")
        key: Option<String>,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Network error (connection, timeout, body decoding)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Content service answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create the tables
    #[error("failed to create schema: {0}")]
    SchemaFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Constraint violation (e.g., duplicate uid)
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A transaction tried to write a table it was not opened for
    #[error("table {table} is not part of this transaction (scope: {scope:?})")]
    TableNotInScope {
        /// The table that was written
        table: Table,
        /// The tables the transaction was opened for
        scope: Vec<Table>,
    },
}

/// Message shown when a download has nothing new to add
pub const ALREADY_EXISTS_MESSAGE: &str = "All items already exist locally.";

/// Message shown when a download is rejected because another is running
pub const IN_PROGRESS_MESSAGE: &str = "A download is already in progress.";

/// Outcome kinds of a learning-goal download that did not add anything
///
/// Every variant renders a plain user-facing string through
/// [`DownloadError::user_message`]. Fetch and write failures keep the
/// underlying [`Error`] as their source for diagnostics; the message itself
/// never includes it.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Goal, units and translations are all present locally already
    #[error("learning goal '{goal_name}' already exists locally")]
    AlreadyExists {
        /// Name of the requested goal
        goal_name: String,
    },

    /// A network or decoding failure aborted the download
    #[error("failed to fetch learning goal '{goal_name}': {source}")]
    FetchFailed {
        /// Name of the requested goal
        goal_name: String,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// Reading from or writing to the local store failed
    #[error("failed to store learning goal '{goal_name}': {source}")]
    WriteFailed {
        /// Name of the requested goal
        goal_name: String,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// Another download on the same downloader is still running
    #[error("download of '{goal_name}' rejected: another download is in progress")]
    InProgress {
        /// Name of the rejected goal
        goal_name: String,
    },
}

impl DownloadError {
    /// Human-readable message suitable for displaying to end users
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::AlreadyExists { .. } => ALREADY_EXISTS_MESSAGE.to_string(),
            DownloadError::FetchFailed { goal_name, .. }
            | DownloadError::WriteFailed { goal_name, .. } => {
                format!("Failed to download '{}'. See logs for details.", goal_name)
            }
            DownloadError::InProgress { .. } => IN_PROGRESS_MESSAGE.to_string(),
        }
    }

    /// Whether this outcome is the benign "nothing new" case
    pub fn is_already_exists(&self) -> bool {
        matches!(self, DownloadError::AlreadyExists { .. })
    }
}

impl Error {
    /// Build a query failure with a description of what was attempted
    pub(crate) fn query(context: &str, e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error()
            && db_err.is_unique_violation()
        {
            return Error::Database(DatabaseError::ConstraintViolation(format!(
                "{}: {}",
                context, db_err
            )));
        }
        Error::Database(DatabaseError::QueryFailed(format!("{}: {}", context, e)))
    }
}
