//! # linguanodon-sync
//!
//! Offline content synchronisation for a language-learning application.
//!
//! A learning goal is a named collection of units of meaning (words and
//! phrases). This crate downloads a goal from the remote content service,
//! together with its units and their direct translations, stores whatever
//! the local SQLite database does not have yet, and records the addition as
//! one undoable step.
//!
//! ## Design Philosophy
//!
//! linguanodon-sync is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Undoable** - Every download is a reversible [`Operation`] on a [`History`]
//! - **Atomic** - Each change is written in one transaction or not at all
//! - **Observable** - Download state on a watch channel, history changes as events
//!
//! ## Quick Start
//!
//! ```no_run
//! use linguanodon_sync::{Config, Downloader, LearningGoalSummary};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = Downloader::from_config(&Config::default()).await?;
//!
//!     let summary = LearningGoalSummary::new("en_goal1", "Animals");
//!     match downloader.download_learning_goal(&summary, "en").await {
//!         Ok(added) => println!("Added: {}", added.join(", ")),
//!         Err(e) => println!("{}", e.user_message()),
//!     }
//!
//!     // Changed my mind
//!     downloader.history().undo().await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Remote content fetching
pub mod content;
/// Database persistence layer
pub mod db;
/// Learning goal downloader
pub mod downloader;
/// Error types
pub mod error;
/// Undo/redo history
pub mod history;
/// Diffing fetched content against the local store
pub mod merge;
/// Core domain types
pub mod types;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, ContentConfig, PersistenceConfig};
pub use content::{ContentSource, FetchedContent, HttpContentClient, fetch_learning_goal_bundle};
pub use db::{Database, StoreTransaction};
pub use downloader::{DownloadState, Downloader};
pub use error::{DatabaseError, DownloadError, Error, Result};
pub use history::{ContentBatch, History, HistoryEvent, Operation};
pub use merge::MergePlan;
pub use types::{LearningGoal, LearningGoalSummary, Table, Uid, UnitOfMeaning, UnitOfMeaningCredit};
