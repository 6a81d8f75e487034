//! Remote content fetching
//!
//! The content service is a read-only HTTP JSON API keyed by language and
//! uid. [`ContentSource`] is the seam between the pipeline and that service:
//!
//! - [`HttpContentClient`]: fetches from the configured content host
//! - [`fetch_learning_goal_bundle`]: resolves a goal into everything needed
//!   to store it offline (goal, its units, their direct translations)
//!
//! ## Usage
//!
//! ```no_run
//! use linguanodon_sync::config::ContentConfig;
//! use linguanodon_sync::content::{HttpContentClient, fetch_learning_goal_bundle};
//! use linguanodon_sync::LearningGoalSummary;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpContentClient::new(&ContentConfig::default())?;
//!     let summary = LearningGoalSummary::new("en_goal1", "Animals");
//!
//!     let fetched = fetch_learning_goal_bundle(&client, &summary, "en").await?;
//!     println!(
//!         "{}: {} units, {} translations",
//!         fetched.goal.name,
//!         fetched.units.len(),
//!         fetched.translations.len()
//!     );
//!     Ok(())
//! }
//! ```

mod bundle;
mod http;
mod traits;

pub use bundle::{FetchedContent, fetch_learning_goal_bundle};
pub use http::HttpContentClient;
pub use traits::ContentSource;
