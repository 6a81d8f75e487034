//! Trait for remote content sources

use crate::types::{LearningGoal, Uid, UnitOfMeaning};
use async_trait::async_trait;

/// Read-only access to the remote content service
///
/// Implementations must be safe to call concurrently: the bundle fetch
/// issues all unit requests of a phase at once.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the full learning goal `uid` in `language`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success response, or a
    /// body that is not a valid learning goal.
    async fn fetch_learning_goal(&self, language: &str, uid: &Uid) -> crate::Result<LearningGoal>;

    /// Fetch the unit of meaning `uid`
    ///
    /// The language used for the request is the one encoded in `uid`
    /// (see [`Uid::language`]), not the language of any goal referencing it.
    async fn fetch_unit(&self, uid: &Uid) -> crate::Result<UnitOfMeaning>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
