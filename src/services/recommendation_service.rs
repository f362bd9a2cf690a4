//! Domain service for "what to watch next" recommendations.

use crate::domain::{AnimeId, ExternalId, RelationKind, WatchStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for RecommendationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RecommendationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Best next work for a source work.
///
/// Local fields win when the target has been imported; otherwise the
/// denormalized upstream name and poster stored on the edge are used.
/// `anime_id` and `first_episode_id` stay empty until import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub source_id: AnimeId,
    pub anime_id: Option<AnimeId>,
    pub external_id: ExternalId,
    pub name: String,
    pub poster_url: Option<String>,
    pub relation_kind: RelationKind,
    pub watch_status: WatchStatus,
    pub total_episodes: i32,
    pub watched_episodes: i32,
    pub first_episode_id: Option<i32>,
}

impl Suggestion {
    /// Imported, untouched and playable right away.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        self.anime_id.is_some()
            && matches!(self.watch_status, WatchStatus::NotStarted)
            && self.first_episode_id.is_some()
    }
}

#[async_trait::async_trait]
pub trait RecommendationService: Send + Sync {
    /// Picks the single best next work reachable from `source` through its
    /// outgoing edges. Sequels beat side stories, spin-offs, parent stories
    /// and full stories, in that order; other kinds are never suggested.
    /// Returns `None` for an unknown source or when no candidate edge exists.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError::Database`] on storage failures.
    async fn suggest_next(&self, source: AnimeId)
    -> Result<Option<Suggestion>, RecommendationError>;

    /// Looks through the most recently completed works (bounded window) and
    /// returns the first actionable suggestion. `None` means nothing was found
    /// inside the window, not that nothing exists.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError::Database`] on storage failures.
    async fn suggest_global_next(&self) -> Result<Option<Suggestion>, RecommendationError>;

    /// Records a watch-status change and returns the next suggestion for the
    /// work. `None` if the work does not exist or has no candidate.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError::Database`] on storage failures.
    async fn set_watch_status(
        &self,
        anime: AnimeId,
        status: WatchStatus,
    ) -> Result<Option<Suggestion>, RecommendationError>;
}
