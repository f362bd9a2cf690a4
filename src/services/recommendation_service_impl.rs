//! `SeaORM` implementation of the `RecommendationService` trait.

use crate::db::Store;
use crate::domain::relation::select_next;
use crate::domain::{AnimeId, WatchStatus};
use crate::models::{Anime, EpisodeSummary, RelationEdge};
use crate::services::recommendation_service::{
    RecommendationError, RecommendationService, Suggestion,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct SeaOrmRecommendationService {
    store: Arc<Store>,
    recent_completed_window: u64,
}

impl SeaOrmRecommendationService {
    #[must_use]
    pub const fn new(store: Arc<Store>, recent_completed_window: u64) -> Self {
        Self {
            store,
            recent_completed_window,
        }
    }

    /// Resolves the edge target to a local work, by id first and then by
    /// external id for edges stored before the target was imported.
    async fn resolve_target(&self, edge: &RelationEdge) -> anyhow::Result<Option<Anime>> {
        if let Some(target_id) = edge.target_id
            && let Some(anime) = self.store.get_anime(target_id).await?
        {
            return Ok(Some(anime));
        }
        self.store
            .find_anime_by_external_id(edge.target_external_id)
            .await
    }

    async fn build_suggestion(&self, edge: RelationEdge) -> anyhow::Result<Suggestion> {
        let Some(target) = self.resolve_target(&edge).await? else {
            return Ok(Suggestion {
                source_id: edge.source_id,
                anime_id: None,
                external_id: edge.target_external_id,
                name: edge.target_name,
                poster_url: edge.target_poster_url,
                relation_kind: edge.kind,
                watch_status: WatchStatus::NotStarted,
                total_episodes: 0,
                watched_episodes: 0,
                first_episode_id: None,
            });
        };

        let EpisodeSummary {
            total,
            watched,
            first_episode_id,
        } = self.store.episode_summary(target.id).await?;

        Ok(Suggestion {
            source_id: edge.source_id,
            anime_id: Some(target.id),
            external_id: target.external_id,
            name: if target.title.is_empty() {
                edge.target_name
            } else {
                target.title
            },
            poster_url: target.poster_url.or(edge.target_poster_url),
            relation_kind: edge.kind,
            watch_status: target.watch_status,
            total_episodes: total,
            watched_episodes: watched,
            first_episode_id,
        })
    }
}

#[async_trait::async_trait]
impl RecommendationService for SeaOrmRecommendationService {
    async fn suggest_next(
        &self,
        source: AnimeId,
    ) -> Result<Option<Suggestion>, RecommendationError> {
        let edges = self.store.list_outgoing_relations(source).await?;
        let edge_count = edges.len();

        let Some(best) = select_next(edges, |edge| edge.kind) else {
            debug!("No next candidate among {} edges of anime {}", edge_count, source);
            return Ok(None);
        };

        Ok(Some(self.build_suggestion(best).await?))
    }

    async fn suggest_global_next(&self) -> Result<Option<Suggestion>, RecommendationError> {
        let completed = self
            .store
            .list_recently_completed(self.recent_completed_window)
            .await?;

        for anime in &completed {
            if let Some(suggestion) = self.suggest_next(anime.id).await?
                && suggestion.is_actionable()
            {
                info!(
                    "Global suggestion: '{}' after '{}' ({})",
                    suggestion.name, anime.title, suggestion.relation_kind
                );
                return Ok(Some(suggestion));
            }
        }

        debug!(
            "No actionable suggestion among {} recently completed works",
            completed.len()
        );
        Ok(None)
    }

    async fn set_watch_status(
        &self,
        anime: AnimeId,
        status: WatchStatus,
    ) -> Result<Option<Suggestion>, RecommendationError> {
        if !self.store.set_watch_status(anime, status).await? {
            debug!("Anime {} not found for status update", anime);
            return Ok(None);
        }

        info!("Anime {} marked {}", anime, status);
        self.suggest_next(anime).await
    }
}
