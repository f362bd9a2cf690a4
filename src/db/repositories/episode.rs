use crate::domain::AnimeId;
use crate::entities::{episode, prelude::*};
use crate::models::{EpisodeSummary, NewEpisode};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

pub struct EpisodeRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> EpisodeRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn add_many(&self, anime_id: AnimeId, episodes: &[NewEpisode]) -> anyhow::Result<()> {
        if episodes.is_empty() {
            return Ok(());
        }

        let models = episodes.iter().map(|ep| episode::ActiveModel {
            anime_id: Set(anime_id.value()),
            number: Set(ep.number),
            watched: Set(ep.watched),
            ..Default::default()
        });

        Episode::insert_many(models).exec(self.conn).await?;
        Ok(())
    }

    pub async fn summary(&self, anime_id: AnimeId) -> anyhow::Result<EpisodeSummary> {
        let rows = Episode::find()
            .filter(episode::Column::AnimeId.eq(anime_id.value()))
            .order_by_asc(episode::Column::Number)
            .order_by_asc(episode::Column::Id)
            .all(self.conn)
            .await?;

        let watched = rows.iter().filter(|ep| ep.watched).count();

        Ok(EpisodeSummary {
            total: i32::try_from(rows.len()).unwrap_or(i32::MAX),
            watched: i32::try_from(watched).unwrap_or(i32::MAX),
            first_episode_id: rows.first().map(|ep| ep.id),
        })
    }
}
