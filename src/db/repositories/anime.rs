use crate::domain::{AnimeId, ExternalId, FranchiseId, WatchStatus};
use crate::entities::{anime, prelude::*};
use crate::models::{Anime as AnimeRecord, NewAnime};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::{debug, info};

pub struct AnimeRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AnimeRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub(crate) fn map_model(model: anime::Model) -> AnimeRecord {
        AnimeRecord {
            id: AnimeId::new(model.id),
            external_id: ExternalId::new(model.external_id),
            title: model.title,
            poster_url: model.poster_url,
            year: model.year,
            watch_status: WatchStatus::from_db(&model.watch_status),
            franchise_id: model.franchise_id.map(FranchiseId::new),
            updated_at: model.updated_at,
        }
    }

    pub async fn add(&self, anime: &NewAnime, now: &str) -> anyhow::Result<AnimeRecord> {
        let active_model = anime::ActiveModel {
            external_id: Set(anime.external_id.value()),
            title: Set(anime.title.clone()),
            poster_url: Set(anime.poster_url.clone()),
            year: Set(anime.year),
            watch_status: Set(anime.watch_status.as_str().to_string()),
            franchise_id: Set(None),
            updated_at: Set(now.to_string()),
            ..Default::default()
        };

        let model = active_model.insert(self.conn).await?;
        info!(
            "Added anime {} (external id {})",
            model.title, model.external_id
        );
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: AnimeId) -> anyhow::Result<Option<AnimeRecord>> {
        let model = Anime::find_by_id(id.value()).one(self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    pub async fn find_by_external_id(
        &self,
        external_id: ExternalId,
    ) -> anyhow::Result<Option<AnimeRecord>> {
        let model = Anime::find()
            .filter(anime::Column::ExternalId.eq(external_id.value()))
            .one(self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    pub async fn find_by_external_ids(
        &self,
        external_ids: &[ExternalId],
    ) -> anyhow::Result<Vec<AnimeRecord>> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Anime::find()
            .filter(anime::Column::ExternalId.is_in(external_ids.iter().copied().map(ExternalId::value)))
            .order_by_asc(anime::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_franchise(
        &self,
        franchise_id: FranchiseId,
    ) -> anyhow::Result<Vec<AnimeRecord>> {
        let rows = Anime::find()
            .filter(anime::Column::FranchiseId.eq(franchise_id.value()))
            .order_by_asc(anime::Column::ExternalId)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Points every listed work at `franchise_id` in one statement.
    pub async fn bulk_set_franchise(
        &self,
        ids: &[AnimeId],
        franchise_id: FranchiseId,
    ) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = Anime::update_many()
            .col_expr(
                anime::Column::FranchiseId,
                Expr::value(franchise_id.value()),
            )
            .filter(anime::Column::Id.is_in(ids.iter().copied().map(AnimeId::value)))
            .exec(self.conn)
            .await?;

        debug!(
            "Linked {} anime to franchise {}",
            result.rows_affected, franchise_id
        );
        Ok(result.rows_affected)
    }

    pub async fn set_watch_status(
        &self,
        id: AnimeId,
        status: WatchStatus,
        now: &str,
    ) -> anyhow::Result<bool> {
        let result = Anime::update_many()
            .col_expr(anime::Column::WatchStatus, Expr::value(status.as_str()))
            .col_expr(anime::Column::UpdatedAt, Expr::value(now))
            .filter(anime::Column::Id.eq(id.value()))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Most recently updated completed works, newest first.
    pub async fn list_recently_completed(&self, limit: u64) -> anyhow::Result<Vec<AnimeRecord>> {
        let rows = Anime::find()
            .filter(anime::Column::WatchStatus.eq(WatchStatus::Completed.as_str()))
            .order_by_desc(anime::Column::UpdatedAt)
            .order_by_desc(anime::Column::Id)
            .limit(limit)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }
}
