use crate::domain::{AnimeId, ExternalId, RelationKind};
use crate::entities::{anime_relation, prelude::*};
use crate::models::{NewRelation, RelationEdge};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::collections::HashSet;
use tracing::debug;

pub struct RelationRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RelationRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    fn map_model(model: anime_relation::Model) -> RelationEdge {
        RelationEdge {
            id: model.id,
            source_id: AnimeId::new(model.source_id),
            target_id: model.target_id.map(AnimeId::new),
            target_external_id: ExternalId::new(model.target_external_id),
            target_name: model.target_name,
            target_poster_url: model.target_poster_url,
            kind: RelationKind::parse_lenient(&model.relation_kind),
        }
    }

    /// Deletes every edge of `source` and inserts `edges` in their given order.
    ///
    /// Must run inside a transaction for the swap to be atomic. Repeated
    /// `(target, kind)` pairs are inserted once.
    pub async fn replace_for_source(
        &self,
        source: AnimeId,
        edges: &[NewRelation],
    ) -> anyhow::Result<u64> {
        let deleted = AnimeRelation::delete_many()
            .filter(anime_relation::Column::SourceId.eq(source.value()))
            .exec(self.conn)
            .await?;

        let mut seen = HashSet::new();
        let models: Vec<_> = edges
            .iter()
            .filter(|edge| seen.insert((edge.target_external_id, edge.kind)))
            .map(|edge| anime_relation::ActiveModel {
                source_id: Set(source.value()),
                target_id: Set(edge.target_id.map(AnimeId::value)),
                target_external_id: Set(edge.target_external_id.value()),
                target_name: Set(edge.target_name.clone()),
                target_poster_url: Set(edge.target_poster_url.clone()),
                relation_kind: Set(edge.kind.as_str().to_string()),
                ..Default::default()
            })
            .collect();

        let inserted = models.len() as u64;
        if !models.is_empty() {
            AnimeRelation::insert_many(models).exec(self.conn).await?;
        }

        debug!(
            "Replaced relations for anime {}: {} removed, {} inserted",
            source, deleted.rows_affected, inserted
        );
        Ok(inserted)
    }

    /// Outgoing edges in insertion order.
    pub async fn list_outgoing(&self, source: AnimeId) -> anyhow::Result<Vec<RelationEdge>> {
        let rows = AnimeRelation::find()
            .filter(anime_relation::Column::SourceId.eq(source.value()))
            .order_by_asc(anime_relation::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Edges from other works that point at `target`, in insertion order.
    ///
    /// Edges written before the target was imported only carry its external
    /// id, so both columns are matched.
    pub async fn list_incoming(
        &self,
        target: AnimeId,
        target_external_id: ExternalId,
    ) -> anyhow::Result<Vec<RelationEdge>> {
        let rows = AnimeRelation::find()
            .filter(
                Condition::any()
                    .add(anime_relation::Column::TargetId.eq(target.value()))
                    .add(anime_relation::Column::TargetExternalId.eq(target_external_id.value())),
            )
            .order_by_asc(anime_relation::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }
}
