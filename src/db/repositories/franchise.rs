use crate::domain::{ExternalId, FranchiseId};
use crate::entities::{franchise, prelude::*};
use crate::models::{Franchise as FranchiseRecord, FranchiseGraphUpdate};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use tracing::debug;

pub struct FranchiseRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> FranchiseRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    fn map_model(model: franchise::Model) -> FranchiseRecord {
        FranchiseRecord {
            id: FranchiseId::new(model.id),
            name: model.name,
            root_external_id: model.root_external_id.map(ExternalId::new),
            graph_snapshot: model.graph_snapshot,
            graph_synced_at: model.graph_synced_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub async fn get(&self, id: FranchiseId) -> anyhow::Result<Option<FranchiseRecord>> {
        let model = Franchise::find_by_id(id.value()).one(self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    pub async fn find_by_root(
        &self,
        root_external_id: ExternalId,
    ) -> anyhow::Result<Option<FranchiseRecord>> {
        let model = Franchise::find()
            .filter(franchise::Column::RootExternalId.eq(root_external_id.value()))
            .one(self.conn)
            .await?;
        Ok(model.map(Self::map_model))
    }

    /// Creates the franchise keyed by `root_external_id`, or overwrites name,
    /// snapshot and sync time of the existing one. No field-level merge.
    pub async fn upsert_by_root(
        &self,
        root_external_id: ExternalId,
        name: &str,
        graph_snapshot: &str,
        synced_at: &str,
    ) -> anyhow::Result<FranchiseRecord> {
        let active_model = franchise::ActiveModel {
            name: Set(name.to_string()),
            root_external_id: Set(Some(root_external_id.value())),
            graph_snapshot: Set(Some(graph_snapshot.to_string())),
            graph_synced_at: Set(Some(synced_at.to_string())),
            created_at: Set(synced_at.to_string()),
            updated_at: Set(synced_at.to_string()),
            ..Default::default()
        };

        Franchise::insert(active_model)
            .on_conflict(
                OnConflict::column(franchise::Column::RootExternalId)
                    .update_columns([
                        franchise::Column::Name,
                        franchise::Column::GraphSnapshot,
                        franchise::Column::GraphSyncedAt,
                        franchise::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.conn)
            .await?;

        self.find_by_root(root_external_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Franchise {root_external_id} vanished after upsert"))
    }

    /// Overwrites snapshot and sync time (and the name when given).
    /// Returns `None` when the franchise does not exist.
    pub async fn update_graph(
        &self,
        id: FranchiseId,
        update: &FranchiseGraphUpdate,
    ) -> anyhow::Result<Option<FranchiseRecord>> {
        let mut query = Franchise::update_many()
            .col_expr(
                franchise::Column::GraphSnapshot,
                Expr::value(update.graph_snapshot.as_str()),
            )
            .col_expr(
                franchise::Column::GraphSyncedAt,
                Expr::value(update.graph_synced_at.as_str()),
            )
            .col_expr(
                franchise::Column::UpdatedAt,
                Expr::value(update.graph_synced_at.as_str()),
            );

        if let Some(name) = &update.name {
            query = query.col_expr(franchise::Column::Name, Expr::value(name.as_str()));
        }

        let result = query
            .filter(franchise::Column::Id.eq(id.value()))
            .exec(self.conn)
            .await?;

        if result.rows_affected == 0 {
            debug!("Franchise {} not found for graph update", id);
            return Ok(None);
        }

        self.get(id).await
    }

    /// Keyed franchises never synced or synced before `threshold`, oldest first.
    pub async fn list_stale(
        &self,
        threshold: &str,
        limit: u64,
    ) -> anyhow::Result<Vec<FranchiseRecord>> {
        let rows = Franchise::find()
            .filter(franchise::Column::RootExternalId.is_not_null())
            .filter(
                Condition::any()
                    .add(franchise::Column::GraphSyncedAt.is_null())
                    .add(franchise::Column::GraphSyncedAt.lt(threshold)),
            )
            // SQLite sorts NULL first in ascending order: never-synced rows lead.
            .order_by_asc(franchise::Column::GraphSyncedAt)
            .order_by_asc(franchise::Column::Id)
            .limit(limit)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Inserts a franchise with no graph key, e.g. one curated by hand.
    pub async fn create_unkeyed(&self, name: &str, now: &str) -> anyhow::Result<FranchiseRecord> {
        use sea_orm::ActiveModelTrait;

        let model = franchise::ActiveModel {
            name: Set(name.to_string()),
            root_external_id: Set(None),
            graph_snapshot: Set(None),
            graph_synced_at: Set(None),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(Self::map_model(model))
    }
}
