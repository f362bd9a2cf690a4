use crate::domain::{AnimeId, ExternalId, FranchiseId, WatchStatus};
use crate::models::{
    Anime, EpisodeSummary, Franchise, FranchiseGraphUpdate, NewAnime, NewEpisode, NewRelation,
    RelationEdge,
};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, Statement,
    TransactionTrait,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

use repositories::anime::AnimeRepository;
use repositories::episode::EpisodeRepository;
use repositories::franchise::FranchiseRepository;
use repositories::relation::RelationRepository;

/// Formats a timestamp the way every `*_at` column stores it.
///
/// Fixed precision and a `Z` suffix keep lexicographic order equal to
/// chronological order, which the staleness and recency queries rely on.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Relation store adapter over `SeaORM`.
///
/// Plain data access only. Multi-statement units that must apply atomically
/// go through [`Store::begin`].
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite:")
                .split('?')
                .next()
                .unwrap_or_default();
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Opens a transaction. Dropping the returned handle without
    /// [`StoreTransaction::commit`] rolls every write back.
    pub async fn begin(&self) -> Result<StoreTransaction> {
        Ok(StoreTransaction {
            txn: self.conn.begin().await?,
        })
    }

    fn anime_repo(&self) -> AnimeRepository<'_, DatabaseConnection> {
        AnimeRepository::new(&self.conn)
    }

    fn episode_repo(&self) -> EpisodeRepository<'_, DatabaseConnection> {
        EpisodeRepository::new(&self.conn)
    }

    fn relation_repo(&self) -> RelationRepository<'_, DatabaseConnection> {
        RelationRepository::new(&self.conn)
    }

    fn franchise_repo(&self) -> FranchiseRepository<'_, DatabaseConnection> {
        FranchiseRepository::new(&self.conn)
    }

    pub async fn add_anime(&self, anime: &NewAnime) -> Result<Anime> {
        self.anime_repo().add(anime, &timestamp(Utc::now())).await
    }

    pub async fn get_anime(&self, id: AnimeId) -> Result<Option<Anime>> {
        self.anime_repo().get(id).await
    }

    pub async fn find_anime_by_external_id(&self, external_id: ExternalId) -> Result<Option<Anime>> {
        self.anime_repo().find_by_external_id(external_id).await
    }

    pub async fn find_anime_by_external_ids(&self, external_ids: &[ExternalId]) -> Result<Vec<Anime>> {
        self.anime_repo().find_by_external_ids(external_ids).await
    }

    pub async fn list_franchise_members(&self, franchise_id: FranchiseId) -> Result<Vec<Anime>> {
        self.anime_repo().list_by_franchise(franchise_id).await
    }

    pub async fn bulk_set_franchise(&self, ids: &[AnimeId], franchise_id: FranchiseId) -> Result<u64> {
        self.anime_repo().bulk_set_franchise(ids, franchise_id).await
    }

    pub async fn set_watch_status(&self, id: AnimeId, status: WatchStatus) -> Result<bool> {
        self.set_watch_status_at(id, status, Utc::now()).await
    }

    pub async fn set_watch_status_at(
        &self,
        id: AnimeId,
        status: WatchStatus,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.anime_repo()
            .set_watch_status(id, status, &timestamp(at))
            .await
    }

    pub async fn list_recently_completed(&self, limit: u64) -> Result<Vec<Anime>> {
        self.anime_repo().list_recently_completed(limit).await
    }

    pub async fn add_episodes(&self, anime_id: AnimeId, episodes: &[NewEpisode]) -> Result<()> {
        self.episode_repo().add_many(anime_id, episodes).await
    }

    pub async fn episode_summary(&self, anime_id: AnimeId) -> Result<EpisodeSummary> {
        self.episode_repo().summary(anime_id).await
    }

    /// Swaps the whole outgoing edge set of `source` in one transaction.
    pub async fn replace_relations_for_source(
        &self,
        source: AnimeId,
        edges: &[NewRelation],
    ) -> Result<u64> {
        let txn = self.begin().await?;
        let inserted = txn.replace_relations_for_source(source, edges).await?;
        txn.commit().await?;
        Ok(inserted)
    }

    pub async fn list_outgoing_relations(&self, source: AnimeId) -> Result<Vec<RelationEdge>> {
        self.relation_repo().list_outgoing(source).await
    }

    pub async fn list_incoming_relations(
        &self,
        target: AnimeId,
        target_external_id: ExternalId,
    ) -> Result<Vec<RelationEdge>> {
        self.relation_repo()
            .list_incoming(target, target_external_id)
            .await
    }

    pub async fn get_franchise(&self, id: FranchiseId) -> Result<Option<Franchise>> {
        self.franchise_repo().get(id).await
    }

    pub async fn find_franchise_by_root(&self, root: ExternalId) -> Result<Option<Franchise>> {
        self.franchise_repo().find_by_root(root).await
    }

    pub async fn create_unkeyed_franchise(&self, name: &str) -> Result<Franchise> {
        self.franchise_repo()
            .create_unkeyed(name, &timestamp(Utc::now()))
            .await
    }

    pub async fn update_franchise_graph(
        &self,
        id: FranchiseId,
        update: &FranchiseGraphUpdate,
    ) -> Result<Option<Franchise>> {
        self.franchise_repo().update_graph(id, update).await
    }

    /// Keyed franchises whose graph was never synced or synced before `now - horizon`.
    pub async fn list_stale_franchises(
        &self,
        horizon: chrono::Duration,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Franchise>> {
        let threshold = now
            .checked_sub_signed(horizon)
            .map_or_else(|| "1970-01-01T00:00:00.000Z".to_string(), timestamp);

        self.franchise_repo().list_stale(&threshold, limit).await
    }
}

/// Open transaction over the same repositories as [`Store`].
pub struct StoreTransaction {
    txn: DatabaseTransaction,
}

impl StoreTransaction {
    pub async fn find_franchise_by_root(&self, root: ExternalId) -> Result<Option<Franchise>> {
        FranchiseRepository::new(&self.txn).find_by_root(root).await
    }

    pub async fn upsert_franchise_by_root(
        &self,
        root: ExternalId,
        name: &str,
        graph_snapshot: &str,
        synced_at: &str,
    ) -> Result<Franchise> {
        FranchiseRepository::new(&self.txn)
            .upsert_by_root(root, name, graph_snapshot, synced_at)
            .await
    }

    pub async fn find_anime_by_external_ids(&self, external_ids: &[ExternalId]) -> Result<Vec<Anime>> {
        AnimeRepository::new(&self.txn)
            .find_by_external_ids(external_ids)
            .await
    }

    pub async fn bulk_set_franchise(&self, ids: &[AnimeId], franchise_id: FranchiseId) -> Result<u64> {
        AnimeRepository::new(&self.txn)
            .bulk_set_franchise(ids, franchise_id)
            .await
    }

    pub async fn replace_relations_for_source(
        &self,
        source: AnimeId,
        edges: &[NewRelation],
    ) -> Result<u64> {
        RelationRepository::new(&self.txn)
            .replace_for_source(source, edges)
            .await
    }

    pub async fn commit(self) -> Result<()> {
        self.txn.commit().await?;
        Ok(())
    }
}
