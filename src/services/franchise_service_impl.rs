//! `SeaORM` implementation of the `FranchiseService` trait.

use crate::constants::franchise::STALE_GRAPH_HORIZON_DAYS;
use crate::db::{Store, timestamp};
use crate::domain::{AnimeId, ExternalId, FranchiseId, RawGraph};
use crate::models::{Anime, Franchise, FranchiseGraphUpdate, NewRelation};
use crate::services::franchise_service::{
    FranchiseError, FranchiseService, SyncOutcome, canonical_key,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub type Clock = fn() -> DateTime<Utc>;

/// SeaORM-based implementation of [`FranchiseService`].
pub struct SeaOrmFranchiseService {
    store: Arc<Store>,
    clock: Clock,
}

impl SeaOrmFranchiseService {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            clock: Utc::now,
        }
    }

    /// Replaces the time source used for sync timestamps and the staleness cutoff.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn relations_for(
        graph: &RawGraph,
        source: ExternalId,
        local_targets: &HashMap<ExternalId, Anime>,
    ) -> Vec<NewRelation> {
        graph
            .outgoing(source)
            .filter(|edge| edge.to_external_id != source)
            .map(|edge| {
                let target = edge.to_external_id;
                let node = graph.node(target);
                let local = local_targets.get(&target);

                NewRelation {
                    target_id: local.map(|anime| anime.id),
                    target_external_id: target,
                    target_name: node
                        .and_then(|n| n.title.clone())
                        .or_else(|| local.map(|anime| anime.title.clone()))
                        .unwrap_or_else(|| format!("#{target}")),
                    target_poster_url: node
                        .and_then(|n| n.poster_url.clone())
                        .or_else(|| local.and_then(|anime| anime.poster_url.clone())),
                    kind: edge.relation_kind(),
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl FranchiseService for SeaOrmFranchiseService {
    async fn sync(
        &self,
        graph: &RawGraph,
        root_external_id: ExternalId,
        name: &str,
    ) -> Result<SyncOutcome, FranchiseError> {
        let Some(computed) = graph.root_external_id() else {
            debug!("Empty graph for root {}, nothing to sync", root_external_id);
            return Ok(SyncOutcome::default());
        };

        if computed != root_external_id {
            return Err(FranchiseError::RootMismatch {
                supplied: root_external_id,
                computed,
            });
        }

        let snapshot = serde_json::to_string(graph)?;
        let synced_at = timestamp(self.now());
        let node_ids = graph.node_ids();

        let txn = self.store.begin().await?;

        let existing = txn.find_franchise_by_root(root_external_id).await?;
        let members = txn.find_anime_by_external_ids(&node_ids).await?;

        if existing.is_none() && members.is_empty() {
            debug!(
                "No local work in cluster {} ({} nodes), skipping franchise creation",
                root_external_id,
                node_ids.len()
            );
            return Ok(SyncOutcome::default());
        }

        let franchise = txn
            .upsert_franchise_by_root(root_external_id, name, &snapshot, &synced_at)
            .await?;

        let member_ids: Vec<AnimeId> = members.iter().map(|anime| anime.id).collect();
        let updated_count = txn.bulk_set_franchise(&member_ids, franchise.id).await?;

        txn.commit().await?;

        info!(
            "Synced franchise {} '{}' (root {}): {} nodes, {} local works linked",
            franchise.id,
            franchise.name,
            root_external_id,
            node_ids.len(),
            updated_count
        );

        Ok(SyncOutcome {
            franchise: Some(franchise),
            updated_count,
        })
    }

    async fn sync_graph(
        &self,
        graph: &RawGraph,
        name: Option<&str>,
    ) -> Result<SyncOutcome, FranchiseError> {
        let Some((root, derived_name)) = canonical_key(graph) else {
            return Ok(SyncOutcome::default());
        };

        self.sync(graph, root, name.unwrap_or(&derived_name)).await
    }

    async fn refresh_graph_only(
        &self,
        franchise_id: FranchiseId,
        graph: &RawGraph,
        name: Option<&str>,
    ) -> Result<Option<Franchise>, FranchiseError> {
        let update = FranchiseGraphUpdate {
            name: name.map(str::to_string),
            graph_snapshot: serde_json::to_string(graph)?,
            graph_synced_at: timestamp(self.now()),
        };

        let franchise = self
            .store
            .update_franchise_graph(franchise_id, &update)
            .await?;

        if franchise.is_some() {
            info!(
                "Refreshed graph snapshot for franchise {} ({} nodes)",
                franchise_id,
                graph.nodes.len()
            );
        }

        Ok(franchise)
    }

    async fn store_relations(
        &self,
        graph: &RawGraph,
        source: ExternalId,
    ) -> Result<Option<u64>, FranchiseError> {
        let Some(source_anime) = self.store.find_anime_by_external_id(source).await? else {
            debug!("Source {} not imported, relations not stored", source);
            return Ok(None);
        };

        let target_ids: Vec<ExternalId> = graph.outgoing(source).map(|e| e.to_external_id).collect();
        let local_targets: HashMap<ExternalId, Anime> = self
            .store
            .find_anime_by_external_ids(&target_ids)
            .await?
            .into_iter()
            .map(|anime| (anime.external_id, anime))
            .collect();

        let relations = Self::relations_for(graph, source, &local_targets);
        let stored = self
            .store
            .replace_relations_for_source(source_anime.id, &relations)
            .await?;

        debug!(
            "Stored {} relations for anime {} ({} local targets)",
            stored,
            source_anime.id,
            local_targets.len()
        );
        Ok(Some(stored))
    }

    async fn find_stale_graph_franchises(
        &self,
        limit: u64,
    ) -> Result<Vec<Franchise>, FranchiseError> {
        let horizon = chrono::Duration::days(STALE_GRAPH_HORIZON_DAYS);
        Ok(self
            .store
            .list_stale_franchises(horizon, limit, self.now())
            .await?)
    }

    async fn get_franchise(&self, id: FranchiseId) -> Result<Option<Franchise>, FranchiseError> {
        Ok(self.store.get_franchise(id).await?)
    }

    async fn franchise_members(&self, id: FranchiseId) -> Result<Vec<Anime>, FranchiseError> {
        Ok(self.store.list_franchise_members(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawEdge, RawNode, RelationKind, WatchStatus};

    fn node(id: i32, title: &str) -> RawNode {
        RawNode {
            external_id: ExternalId::new(id),
            title: Some(title.to_string()),
            poster_url: Some(format!("https://img.example/{id}.jpg")),
            year: None,
        }
    }

    fn edge(from: i32, to: i32, kind: &str) -> RawEdge {
        RawEdge {
            from_external_id: ExternalId::new(from),
            to_external_id: ExternalId::new(to),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn relations_for_denormalizes_and_resolves_targets() {
        let graph = RawGraph {
            nodes: vec![node(1, "One"), node(2, "Two"), node(3, "Three")],
            edges: vec![
                edge(1, 2, "SEQUEL"),
                edge(1, 3, "made_up"),
                edge(2, 3, "SEQUEL"),
                edge(1, 1, "OTHER"),
                edge(1, 4, "SPIN_OFF"),
            ],
        };
        let local = Anime {
            id: AnimeId::new(70),
            external_id: ExternalId::new(2),
            title: "Two (local)".to_string(),
            poster_url: None,
            year: Some(2020),
            watch_status: WatchStatus::NotStarted,
            franchise_id: None,
            updated_at: String::new(),
        };
        let locals = HashMap::from([(ExternalId::new(2), local)]);

        let relations = SeaOrmFranchiseService::relations_for(&graph, ExternalId::new(1), &locals);

        assert_eq!(relations.len(), 3);
        assert_eq!(relations[0].target_id, Some(AnimeId::new(70)));
        assert_eq!(relations[0].target_name, "Two");
        assert_eq!(relations[0].kind, RelationKind::Sequel);
        assert_eq!(relations[1].kind, RelationKind::Other);
        assert_eq!(relations[1].target_id, None);
        assert_eq!(relations[2].target_name, "#4");
        assert_eq!(relations[2].target_poster_url, None);
    }
}
