//! Domain service for franchise canonicalization.
//!
//! A franchise is the canonical cluster of related works, keyed by the
//! minimum external id seen in its provider graph. Node membership can grow
//! between fetches, but the minimum of an already-seen cluster does not move,
//! so the key stays stable whichever member triggered the sync.

use crate::domain::{ExternalId, FranchiseId, RawGraph};
use crate::models::{Anime, Franchise};
use serde::Serialize;
use thiserror::Error;

/// Domain errors for franchise operations.
#[derive(Debug, Error)]
pub enum FranchiseError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Root external id {supplied} is not the graph minimum {computed}")]
    RootMismatch {
        supplied: ExternalId,
        computed: ExternalId,
    },

    #[error("Graph snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl From<sea_orm::DbErr> for FranchiseError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FranchiseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Result of a sync call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// `None` when the call was a no-op: empty graph, or a cluster with no
    /// local work that was never synced before.
    pub franchise: Option<Franchise>,
    /// Works whose `franchise_id` was (re)written.
    pub updated_count: u64,
}

/// Franchise key and default display name for a graph.
///
/// The name is the title of the root node when the provider supplied one.
#[must_use]
pub fn canonical_key(graph: &RawGraph) -> Option<(ExternalId, String)> {
    let root = graph.root_external_id()?;
    let name = graph
        .node(root)
        .and_then(|node| node.title.clone())
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| format!("Franchise {root}"));
    Some((root, name))
}

/// Decodes the stored graph snapshot. A missing or unreadable snapshot yields `None`.
#[must_use]
pub fn decode_snapshot(franchise: &Franchise) -> Option<RawGraph> {
    franchise
        .graph_snapshot
        .as_deref()
        .and_then(|json| serde_json::from_str(json).ok())
}

/// Domain service trait for franchise graph operations.
///
/// # Examples
///
/// ```rust,ignore
/// use kizuna::services::{FranchiseService, FranchiseError};
/// use kizuna::domain::RawGraph;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn FranchiseService>, graph: RawGraph) -> Result<(), FranchiseError> {
///     let outcome = service.sync_graph(&graph, None).await?;
///     println!("linked {} works", outcome.updated_count);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait FranchiseService: Send + Sync {
    /// Upserts the franchise keyed by `root_external_id` and links every local
    /// work found in `graph.nodes` to it, atomically.
    ///
    /// Works absent from the graph keep whatever franchise they had.
    ///
    /// # Errors
    ///
    /// - Returns [`FranchiseError::RootMismatch`] if `root_external_id` is not
    ///   the minimum node id of `graph`
    /// - Returns [`FranchiseError::Database`] on storage failures; nothing is
    ///   committed in that case
    async fn sync(
        &self,
        graph: &RawGraph,
        root_external_id: ExternalId,
        name: &str,
    ) -> Result<SyncOutcome, FranchiseError>;

    /// Same as [`FranchiseService::sync`] with the key computed by
    /// [`canonical_key`]. `name` overrides the derived display name.
    ///
    /// # Errors
    ///
    /// Returns [`FranchiseError::Database`] on storage failures.
    async fn sync_graph(
        &self,
        graph: &RawGraph,
        name: Option<&str>,
    ) -> Result<SyncOutcome, FranchiseError>;

    /// Replaces the snapshot and sync time without touching membership.
    /// Returns `None` if the franchise does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`FranchiseError::Database`] on storage failures.
    async fn refresh_graph_only(
        &self,
        franchise_id: FranchiseId,
        graph: &RawGraph,
        name: Option<&str>,
    ) -> Result<Option<Franchise>, FranchiseError>;

    /// Replaces the stored outgoing edges of the local work `source` with the
    /// ones found in `graph`. Returns the number of edges stored, or `None`
    /// if `source` has not been imported.
    ///
    /// # Errors
    ///
    /// Returns [`FranchiseError::Database`] on storage failures.
    async fn store_relations(
        &self,
        graph: &RawGraph,
        source: ExternalId,
    ) -> Result<Option<u64>, FranchiseError>;

    /// Keyed franchises whose graph is missing or older than the staleness
    /// horizon, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`FranchiseError::Database`] on storage failures.
    async fn find_stale_graph_franchises(
        &self,
        limit: u64,
    ) -> Result<Vec<Franchise>, FranchiseError>;

    /// # Errors
    ///
    /// Returns [`FranchiseError::Database`] on storage failures.
    async fn get_franchise(&self, id: FranchiseId) -> Result<Option<Franchise>, FranchiseError>;

    /// # Errors
    ///
    /// Returns [`FranchiseError::Database`] on storage failures.
    async fn franchise_members(&self, id: FranchiseId) -> Result<Vec<Anime>, FranchiseError>;
}
