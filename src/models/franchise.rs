use crate::domain::{ExternalId, FranchiseId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Franchise {
    pub id: FranchiseId,
    pub name: String,
    pub root_external_id: Option<ExternalId>,
    /// Opaque JSON of the last fetched graph.
    pub graph_snapshot: Option<String>,
    pub graph_synced_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields overwritten on every sync of a cluster.
#[derive(Debug, Clone)]
pub struct FranchiseGraphUpdate {
    pub name: Option<String>,
    pub graph_snapshot: String,
    pub graph_synced_at: String,
}
