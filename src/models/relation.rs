use crate::domain::{AnimeId, ExternalId, RelationKind};
use serde::{Deserialize, Serialize};

/// Stored outgoing edge of a work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub id: i32,
    pub source_id: AnimeId,
    pub target_id: Option<AnimeId>,
    pub target_external_id: ExternalId,
    pub target_name: String,
    pub target_poster_url: Option<String>,
    pub kind: RelationKind,
}

/// Edge to insert for a source work. Target fields are denormalized so the
/// edge can be displayed before the target is imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelation {
    pub target_id: Option<AnimeId>,
    pub target_external_id: ExternalId,
    pub target_name: String,
    pub target_poster_url: Option<String>,
    pub kind: RelationKind,
}
