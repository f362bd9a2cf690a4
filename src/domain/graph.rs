use super::{ExternalId, RelationKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Relation graph as returned by the metadata provider for one pivot work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGraph {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub external_id: ExternalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    pub from_external_id: ExternalId,
    pub to_external_id: ExternalId,
    /// Provider spelling of the relation, kept raw so unknown kinds survive
    /// into the snapshot.
    #[serde(default)]
    pub kind: String,
}

impl RawEdge {
    #[must_use]
    pub fn relation_kind(&self) -> RelationKind {
        RelationKind::parse_lenient(&self.kind)
    }
}

impl RawGraph {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Minimum external id across the nodes: the franchise key.
    #[must_use]
    pub fn root_external_id(&self) -> Option<ExternalId> {
        self.nodes.iter().map(|n| n.external_id).min()
    }

    /// Distinct node ids in first-seen order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<ExternalId> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .map(|n| n.external_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    #[must_use]
    pub fn node(&self, id: ExternalId) -> Option<&RawNode> {
        self.nodes.iter().find(|n| n.external_id == id)
    }

    pub fn outgoing(&self, source: ExternalId) -> impl Iterator<Item = &RawEdge> {
        self.edges
            .iter()
            .filter(move |e| e.from_external_id == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_provider_json() {
        let json = r#"{
            "nodes": [
                {"externalId": 20, "title": "Second Season", "year": 2021},
                {"externalId": 7}
            ],
            "edges": [
                {"fromExternalId": 7, "toExternalId": 20, "kind": "SEQUEL"},
                {"fromExternalId": 20, "toExternalId": 7}
            ]
        }"#;

        let graph: RawGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.root_external_id(), Some(ExternalId::new(7)));
        assert_eq!(graph.edges[0].relation_kind(), RelationKind::Sequel);
        assert_eq!(graph.edges[1].relation_kind(), RelationKind::Other);
        assert_eq!(graph.node(ExternalId::new(20)).unwrap().year, Some(2021));
    }

    #[test]
    fn empty_graph_has_no_root() {
        let graph: RawGraph = serde_json::from_str("{}").unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.root_external_id(), None);
    }

    #[test]
    fn node_ids_are_distinct() {
        let node = |id| RawNode {
            external_id: ExternalId::new(id),
            title: None,
            poster_url: None,
            year: None,
        };
        let graph = RawGraph {
            nodes: vec![node(3), node(1), node(3)],
            edges: Vec::new(),
        };
        assert_eq!(graph.node_ids(), vec![ExternalId::new(3), ExternalId::new(1)]);
    }
}
