use std::collections::BTreeMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::Directed;
use serde::{Deserialize, Serialize};

/// Payload of a network node: the stable external id used as the attribute
/// row key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkNode {
    id: String,
}

impl NetworkNode {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Payload of a network edge: external id plus endpoint ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEdge {
    id: String,
    source: String,
    target: String,
}

impl NetworkEdge {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Wrapper around [`petgraph::stable_graph::StableGraph`] holding the
/// topology the style engine resolves against.
///
/// Elements carry stable external string ids (the keys of the attribute
/// table); enumeration is id-ordered so downstream resolution is
/// deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Network {
    g: StableGraph<NetworkNode, NetworkEdge, Directed>,

    node_ids: BTreeMap<String, NodeIndex>,
    edge_ids: BTreeMap<String, EdgeIndex>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with the given external id. Adding an id that already
    /// exists returns the existing index.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(idx) = self.node_ids.get(&id) {
            return *idx;
        }
        let idx = self.g.add_node(NetworkNode { id: id.clone() });
        self.node_ids.insert(id, idx);
        idx
    }

    /// Adds an edge between two existing nodes. Returns `None` when either
    /// endpoint id is unknown; an existing edge id returns its index.
    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
    ) -> Option<EdgeIndex> {
        let id = id.into();
        if let Some(idx) = self.edge_ids.get(&id) {
            return Some(*idx);
        }
        let source_idx = *self.node_ids.get(source)?;
        let target_idx = *self.node_ids.get(target)?;
        let idx = self.g.add_edge(
            source_idx,
            target_idx,
            NetworkEdge {
                id: id.clone(),
                source: source.to_string(),
                target: target.to_string(),
            },
        );
        self.edge_ids.insert(id, idx);
        Some(idx)
    }

    /// Removes a node and its incident edges. Returns whether it existed.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_ids.remove(id) else {
            return false;
        };
        // Incident edges disappear with the node; drop their id entries too.
        let g = &self.g;
        self.edge_ids
            .retain(|_, eidx| g.edge_endpoints(*eidx).is_none_or(|(s, t)| s != idx && t != idx));
        self.g.remove_node(idx);
        true
    }

    /// Removes an edge. Returns whether it existed.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        let Some(idx) = self.edge_ids.remove(id) else {
            return false;
        };
        self.g.remove_edge(idx);
        true
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_ids.contains_key(id)
    }

    /// Node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.node_ids.keys().map(String::as_str)
    }

    /// Edge ids in ascending order.
    pub fn edge_ids(&self) -> impl Iterator<Item = &str> {
        self.edge_ids.keys().map(String::as_str)
    }

    pub fn node(&self, id: &str) -> Option<&NetworkNode> {
        self.node_ids.get(id).and_then(|idx| self.g.node_weight(*idx))
    }

    pub fn edge(&self, id: &str) -> Option<&NetworkEdge> {
        self.edge_ids.get(id).and_then(|idx| self.g.edge_weight(*idx))
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_ids.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.g.edge_count()
    }

    pub fn g(&self) -> &StableGraph<NetworkNode, NetworkEdge, Directed> {
        &self.g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_require_existing_endpoints() {
        let mut n = Network::new();
        n.add_node("a");
        assert!(n.add_edge("e1", "a", "missing").is_none());

        n.add_node("b");
        assert!(n.add_edge("e1", "a", "b").is_some());
        assert_eq!(n.edge("e1").unwrap().target(), "b");
    }

    #[test]
    fn removing_a_node_drops_incident_edges() {
        let mut n = Network::new();
        n.add_node("a");
        n.add_node("b");
        n.add_node("c");
        n.add_edge("ab", "a", "b").unwrap();
        n.add_edge("bc", "b", "c").unwrap();

        assert!(n.remove_node("b"));
        assert_eq!(n.node_count(), 2);
        assert_eq!(n.edge_count(), 0);
        assert!(!n.contains_edge("ab"));
        assert!(!n.contains_edge("bc"));
    }

    #[test]
    fn enumeration_is_id_ordered() {
        let mut n = Network::new();
        n.add_node("z");
        n.add_node("a");
        n.add_node("m");
        let ids: Vec<&str> = n.node_ids().collect();
        assert_eq!(ids, vec!["a", "m", "z"]);
    }

    #[test]
    fn duplicate_ids_are_idempotent() {
        let mut n = Network::new();
        let first = n.add_node("a");
        let second = n.add_node("a");
        assert_eq!(first, second);
        assert_eq!(n.node_count(), 1);
    }
}
