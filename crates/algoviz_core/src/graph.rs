//! Weighted adjacency graph fed to the shortest-path engine.
//!
//! Graphs are directed. An undirected request is normalized up front by
//! mirroring every edge, so every later stage (including the recorded trace)
//! only ever sees the symmetrized graph.
//!
//! Node order is the caller's insertion order; it drives iteration and every
//! reported node list, which keeps traces deterministic.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Adjacency as received from callers: `node -> {neighbor -> weight}`.
pub type RawAdjacency = IndexMap<String, IndexMap<String, serde_json::Value>>;

/// A directed graph with non-negative integer edge weights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    adjacency: IndexMap<String, IndexMap<String, u64>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from caller-supplied adjacency.
    ///
    /// Every edge target becomes a node even if it has no entry of its own.
    /// When `directed` is `false` the graph is mirrored with
    /// [`make_undirected`](Self::make_undirected).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the adjacency is empty or a weight is not a
    /// non-negative integer.
    pub fn from_adjacency(raw: RawAdjacency, directed: bool) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid("Graph cannot be empty"));
        }

        let mut graph = Graph::new();
        for (node, neighbors) in raw {
            graph.add_node(&node);
            for (neighbor, weight) in neighbors {
                let weight = parse_weight(&node, &neighbor, &weight)?;
                graph.add_edge(&node, &neighbor, weight);
            }
        }

        if !directed {
            graph.make_undirected();
        }

        log::debug!(
            "built {} graph: {} nodes, {} edges",
            if directed { "directed" } else { "undirected" },
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Adds `node` with no outgoing edges, unless it already exists.
    pub fn add_node(&mut self, node: &str) {
        if !self.adjacency.contains_key(node) {
            self.adjacency.insert(node.to_string(), IndexMap::new());
        }
    }

    /// Adds or overwrites the edge `from -> to`, creating missing endpoints.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: u64) {
        self.add_node(from);
        self.add_node(to);
        if let Some(neighbors) = self.adjacency.get_mut(from) {
            neighbors.insert(to.to_string(), weight);
        }
    }

    /// Mirrors every edge `(u, v, w)` into `(v, u, w)`.
    ///
    /// Mirror targets that are not yet nodes are created. When both directions
    /// already exist with different weights, the later edge in node order wins.
    pub fn make_undirected(&mut self) {
        let edges: Vec<(String, String, u64)> = self
            .edges()
            .map(|(u, v, w)| (u.to_string(), v.to_string(), w))
            .collect();
        for (u, v, w) in edges {
            self.add_edge(&v, &u, w);
        }
    }

    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Outgoing edges of `node` as `(neighbor, weight)`; empty for unknown nodes.
    pub fn neighbors<'a>(&'a self, node: &str) -> impl Iterator<Item = (&'a str, u64)> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|n| n.iter().map(|(k, w)| (k.as_str(), *w)))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.adjacency.iter().flat_map(|(u, n)| {
            n.iter().map(move |(v, w)| (u.as_str(), v.as_str(), *w))
        })
    }

    pub fn weight(&self, from: &str, to: &str) -> Option<u64> {
        self.adjacency.get(from).and_then(|n| n.get(to)).copied()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

fn parse_weight(from: &str, to: &str, value: &serde_json::Value) -> Result<u64> {
    let weight = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    });

    weight.ok_or_else(|| {
        Error::invalid(format!(
            "Invalid weight {} for edge {} -> {}. Weights must be non-negative integers.",
            value, from, to
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawAdjacency {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_adjacency_directed() {
        let graph = Graph::from_adjacency(raw(json!({"A": {"B": 1}, "B": {}})), true).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight("A", "B"), Some(1));
        assert_eq!(graph.weight("B", "A"), None);
    }

    #[test]
    fn test_from_adjacency_empty() {
        let err = Graph::from_adjacency(RawAdjacency::new(), true).unwrap_err();
        assert_eq!(err, Error::invalid("Graph cannot be empty"));
    }

    #[test]
    fn test_edge_targets_become_nodes() {
        let graph = Graph::from_adjacency(raw(json!({"A": {"Z": 2}})), true).unwrap();
        assert!(graph.contains("Z"));
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["A", "Z"]);
        assert_eq!(graph.neighbors("Z").count(), 0);
    }

    #[test]
    fn test_undirected_mirrors_edges() {
        let graph = Graph::from_adjacency(raw(json!({"A": {"B": 5}, "C": {"A": 2}})), false).unwrap();
        assert_eq!(graph.weight("B", "A"), Some(5));
        assert_eq!(graph.weight("A", "C"), Some(2));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_weight_validation() {
        assert!(Graph::from_adjacency(raw(json!({"A": {"B": 2.0}})), true).is_ok());
        for bad in [json!(-1), json!(1.5), json!("3"), json!(null)] {
            let err = Graph::from_adjacency(raw(json!({"A": {"B": bad}})), true).unwrap_err();
            assert!(err.to_string().contains("A -> B"), "{}", err);
        }
    }

    #[test]
    fn test_node_order_preserved() {
        let graph = Graph::from_adjacency(raw(json!({"C": {}, "A": {"B": 1}, "B": {}})), true).unwrap();
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["C", "A", "B"]);
    }
}
