//! Dijkstra's single-source shortest paths, observable step by step.
//!
//! There is exactly one relaxation loop, [`search`]. It reports every
//! observable event to an [`Observer`]; [`shortest_paths`] runs it with the
//! no-op observer `()` and [`trace`] with a recorder that snapshots the search
//! state at each event. Both entry points therefore make the same decisions
//! and always agree on the final distances.
//!
//! The frontier is a [`BinaryHeap`] of `(distance, node)` pairs with no
//! decrease-key: an improved node is simply pushed again, and entries whose
//! distance is worse than the node's current best are skipped when popped.
//!
//! # Examples
//!
//! ```
//! use algoviz_core::dijkstra::shortest_paths;
//! use algoviz_core::{Distance, Graph};
//!
//! let mut graph = Graph::new();
//! graph.add_edge("A", "B", 1);
//! graph.add_edge("B", "C", 2);
//! graph.add_edge("A", "C", 4);
//! graph.add_node("D");
//!
//! let distances = shortest_paths(&graph, "A").unwrap();
//! assert_eq!(distances["C"], Distance::Finite(3));
//! assert_eq!(distances["D"], Distance::Infinite);
//! ```

use crate::distance::{Distance, DistanceMap};
use crate::error::{Error, Result};
use crate::graph::Graph;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Mutable state of a running search, as seen by an [`Observer`].
#[derive(Debug, Clone)]
pub struct SearchState<'g> {
    graph: &'g Graph,
    distances: DistanceMap,
    visited: IndexSet<String>,
}

impl<'g> SearchState<'g> {
    fn new(graph: &'g Graph, start: &str) -> Self {
        let distances = graph
            .nodes()
            .map(|n| {
                let d = if n == start { Distance::ZERO } else { Distance::Infinite };
                (n.to_string(), d)
            })
            .collect();
        Self {
            graph,
            distances,
            visited: IndexSet::new(),
        }
    }

    /// Best known distance to `node`.
    pub fn distance(&self, node: &str) -> Distance {
        self.distances.get(node).copied().unwrap_or(Distance::Infinite)
    }

    pub fn distances(&self) -> &DistanceMap {
        &self.distances
    }

    /// Nodes whose distance is final, in the order they were selected.
    pub fn visited(&self) -> Vec<String> {
        self.visited.iter().cloned().collect()
    }

    /// Nodes not selected yet, in graph order.
    pub fn unvisited(&self) -> Vec<String> {
        self.graph
            .nodes()
            .filter(|n| !self.visited.contains(*n))
            .map(str::to_string)
            .collect()
    }
}

/// Receives the observable events of a search.
///
/// Every method defaults to doing nothing, so an observer only implements the
/// events it cares about.
pub trait Observer {
    /// Distances are initialized: `start` at 0, everything else unreachable.
    fn initialized(&mut self, _start: &str, _state: &SearchState<'_>) {}

    /// `node` was popped from the frontier (not stale) and is now final.
    fn selected(&mut self, _node: &str, _state: &SearchState<'_>) {}

    /// The edge `node -> neighbor` is being considered, whether or not it
    /// improves anything.
    ///
    /// Called for every outgoing edge of a selected node, including edges into
    /// nodes that are already final. On an undirected graph each edge is
    /// therefore examined once from each side; the second examination never
    /// leads to [`Observer::updated`].
    fn examined(
        &mut self,
        _node: &str,
        _neighbor: &str,
        _current: Distance,
        _potential: Distance,
        _state: &SearchState<'_>,
    ) {
    }

    /// A strictly shorter path to `neighbor` through `node` was found.
    fn updated(&mut self, _node: &str, _neighbor: &str, _new: Distance, _state: &SearchState<'_>) {}

    /// The frontier is exhausted.
    fn finished(&mut self, _state: &SearchState<'_>) {}
}

impl Observer for () {}

/// Runs Dijkstra from `start`, reporting each event to `observer`.
///
/// Returns the final distance of every node. Weights are assumed
/// non-negative (they are unsigned by construction).
///
/// # Errors
///
/// [`Error::UnknownStartNode`] if `start` is not a node of `graph`.
pub fn search<O: Observer>(graph: &Graph, start: &str, observer: &mut O) -> Result<DistanceMap> {
    if !graph.contains(start) {
        return Err(Error::UnknownStartNode(start.to_string()));
    }

    let mut state = SearchState::new(graph, start);
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse((Distance::ZERO, start.to_string())));
    observer.initialized(start, &state);

    let mut stale = 0usize;
    while let Some(Reverse((dist, node))) = frontier.pop() {
        if dist > state.distance(&node) || state.visited.contains(&node) {
            stale += 1;
            continue;
        }

        state.visited.insert(node.clone());
        observer.selected(&node, &state);

        for (neighbor, weight) in graph.neighbors(&node) {
            let current = state.distance(neighbor);
            let potential = dist.add_weight(weight);
            observer.examined(&node, neighbor, current, potential, &state);

            if potential < current {
                log::trace!("relax {} -> {}: {} -> {}", node, neighbor, current, potential);
                state.distances.insert(neighbor.to_string(), potential);
                frontier.push(Reverse((potential, neighbor.to_string())));
                observer.updated(&node, neighbor, potential, &state);
            }
        }
    }

    observer.finished(&state);
    log::debug!(
        "dijkstra from {}: {} of {} nodes reached, {} stale frontier entries skipped",
        start,
        state.visited.len(),
        graph.node_count(),
        stale
    );
    Ok(state.distances)
}

/// Final shortest distance from `start` to every node of `graph`.
///
/// Unreachable nodes are reported as [`Distance::Infinite`].
pub fn shortest_paths(graph: &Graph, start: &str) -> Result<DistanceMap> {
    search(graph, start, &mut ())
}

/// One frame of a Dijkstra trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DijkstraStep {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbor: Option<String>,
    /// The neighbor's distance before this examination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_distance: Option<Distance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_distance: Option<Distance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_distance: Option<Distance>,
    pub distances: DistanceMap,
    pub visited: Vec<String>,
    pub unvisited: Vec<String>,
}

impl DijkstraStep {
    fn snapshot(description: String, state: &SearchState<'_>) -> Self {
        Self {
            description,
            current_node: None,
            neighbor: None,
            current_distance: None,
            potential_distance: None,
            new_distance: None,
            distances: state.distances.clone(),
            visited: state.visited(),
            unvisited: state.unvisited(),
        }
    }
}

/// Full result of a traced run: `{distances, steps}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DijkstraTrace {
    pub distances: DistanceMap,
    pub steps: Vec<DijkstraStep>,
}

#[derive(Default)]
struct Recorder {
    steps: Vec<DijkstraStep>,
}

impl Observer for Recorder {
    fn initialized(&mut self, start: &str, state: &SearchState<'_>) {
        let mut step = DijkstraStep::snapshot(
            format!("Initialize: Set distance to {} as 0, others as infinity", start),
            state,
        );
        step.current_node = Some(start.to_string());
        self.steps.push(step);
    }

    fn selected(&mut self, node: &str, state: &SearchState<'_>) {
        let mut step =
            DijkstraStep::snapshot(format!("Select node {} with minimum distance", node), state);
        step.current_node = Some(node.to_string());
        self.steps.push(step);
    }

    fn examined(
        &mut self,
        node: &str,
        neighbor: &str,
        current: Distance,
        potential: Distance,
        state: &SearchState<'_>,
    ) {
        let mut step =
            DijkstraStep::snapshot(format!("Examine neighbor {} from {}", neighbor, node), state);
        step.current_node = Some(node.to_string());
        step.neighbor = Some(neighbor.to_string());
        step.current_distance = Some(current);
        step.potential_distance = Some(potential);
        self.steps.push(step);
    }

    fn updated(&mut self, node: &str, neighbor: &str, new: Distance, state: &SearchState<'_>) {
        let mut step =
            DijkstraStep::snapshot(format!("Update distance to {}: {}", neighbor, new), state);
        step.current_node = Some(node.to_string());
        step.neighbor = Some(neighbor.to_string());
        step.new_distance = Some(new);
        self.steps.push(step);
    }

    fn finished(&mut self, state: &SearchState<'_>) {
        let mut step = DijkstraStep::snapshot("Algorithm completed".to_string(), state);
        step.unvisited.clear();
        self.steps.push(step);
    }
}

/// Runs Dijkstra from `start` and records a step for every event.
///
/// The last step always carries the final distances and an empty
/// `unvisited` list.
///
/// # Errors
///
/// [`Error::UnknownStartNode`] if `start` is not a node of `graph`.
pub fn trace(graph: &Graph, start: &str) -> Result<DijkstraTrace> {
    let mut recorder = Recorder::default();
    let distances = search(graph, start, &mut recorder)?;
    Ok(DijkstraTrace {
        distances,
        steps: recorder.steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RawAdjacency;
    use serde_json::json;

    fn sample_graph() -> Graph {
        let raw: RawAdjacency = serde_json::from_value(json!({
            "A": {"B": 1, "C": 4},
            "B": {"C": 2, "D": 5},
            "C": {"D": 1},
            "D": {}
        }))
        .unwrap();
        Graph::from_adjacency(raw, true).unwrap()
    }

    #[test]
    fn test_shortest_paths_sample() {
        let distances = shortest_paths(&sample_graph(), "A").unwrap();
        let expected: Vec<(&str, Distance)> = vec![
            ("A", Distance::Finite(0)),
            ("B", Distance::Finite(1)),
            ("C", Distance::Finite(3)),
            ("D", Distance::Finite(4)),
        ];
        let actual: Vec<(&str, Distance)> = distances.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_unknown_start() {
        let err = shortest_paths(&sample_graph(), "Z").unwrap_err();
        assert_eq!(err, Error::UnknownStartNode("Z".into()));
        assert!(trace(&sample_graph(), "Z").is_err());
    }

    #[test]
    fn test_unreachable_stays_infinite() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", 3);
        graph.add_edge("C", "A", 1);
        let distances = shortest_paths(&graph, "A").unwrap();
        assert_eq!(distances["B"], Distance::Finite(3));
        assert_eq!(distances["C"], Distance::Infinite);
    }

    #[test]
    fn test_trace_shape() {
        let result = trace(&sample_graph(), "A").unwrap();
        let steps = &result.steps;

        assert_eq!(
            steps[0].description,
            "Initialize: Set distance to A as 0, others as infinity"
        );
        assert_eq!(steps[0].current_node.as_deref(), Some("A"));
        assert!(steps[0].visited.is_empty());
        assert_eq!(steps[0].unvisited, vec!["A", "B", "C", "D"]);

        assert_eq!(steps[1].description, "Select node A with minimum distance");
        assert_eq!(steps[1].visited, vec!["A"]);

        assert_eq!(steps[2].description, "Examine neighbor B from A");
        assert_eq!(steps[2].current_distance, Some(Distance::Infinite));
        assert_eq!(steps[2].potential_distance, Some(Distance::Finite(1)));
        assert_eq!(steps[3].description, "Update distance to B: 1");
        assert_eq!(steps[3].new_distance, Some(Distance::Finite(1)));
        assert_eq!(steps[3].distances["B"], Distance::Finite(1));

        let last = steps.last().unwrap();
        assert_eq!(last.description, "Algorithm completed");
        assert!(last.unvisited.is_empty());
        assert_eq!(last.visited, vec!["A", "B", "C", "D"]);
        assert_eq!(last.distances, result.distances);
    }

    #[test]
    fn test_edges_into_final_nodes_are_examined() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", 5);
        graph.make_undirected();

        let steps = trace(&graph, "A").unwrap().steps;
        let descriptions: Vec<_> = steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "Initialize: Set distance to A as 0, others as infinity",
                "Select node A with minimum distance",
                "Examine neighbor B from A",
                "Update distance to B: 5",
                "Select node B with minimum distance",
                "Examine neighbor A from B",
                "Algorithm completed",
            ]
        );
        assert_eq!(steps[5].current_distance, Some(Distance::ZERO));
        assert_eq!(steps[5].potential_distance, Some(Distance::Finite(10)));
    }

    #[test]
    fn test_examine_without_update() {
        // C: 4 via A, then 3 via B. D: 6 via B, then 4 via C.
        let result = trace(&sample_graph(), "A").unwrap();
        let examined: Vec<_> = result
            .steps
            .iter()
            .filter(|s| s.description.starts_with("Examine"))
            .collect();
        let updates = result
            .steps
            .iter()
            .filter(|s| s.new_distance.is_some())
            .count();

        // one examination per edge of every selected node
        assert_eq!(examined.len(), 5);
        assert_eq!(updates, 5);

        let c_from_b = examined
            .iter()
            .find(|s| s.neighbor.as_deref() == Some("C") && s.current_node.as_deref() == Some("B"))
            .unwrap();
        assert_eq!(c_from_b.current_distance, Some(Distance::Finite(4)));
        assert_eq!(c_from_b.potential_distance, Some(Distance::Finite(3)));
    }

    #[test]
    fn test_trace_agrees_with_shortest_paths() {
        let graph = sample_graph();
        for start in ["A", "B", "C", "D"] {
            assert_eq!(
                trace(&graph, start).unwrap().distances,
                shortest_paths(&graph, start).unwrap()
            );
        }
    }

    #[test]
    fn test_infinity_on_the_wire() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", 2);
        graph.add_node("C");
        let result = trace(&graph, "A").unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["distances"], json!({"A": 0, "B": 2, "C": "Infinity"}));
        assert_eq!(json["steps"][0]["distances"]["B"], "Infinity");
        assert!(json["steps"][0].get("neighbor").is_none());
        assert_eq!(json["steps"][2]["currentDistance"], "Infinity");
        assert_eq!(json["steps"][2]["potentialDistance"], 2);
    }

    #[test]
    fn test_self_loop_and_zero_weight() {
        let mut graph = Graph::new();
        graph.add_edge("A", "A", 0);
        graph.add_edge("A", "B", 0);
        let result = trace(&graph, "A").unwrap();
        assert_eq!(result.distances["A"], Distance::ZERO);
        assert_eq!(result.distances["B"], Distance::ZERO);
    }

    #[test]
    fn test_custom_observer_counts_events() {
        #[derive(Default)]
        struct Counter {
            selected: usize,
            examined: usize,
        }
        impl Observer for Counter {
            fn selected(&mut self, _node: &str, _state: &SearchState<'_>) {
                self.selected += 1;
            }
            fn examined(
                &mut self,
                _node: &str,
                _neighbor: &str,
                _current: Distance,
                _potential: Distance,
                _state: &SearchState<'_>,
            ) {
                self.examined += 1;
            }
        }

        let mut counter = Counter::default();
        search(&sample_graph(), "A", &mut counter).unwrap();
        assert_eq!(counter.selected, 4);
        assert_eq!(counter.examined, 5);
    }
}
