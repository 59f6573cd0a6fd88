//! Generic adjacency-list graph.
//!
//! `Graph<N, E>` maps every node to an ordered list of `(neighbor, edge)`
//! pairs. The graph is directed by default; an undirected graph mirrors each
//! inserted edge onto the target's list. Parallel edges are kept as-is.
//!
//! Queries never fail: asking about a node the graph has never seen returns
//! an empty result. Every query that hands back adjacency data returns an
//! owned snapshot, so callers cannot observe later mutations through it.

pub mod shortest_path;
pub mod traversal;

use std::collections::BTreeMap;
use std::fmt;

pub use shortest_path::{EdgeWeight, ShortestPaths, WeightedEdge};
pub use traversal::{Bfs, Dfs};

/// Adjacency-list graph over node ids `N` carrying edge payloads `E`.
///
/// Nodes are kept in a `BTreeMap` so iteration order (and therefore the
/// topology dump, traversal output and tie-breaking) is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph<N, E> {
    adjacency: BTreeMap<N, Vec<(N, E)>>,
    directed: bool,
}

impl<N, E> Default for Graph<N, E>
where
    N: Ord + Clone,
    E: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E>
where
    N: Ord + Clone,
    E: Clone,
{
    /// Create an empty directed graph.
    pub fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
            directed: true,
        }
    }

    /// Create an empty undirected graph. Every edge added is mirrored.
    pub fn undirected() -> Self {
        Self {
            adjacency: BTreeMap::new(),
            directed: false,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Ensure `node` exists. Calling this for an existing node is a no-op.
    pub fn add_node(&mut self, node: N) {
        self.adjacency.entry(node).or_default();
    }

    /// Append an edge `from -> to`, creating either endpoint if needed.
    ///
    /// In undirected mode the same payload is also appended to `to`'s list.
    pub fn add_edge(&mut self, from: N, to: N, edge: E) {
        if !self.directed {
            self.adjacency
                .entry(to.clone())
                .or_default()
                .push((from.clone(), edge.clone()));
        } else {
            self.adjacency.entry(to.clone()).or_default();
        }
        self.adjacency.entry(from).or_default().push((to, edge));
    }

    /// Remove every `from -> to` edge. Mirrored in undirected mode.
    pub fn remove_edge(&mut self, from: &N, to: &N) {
        if let Some(list) = self.adjacency.get_mut(from) {
            list.retain(|(neighbor, _)| neighbor != to);
        }
        if !self.directed {
            if let Some(list) = self.adjacency.get_mut(to) {
                list.retain(|(neighbor, _)| neighbor != from);
            }
        }
    }

    /// Drop `node` along with every edge that points at it.
    pub fn remove_node(&mut self, node: &N) {
        if self.adjacency.remove(node).is_none() {
            return;
        }
        for list in self.adjacency.values_mut() {
            list.retain(|(neighbor, _)| neighbor != node);
        }
    }

    pub fn has_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of adjacency entries. An undirected edge counts twice.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
    }

    /// Snapshot of the neighbor ids of `node`, in insertion order.
    pub fn neighbors(&self, node: &N) -> Vec<N> {
        self.adjacency
            .get(node)
            .map(|list| list.iter().map(|(neighbor, _)| neighbor.clone()).collect())
            .unwrap_or_default()
    }

    /// Snapshot of the `(neighbor, edge)` pairs leaving `node`.
    pub fn edges(&self, node: &N) -> Vec<(N, E)> {
        self.adjacency.get(node).cloned().unwrap_or_default()
    }

    /// First edge payload for `from -> to`, if any.
    pub fn edge_between(&self, from: &N, to: &N) -> Option<&E> {
        self.adjacency
            .get(from)?
            .iter()
            .find(|(neighbor, _)| neighbor == to)
            .map(|(_, edge)| edge)
    }

    /// Snapshot of all node ids in ascending order.
    pub fn nodes(&self) -> Vec<N> {
        self.adjacency.keys().cloned().collect()
    }

    /// Borrowing view of the outgoing edges of `node`.
    ///
    /// Used by the traversal and shortest-path code to avoid a copy per
    /// visited node; the borrow keeps the graph immutable while in use.
    pub(crate) fn outgoing(&self, node: &N) -> &[(N, E)] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over every `(from, to, edge)` triple.
    pub fn iter_edges(&self) -> impl Iterator<Item = (&N, &N, &E)> {
        self.adjacency
            .iter()
            .flat_map(|(from, list)| list.iter().map(move |(to, edge)| (from, to, edge)))
    }
}

impl<N, E> fmt::Display for Graph<N, E>
where
    N: Ord + Clone + fmt::Display,
    E: Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (node, list) in &self.adjacency {
            write!(f, "{} ->", node)?;
            for (neighbor, edge) in list {
                write!(f, " ({}, {})", neighbor, edge)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph<u32, u32> {
        let mut graph = Graph::new();
        graph.add_edge(1, 2, 1);
        graph.add_edge(2, 3, 1);
        graph.add_edge(1, 3, 5);
        graph
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph: Graph<&str, f64> = Graph::new();
        graph.add_node("A");
        graph.add_edge("A", "B", 1.0);
        graph.add_node("A");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.neighbors(&"A"), vec!["B"]);
    }

    #[test]
    fn test_add_edge_creates_endpoints() {
        let graph = sample();
        assert!(graph.has_node(&3));
        assert!(graph.neighbors(&3).is_empty());
        assert_eq!(graph.neighbors(&1), vec![2, 3]);
    }

    #[test]
    fn test_undirected_mirrors_edges() {
        let mut graph: Graph<&str, u32> = Graph::undirected();
        graph.add_edge("A", "B", 7);

        assert_eq!(graph.edges(&"A"), vec![("B", 7)]);
        assert_eq!(graph.edges(&"B"), vec![("A", 7)]);

        graph.remove_edge(&"B", &"A");
        assert!(graph.neighbors(&"A").is_empty());
        assert!(graph.neighbors(&"B").is_empty());
    }

    #[test]
    fn test_parallel_edges_are_kept_and_removed_together() {
        let mut graph: Graph<&str, u32> = Graph::new();
        graph.add_edge("A", "B", 1);
        graph.add_edge("A", "B", 2);
        graph.add_edge("A", "C", 3);

        assert_eq!(graph.neighbors(&"A"), vec!["B", "B", "C"]);
        assert_eq!(graph.edge_between(&"A", &"B"), Some(&1));

        graph.remove_edge(&"A", &"B");
        assert_eq!(graph.neighbors(&"A"), vec!["C"]);
    }

    #[test]
    fn test_remove_node_scrubs_incoming_edges() {
        let mut graph = sample();
        graph.add_edge(3, 2, 4);
        graph.remove_node(&2);

        assert!(!graph.has_node(&2));
        for node in graph.nodes() {
            assert!(!graph.neighbors(&node).contains(&2));
        }
        assert_eq!(graph.neighbors(&1), vec![3]);
    }

    #[test]
    fn test_unknown_node_queries_are_empty() {
        let mut graph = sample();
        assert!(graph.neighbors(&42).is_empty());
        assert!(graph.edges(&42).is_empty());
        assert!(graph.edge_between(&42, &1).is_none());

        graph.remove_node(&42);
        graph.remove_edge(&42, &1);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let mut graph = sample();
        let before = graph.edges(&1);
        graph.add_edge(1, 4, 9);

        assert_eq!(before.len(), 2);
        assert_eq!(graph.edges(&1).len(), 3);
    }

    #[test]
    fn test_clear_and_counts() {
        let mut graph = sample();
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.iter_edges().count(), 3);

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_display_lists_adjacency() {
        let graph = sample();
        let text = graph.to_string();
        assert!(text.contains("1 -> (2, 1) (3, 5)"));
        assert!(text.contains("3 ->"));
    }
}
