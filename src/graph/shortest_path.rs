//! Single-source shortest paths (Dijkstra).
//!
//! The engine is generic over the edge payload: callers supply a weight
//! extractor `Fn(&E) -> f64`. Weights must be non-negative; an infinite
//! weight marks an edge that can never be relaxed, which makes it
//! impassable. Every run builds fresh state and returns it as an immutable
//! [`ShortestPaths`] value.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use serde::{Deserialize, Serialize};

use super::Graph;

/// Edge payloads that carry their own scalar weight.
pub trait EdgeWeight {
    fn weight(&self) -> f64;
}

impl EdgeWeight for f64 {
    fn weight(&self) -> f64 {
        *self
    }
}

impl EdgeWeight for f32 {
    fn weight(&self) -> f64 {
        f64::from(*self)
    }
}

impl EdgeWeight for u32 {
    fn weight(&self) -> f64 {
        f64::from(*self)
    }
}

/// A single non-negative edge weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub weight: f64,
}

impl WeightedEdge {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl EdgeWeight for WeightedEdge {
    fn weight(&self) -> f64 {
        self.weight
    }
}

impl std::fmt::Display for WeightedEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "w={}", self.weight)
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest cost first.
///
/// Only the cost takes part in the ordering, so node ids need not be `Ord`
/// for heap purposes and ties pop in an unspecified order.
struct QueueEntry<N> {
    cost: f64,
    node: N,
}

impl<N> PartialEq for QueueEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}

impl<N> Eq for QueueEntry<N> {}

impl<N> PartialOrd for QueueEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for QueueEntry<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

/// Result of one Dijkstra run from `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths<N> {
    start: N,
    distances: BTreeMap<N, f64>,
    predecessors: BTreeMap<N, N>,
}

impl<N> ShortestPaths<N>
where
    N: Ord + Clone,
{
    /// Run Dijkstra over `graph` using the payload's own [`EdgeWeight`].
    pub fn compute<E>(graph: &Graph<N, E>, start: &N) -> Self
    where
        E: Clone + EdgeWeight,
    {
        Self::compute_with(graph, start, |edge: &E| edge.weight())
    }

    /// Run Dijkstra over `graph`, weighting each edge with `weight`.
    ///
    /// If `start` is not in the graph the result marks every node as
    /// unreachable.
    pub fn compute_with<E, F>(graph: &Graph<N, E>, start: &N, weight: F) -> Self
    where
        E: Clone,
        F: Fn(&E) -> f64,
    {
        let mut distances: BTreeMap<N, f64> = graph
            .nodes()
            .into_iter()
            .map(|node| (node, f64::INFINITY))
            .collect();
        let mut predecessors = BTreeMap::new();

        if !distances.contains_key(start) {
            return Self {
                start: start.clone(),
                distances,
                predecessors,
            };
        }

        distances.insert(start.clone(), 0.0);
        let mut queue = BinaryHeap::new();
        queue.push(QueueEntry {
            cost: 0.0,
            node: start.clone(),
        });

        while let Some(QueueEntry { cost, node }) = queue.pop() {
            let best = distances.get(&node).copied().unwrap_or(f64::INFINITY);
            if cost > best {
                // stale entry, a shorter path was found after this push
                continue;
            }

            for (neighbor, edge) in graph.outgoing(&node) {
                let alt = cost + weight(edge);
                let current = distances.get(neighbor).copied().unwrap_or(f64::INFINITY);
                if alt < current {
                    distances.insert(neighbor.clone(), alt);
                    predecessors.insert(neighbor.clone(), node.clone());
                    queue.push(QueueEntry {
                        cost: alt,
                        node: neighbor.clone(),
                    });
                }
            }
        }

        Self {
            start: start.clone(),
            distances,
            predecessors,
        }
    }

    pub fn start(&self) -> &N {
        &self.start
    }

    /// Best known distance to `target`, `f64::INFINITY` when unreachable.
    pub fn distance_to(&self, target: &N) -> f64 {
        self.distances.get(target).copied().unwrap_or(f64::INFINITY)
    }

    pub fn is_reachable(&self, target: &N) -> bool {
        self.distance_to(target).is_finite()
    }

    /// Predecessor of `node` on its best path, if one was recorded.
    pub fn predecessor(&self, node: &N) -> Option<&N> {
        self.predecessors.get(node)
    }

    /// All finite distances, keyed by node.
    pub fn reachable(&self) -> impl Iterator<Item = (&N, f64)> {
        self.distances
            .iter()
            .filter(|(_, distance)| distance.is_finite())
            .map(|(node, distance)| (node, *distance))
    }

    /// Reconstruct the path `start ..= target`.
    ///
    /// Empty when `target` is unreachable. `[start]` when `target == start`.
    pub fn path_to(&self, target: &N) -> Vec<N> {
        if !self.is_reachable(target) {
            return Vec::new();
        }

        let mut path = vec![target.clone()];
        let mut current = target;
        while current != &self.start {
            match self.predecessors.get(current) {
                Some(previous) => {
                    // a chain longer than the node count means a cycle
                    if path.len() > self.distances.len() {
                        return Vec::new();
                    }
                    path.push(previous.clone());
                    current = previous;
                }
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }
}
