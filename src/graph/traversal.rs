//! Breadth-first and depth-first exploration.
//!
//! Both traversals are lazy iterators that borrow the graph. They emit each
//! reachable node at most once and stop when the frontier is exhausted; to
//! run again, build a new iterator.

use std::collections::{BTreeSet, VecDeque};

use super::Graph;

/// Breadth-first order from a start node.
///
/// Nodes are emitted in non-decreasing hop distance from the start. An
/// unknown start node yields nothing.
pub struct Bfs<'g, N, E> {
    graph: &'g Graph<N, E>,
    queue: VecDeque<N>,
    visited: BTreeSet<N>,
}

impl<'g, N, E> Bfs<'g, N, E>
where
    N: Ord + Clone,
    E: Clone,
{
    pub fn new(graph: &'g Graph<N, E>, start: N) -> Self {
        let mut queue = VecDeque::new();
        let mut visited = BTreeSet::new();
        if graph.has_node(&start) {
            visited.insert(start.clone());
            queue.push_back(start);
        }
        Self {
            graph,
            queue,
            visited,
        }
    }
}

impl<'g, N, E> Iterator for Bfs<'g, N, E>
where
    N: Ord + Clone,
    E: Clone,
{
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let current = self.queue.pop_front()?;
        for (neighbor, _) in self.graph.outgoing(&current) {
            // mark on enqueue so a node is queued once
            if self.visited.insert(neighbor.clone()) {
                self.queue.push_back(neighbor.clone());
            }
        }
        Some(current)
    }
}

/// Iterative depth-first order from a start node.
///
/// Neighbors are pushed in adjacency order and popped in reverse, so the
/// last-listed neighbor is explored first. This is not the pre-order of a
/// recursive DFS.
pub struct Dfs<'g, N, E> {
    graph: &'g Graph<N, E>,
    stack: Vec<N>,
    visited: BTreeSet<N>,
}

impl<'g, N, E> Dfs<'g, N, E>
where
    N: Ord + Clone,
    E: Clone,
{
    pub fn new(graph: &'g Graph<N, E>, start: N) -> Self {
        let stack = if graph.has_node(&start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self {
            graph,
            stack,
            visited: BTreeSet::new(),
        }
    }
}

impl<'g, N, E> Iterator for Dfs<'g, N, E>
where
    N: Ord + Clone,
    E: Clone,
{
    type Item = N;

    fn next(&mut self) -> Option<N> {
        while let Some(current) = self.stack.pop() {
            if !self.visited.insert(current.clone()) {
                continue;
            }
            for (neighbor, _) in self.graph.outgoing(&current) {
                if !self.visited.contains(neighbor) {
                    self.stack.push(neighbor.clone());
                }
            }
            return Some(current);
        }
        None
    }
}

impl<N, E> Graph<N, E>
where
    N: Ord + Clone,
    E: Clone,
{
    pub fn bfs(&self, start: N) -> Bfs<'_, N, E> {
        Bfs::new(self, start)
    }

    pub fn dfs(&self, start: N) -> Dfs<'_, N, E> {
        Dfs::new(self, start)
    }
}
