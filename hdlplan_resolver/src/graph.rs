//! Dependency graph over plan nodes.
//!
//! Nodes are plain indices in declaration order; an edge `from -> to` means
//! `from` depends on `to`, so `to` must come first in any order. Sorting and
//! cycle search are pure functions of the adjacency lists.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Adjacency lists from each node to the nodes it depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    successors: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// A graph with `nodes` nodes and no edges.
    pub fn with_nodes(nodes: usize) -> Self {
        Self {
            successors: vec![Vec::new(); nodes],
        }
    }

    /// Records that `from` depends on `to`. Repeated edges are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `from` is not a node of the graph.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        debug_assert!(to < self.successors.len());
        let succ = &mut self.successors[from];
        if !succ.contains(&to) {
            succ.push(to);
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    /// True for a graph without nodes.
    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// The nodes `node` depends on, in insertion order.
    pub fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    /// True when `from` depends directly on `to`.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.successors
            .get(from)
            .is_some_and(|succ| succ.contains(&to))
    }

    /// Orders the nodes so that every node comes after everything it depends
    /// on.
    ///
    /// Among nodes that are ready at the same time the lowest index goes
    /// first, so the result is the same on every run and keeps declaration
    /// order wherever dependencies allow.
    ///
    /// # Errors
    ///
    /// Returns a cycle as a closed walk `[a, b, ..., a]` when no order exists.
    pub fn topological_order(&self) -> Result<Vec<usize>, Vec<usize>> {
        let n = self.successors.len();
        let mut pending: Vec<usize> = self.successors.iter().map(Vec::len).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (from, succ) in self.successors.iter().enumerate() {
            for &to in succ {
                dependents[to].push(from);
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = pending
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(node, _)| Reverse(node))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for &dependent in &dependents[node] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            let unsorted: Vec<bool> = pending.iter().map(|&count| count > 0).collect();
            Err(self.find_cycle(&unsorted))
        }
    }

    /// Walks from the lowest unsorted node along unsorted successors until a
    /// node repeats.
    ///
    /// Every unsorted node still waits on at least one unsorted successor,
    /// so the walk cannot dead-end.
    fn find_cycle(&self, unsorted: &[bool]) -> Vec<usize> {
        let mut walk: Vec<usize> = Vec::new();
        let mut position: HashMap<usize, usize> = HashMap::new();
        let mut current = unsorted
            .iter()
            .position(|&u| u)
            .expect("cycle search needs an unsorted node");

        loop {
            if let Some(&start) = position.get(&current) {
                let mut cycle = walk.split_off(start);
                cycle.push(current);
                return cycle;
            }
            position.insert(current, walk.len());
            walk.push(current);
            current = self.successors[current]
                .iter()
                .copied()
                .find(|&s| unsorted[s])
                .expect("unsorted node has an unsorted dependency");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn test_topological_order_declaration_tie_break() {
        // 0 depends on 2, 1 is independent
        let mut graph = DependencyGraph::with_nodes(3);
        graph.add_edge(0, 2);

        assert_eq!(graph.topological_order().unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_topological_order_chain() {
        let mut graph = DependencyGraph::with_nodes(3);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);

        assert_eq!(graph.topological_order().unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_cycle_two_nodes() {
        let mut graph = DependencyGraph::with_nodes(2);
        graph.add_edge(0, 1);
        graph.add_edge(1, 0);

        assert_eq!(graph.topological_order().unwrap_err(), vec![0, 1, 0]);
    }

    #[test]
    fn test_self_loop() {
        let mut graph = DependencyGraph::with_nodes(2);
        graph.add_edge(1, 1);

        assert_eq!(graph.topological_order().unwrap_err(), vec![1, 1]);
    }

    #[test]
    fn test_cycle_behind_dependent() {
        // 0 depends on the 1 <-> 2 cycle but is not part of it
        let mut graph = DependencyGraph::with_nodes(3);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 1);

        assert_eq!(graph.topological_order().unwrap_err(), vec![1, 2, 1]);
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let mut graph = DependencyGraph::with_nodes(2);
        graph.add_edge(0, 1);
        graph.add_edge(0, 1);

        assert_eq!(graph.successors(0), &[1]);
        assert_eq!(graph.topological_order().unwrap(), vec![1, 0]);
    }

    /// Builds a graph from raw edge pairs, folding node ids into range.
    fn graph_from(nodes: u8, edges: &[(u8, u8)]) -> DependencyGraph {
        let n = usize::from(nodes % 12) + 1;
        let mut graph = DependencyGraph::with_nodes(n);
        for &(a, b) in edges {
            graph.add_edge(usize::from(a) % n, usize::from(b) % n);
        }
        graph
    }

    quickcheck! {
        fn prop_order_respects_edges(nodes: u8, edges: Vec<(u8, u8)>) -> TestResult {
            // Only keep edges to lower indices so the graph is acyclic
            let n = usize::from(nodes % 12) + 1;
            let forward: Vec<(u8, u8)> = edges
                .into_iter()
                .filter(|&(a, b)| usize::from(a) % n > usize::from(b) % n)
                .collect();
            let graph = graph_from(nodes, &forward);

            let Ok(order) = graph.topological_order() else {
                return TestResult::failed();
            };
            let mut pos = vec![0; graph.len()];
            for (i, &node) in order.iter().enumerate() {
                pos[node] = i;
            }
            let valid = (0..graph.len())
                .all(|from| graph.successors(from).iter().all(|&to| pos[to] < pos[from]));
            TestResult::from_bool(valid && order.len() == graph.len())
        }

        fn prop_reported_cycle_is_closed_walk(nodes: u8, edges: Vec<(u8, u8)>) -> TestResult {
            let graph = graph_from(nodes, &edges);
            match graph.topological_order() {
                Ok(_) => TestResult::discard(),
                Err(cycle) => {
                    let closed = cycle.len() >= 2 && cycle.first() == cycle.last();
                    let edges_exist = cycle.windows(2).all(|w| graph.has_edge(w[0], w[1]));
                    TestResult::from_bool(closed && edges_exist)
                },
            }
        }

        fn prop_order_is_stable(nodes: u8, edges: Vec<(u8, u8)>) -> bool {
            let graph = graph_from(nodes, &edges);
            graph.topological_order() == graph.topological_order()
        }
    }
}
