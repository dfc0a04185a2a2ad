//! Whole-graph ordering algorithms.
//!
//! These are batch algorithms: each call walks the entire graph. The cycle
//! check here is independent of the reachability test used when edges are
//! inserted, so it can be used to validate a graph built by other means.

use crate::{Dag, Error, Result};
use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::{Control, DfsEvent, depth_first_search};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use tracing::trace;

/// A topologically sorted sequence of nodes.
///
/// Every node appears after all nodes that have an edge into it.
pub type TopologicalOrder<N> = Vec<N>;

/// Layers of nodes that can be processed in parallel.
///
/// Each inner vector contains nodes with no edges between them. The outer
/// vector is ordered by depth: every node in generation N depends only on
/// nodes in generations before N.
pub type Generations<N> = Vec<Vec<N>>;

impl<N: Eq + Hash + Clone> Dag<N> {
    /// Check that the graph contains no directed cycle.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.find_back_edge().is_none()
    }

    /// Get a topological ordering of all nodes using Kahn's algorithm.
    ///
    /// Nodes with no incoming edges are taken in [`Dag::nodes`] order, and
    /// the order is deterministic for a given sequence of mutations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TopologicalSortFailed`] if some nodes could not be
    /// ordered, which means the graph contains a cycle.
    pub fn topological_sort(&self) -> Result<TopologicalOrder<N>, N> {
        let total = self.node_count();
        let mut indegree = self.indegrees();
        let mut ready: VecDeque<NodeIndex> = self.zero_indegree(&indegree).collect();
        let mut order = Vec::with_capacity(total);

        while let Some(index) = ready.pop_front() {
            order.push(index);
            for successor in self.neighbor_indices(index, Direction::Outgoing) {
                if release(&mut indegree, successor) {
                    ready.push_back(successor);
                }
            }
        }

        if order.len() < total {
            return Err(Error::TopologicalSortFailed {
                sorted: order.len(),
                total,
            });
        }

        trace!(nodes = total, "Sorted graph topologically");
        Ok(self.to_nodes(order))
    }

    /// Group nodes into topological generations.
    ///
    /// The first generation holds every node without incoming edges; each
    /// following generation holds the nodes whose last dependency was
    /// released by the generation before it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TopologicalSortFailed`] if some nodes could not be
    /// placed, which means the graph contains a cycle.
    pub fn topological_generations(&self) -> Result<Generations<N>, N> {
        let total = self.node_count();
        let mut indegree = self.indegrees();
        let mut current: Vec<NodeIndex> = self.zero_indegree(&indegree).collect();
        let mut generations = Vec::new();
        let mut placed = 0;

        while !current.is_empty() {
            let mut next = Vec::new();
            for &index in &current {
                for successor in self.neighbor_indices(index, Direction::Outgoing) {
                    if release(&mut indegree, successor) {
                        next.push(successor);
                    }
                }
            }
            placed += current.len();
            generations.push(self.to_nodes(current));
            current = next;
        }

        if placed < total {
            return Err(Error::TopologicalSortFailed {
                sorted: placed,
                total,
            });
        }

        trace!(
            nodes = total,
            generations = generations.len(),
            "Computed topological generations"
        );
        Ok(generations)
    }

    /// Group nodes into topological generations, each sorted by `key`.
    ///
    /// Membership and order of the generations are the same as
    /// [`Dag::topological_generations`]; only the order inside each
    /// generation changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TopologicalSortFailed`] if the graph contains a cycle.
    pub fn sorted_topological_generations<K, F>(&self, mut key: F) -> Result<Generations<N>, N>
    where
        K: Ord,
        F: FnMut(&N) -> K,
    {
        let mut generations = self.topological_generations()?;
        for generation in &mut generations {
            generation.sort_by_key(&mut key);
        }
        Ok(generations)
    }

    /// Find an edge leading back onto the current DFS path.
    ///
    /// petgraph's depth-first search colors nodes white/gray/black and
    /// reports an edge into a gray node as [`DfsEvent::BackEdge`]; the search
    /// starts from every undiscovered node and stops at the first one.
    pub(crate) fn find_back_edge(&self) -> Option<(NodeIndex, NodeIndex)> {
        let graph = self.inner();
        depth_first_search(graph, graph.node_indices(), |event| match event {
            DfsEvent::BackEdge(from, to) => Control::Break((from, to)),
            _ => Control::Continue,
        })
        .break_value()
    }

    fn indegrees(&self) -> HashMap<NodeIndex, usize> {
        let graph = self.inner();
        graph
            .node_indices()
            .map(|index| {
                (
                    index,
                    graph.neighbors_directed(index, Direction::Incoming).count(),
                )
            })
            .collect()
    }

    fn zero_indegree<'a>(
        &'a self,
        indegree: &'a HashMap<NodeIndex, usize>,
    ) -> impl Iterator<Item = NodeIndex> + 'a {
        self.inner()
            .node_indices()
            .filter(move |index| indegree.get(index) == Some(&0))
    }
}

/// Drop one incoming edge from `index`; returns true when none remain.
fn release(indegree: &mut HashMap<NodeIndex, usize>, index: NodeIndex) -> bool {
    indegree.get_mut(&index).is_some_and(|remaining| {
        *remaining = remaining.saturating_sub(1);
        *remaining == 0
    })
}
