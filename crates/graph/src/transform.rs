//! Whole-graph transformations.

use crate::Dag;
use std::hash::Hash;
use tracing::debug;

impl<N: Eq + Hash + Clone> Dag<N> {
    /// Build the subgraph induced by `nodes`.
    ///
    /// The result contains exactly the given nodes (including any the original
    /// graph does not know, as isolated nodes) and every edge of this graph
    /// whose endpoints are both among them. This graph is not modified.
    #[must_use]
    pub fn subgraph<I>(&self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
    {
        let mut subgraph = Self::new();
        for node in nodes {
            subgraph.add_node(node);
        }

        // Every edge comes from an acyclic graph, so no subset of them can
        // form a cycle and insertion order does not matter.
        for (from, to) in self.edges() {
            if subgraph.contains_node(from) && subgraph.contains_node(to) {
                subgraph.link_unchecked(from.clone(), to.clone());
            }
        }

        debug!(
            nodes = subgraph.node_count(),
            edges = subgraph.edge_count(),
            "Extracted subgraph"
        );
        subgraph
    }

    /// Reverse the direction of every edge in place.
    ///
    /// The reverse of an acyclic graph is acyclic, so the flip is done in a
    /// single step without re-checking each edge. Calling this twice restores
    /// the original edge set.
    pub fn reverse(&mut self) {
        self.flip_edges();
        debug!(edges = self.edge_count(), "Reversed graph");
    }
}
