//! DAG storage and invariant-preserving mutation using petgraph.
//!
//! Nodes are kept in a [`StableDiGraph`] so that removing a node never
//! invalidates the indices held by the lookup map. Every edge insertion goes
//! through a reachability check, so the graph is acyclic between any two
//! public calls.

use crate::{Error, Result};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::debug;

/// A mutable directed acyclic graph over caller-supplied node identifiers.
///
/// Nodes are created on first reference (by [`Dag::add_node`] or either end of
/// [`Dag::add_edge`]) and carry no payload. Edges are unweighted ordered pairs;
/// parallel edges and self-loops are never stored.
#[derive(Clone)]
pub struct Dag<N> {
    /// The directed graph of nodes.
    graph: StableDiGraph<N, ()>,
    /// Map from node identifiers to graph indices.
    node_index: HashMap<N, NodeIndex>,
}

impl<N: Eq + Hash + Clone> Dag<N> {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Create an empty graph with room for `nodes` nodes and `edges` edges.
    #[must_use]
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: StableDiGraph::with_capacity(nodes, edges),
            node_index: HashMap::with_capacity(nodes),
        }
    }

    /// Build a graph by inserting each edge in turn.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Dag::add_edge`]; edges after it
    /// are not inserted.
    pub fn from_edges<I>(edges: I) -> Result<Self, N>
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut dag = Self::new();
        for (from, to) in edges {
            dag.add_edge(from, to)?;
        }
        Ok(dag)
    }

    /// Add a node to the graph.
    ///
    /// Returns `false` if the node was already present, in which case the
    /// graph is unchanged.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.node_index.contains_key(&node) {
            return false;
        }
        self.ensure_node(node);
        true
    }

    /// Remove a node and every edge touching it.
    ///
    /// Returns `false` if the node was not present.
    pub fn remove_node(&mut self, node: &N) -> bool {
        let Some(index) = self.node_index.remove(node) else {
            return false;
        };
        let edges_before = self.graph.edge_count();
        self.graph.remove_node(index);
        debug!(
            purged_edges = edges_before.saturating_sub(self.graph.edge_count()),
            nodes = self.graph.node_count(),
            "Removed node"
        );
        true
    }

    /// Add an edge `from -> to`, creating either endpoint if absent.
    ///
    /// Adding an edge that already exists succeeds without changing anything.
    ///
    /// # Errors
    ///
    /// - [`Error::SelfLoop`] if `from == to`; no node is created.
    /// - [`Error::CycleDetected`] if `to` already reaches `from`. Only two
    ///   existing nodes can be joined by a path, so a rejected edge never
    ///   leaves new nodes behind.
    pub fn add_edge(&mut self, from: N, to: N) -> Result<(), N> {
        if from == to {
            debug!("Rejected self-loop");
            return Err(Error::SelfLoop(from));
        }

        let from_index = self.ensure_node(from);
        let to_index = self.ensure_node(to);

        if self.graph.find_edge(from_index, to_index).is_some() {
            return Ok(());
        }

        if self.reaches(to_index, from_index) {
            debug!("Rejected edge closing a cycle");
            return Err(Error::CycleDetected {
                from: self.graph[from_index].clone(),
                to: self.graph[to_index].clone(),
            });
        }

        self.graph.add_edge(from_index, to_index, ());
        debug!(edges = self.graph.edge_count(), "Added edge");
        Ok(())
    }

    /// Remove the edge `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotFound`] if the edge is not in the graph.
    pub fn remove_edge(&mut self, from: &N, to: &N) -> Result<(), N> {
        let edge = self
            .node_index
            .get(from)
            .zip(self.node_index.get(to))
            .and_then(|(&a, &b)| self.graph.find_edge(a, b))
            .ok_or_else(|| Error::EdgeNotFound {
                from: from.clone(),
                to: to.clone(),
            })?;
        self.graph.remove_edge(edge);
        debug!(edges = self.graph.edge_count(), "Removed edge");
        Ok(())
    }

    /// Check if a node exists in the graph.
    #[must_use]
    pub fn contains_node(&self, node: &N) -> bool {
        self.node_index.contains_key(node)
    }

    /// Check if the edge `from -> to` exists in the graph.
    #[must_use]
    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        match (self.node_index.get(from), self.node_index.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Get the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterate over all nodes.
    ///
    /// The order is unspecified but does not change between calls unless the
    /// graph is mutated.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.graph
            .node_indices()
            .filter_map(move |index| self.graph.node_weight(index))
    }

    /// Iterate over all edges as `(source, target)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> {
        self.graph.edge_indices().filter_map(move |edge| {
            let (a, b) = self.graph.edge_endpoints(edge)?;
            Some((self.graph.node_weight(a)?, self.graph.node_weight(b)?))
        })
    }

    /// Get the direct successors of a node, in edge insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node is not in the graph.
    pub fn successors(&self, node: &N) -> Result<Vec<&N>, N> {
        let index = self.index_of(node)?;
        Ok(self.weights(self.neighbor_indices(index, Direction::Outgoing)))
    }

    /// Get the direct predecessors of a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node is not in the graph.
    pub fn predecessors(&self, node: &N) -> Result<Vec<&N>, N> {
        let index = self.index_of(node)?;
        Ok(self.weights(self.neighbor_indices(index, Direction::Incoming)))
    }

    /// Get the number of edges ending at a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node is not in the graph.
    pub fn indegree(&self, node: &N) -> Result<usize, N> {
        let index = self.index_of(node)?;
        Ok(self
            .graph
            .neighbors_directed(index, Direction::Incoming)
            .count())
    }

    /// Get the number of edges starting at a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node is not in the graph.
    pub fn outdegree(&self, node: &N) -> Result<usize, N> {
        let index = self.index_of(node)?;
        Ok(self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .count())
    }

    /// Nodes with no incoming edges, in [`Dag::nodes`] order.
    pub fn roots(&self) -> impl Iterator<Item = &N> {
        self.boundary(Direction::Incoming)
    }

    /// Nodes with no outgoing edges, in [`Dag::nodes`] order.
    pub fn leaves(&self) -> impl Iterator<Item = &N> {
        self.boundary(Direction::Outgoing)
    }

    fn boundary(&self, direction: Direction) -> impl Iterator<Item = &N> {
        self.graph.node_indices().filter_map(move |index| {
            if self
                .graph
                .neighbors_directed(index, direction)
                .next()
                .is_none()
            {
                self.graph.node_weight(index)
            } else {
                None
            }
        })
    }

    /// Look up the graph index of a node.
    pub(crate) fn index_of(&self, node: &N) -> Result<NodeIndex, N> {
        self.node_index
            .get(node)
            .copied()
            .ok_or_else(|| Error::NodeNotFound(node.clone()))
    }

    /// Borrow the underlying petgraph storage.
    pub(crate) const fn inner(&self) -> &StableDiGraph<N, ()> {
        &self.graph
    }

    /// Neighbor indices in edge insertion order.
    ///
    /// petgraph walks adjacency lists newest-first, so the walk is reversed.
    pub(crate) fn neighbor_indices(
        &self,
        index: NodeIndex,
        direction: Direction,
    ) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(index, direction).collect();
        neighbors.reverse();
        neighbors
    }

    /// Clone the node identifiers behind a list of indices.
    pub(crate) fn to_nodes(&self, indices: impl IntoIterator<Item = NodeIndex>) -> Vec<N> {
        indices
            .into_iter()
            .filter_map(|index| self.graph.node_weight(index).cloned())
            .collect()
    }

    fn weights(&self, indices: Vec<NodeIndex>) -> Vec<&N> {
        indices
            .into_iter()
            .filter_map(|index| self.graph.node_weight(index))
            .collect()
    }

    /// Return the index of `node`, inserting it first if absent.
    fn ensure_node(&mut self, node: N) -> NodeIndex {
        if let Some(&index) = self.node_index.get(&node) {
            return index;
        }
        let index = self.graph.add_node(node.clone());
        self.node_index.insert(node, index);
        debug!(nodes = self.graph.node_count(), "Added node");
        index
    }

    /// Link two nodes without the reachability check.
    ///
    /// Callers must already know the edge keeps the graph acyclic, e.g.
    /// because it is copied from another acyclic graph.
    pub(crate) fn link_unchecked(&mut self, from: N, to: N) {
        let from_index = self.ensure_node(from);
        let to_index = self.ensure_node(to);
        debug_assert_ne!(from_index, to_index, "unchecked self-loop");
        self.graph.update_edge(from_index, to_index, ());
    }

    /// Replace every edge `a -> b` with `b -> a`, in one step.
    pub(crate) fn flip_edges(&mut self) {
        let flipped: Vec<(NodeIndex, NodeIndex)> = self
            .graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(a, b)| (b, a))
            .collect();
        self.graph.clear_edges();
        for (a, b) in flipped {
            self.graph.add_edge(a, b, ());
        }
    }

    /// Insert a raw edge, bypassing every check, so validators can be tested
    /// against graphs the public API refuses to build.
    #[cfg(test)]
    pub(crate) fn link_raw(&mut self, from: N, to: N) {
        let from_index = self.ensure_node(from);
        let to_index = self.ensure_node(to);
        self.graph.add_edge(from_index, to_index, ());
    }
}

impl<N: Eq + Hash + Clone> Default for Dag<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for Dag<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dag")
            .field("node_count", &self.graph.node_count())
            .field("edge_count", &self.graph.edge_count())
            .finish()
    }
}
