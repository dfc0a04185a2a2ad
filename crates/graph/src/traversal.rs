//! Reachability queries over a DAG.
//!
//! Every walk here uses petgraph's [`Dfs`], which keeps an explicit stack and
//! a visited set, so shared substructure is visited once and deep graphs do
//! not grow the call stack.

use crate::{Dag, Result};
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::{Dfs, Reversed};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::trace;

impl<N: Eq + Hash + Clone> Dag<N> {
    /// Check whether a directed path leads from `start` to `end`.
    ///
    /// A node always reaches itself, whether or not it is in the graph.
    /// Otherwise unknown nodes reach nothing.
    #[must_use]
    pub fn has_path(&self, start: &N, end: &N) -> bool {
        if start == end {
            return true;
        }
        match (self.index_of(start), self.index_of(end)) {
            (Ok(start), Ok(end)) => self.reaches(start, end),
            _ => false,
        }
    }

    /// Get every node reachable from `node` through one or more edges.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NodeNotFound`] if the node is not in the graph.
    pub fn descendants(&self, node: &N) -> Result<HashSet<N>, N> {
        let start = self.index_of(node)?;
        let graph = self.inner();
        let mut dfs = Dfs::new(graph, start);
        let mut found = HashSet::new();
        while let Some(index) = dfs.next(graph) {
            if index != start {
                found.insert(index);
            }
        }
        trace!(count = found.len(), "Collected descendants");
        Ok(self.to_nodes(found).into_iter().collect())
    }

    /// Get every node that reaches `node` through one or more edges.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NodeNotFound`] if the node is not in the graph.
    pub fn ancestors(&self, node: &N) -> Result<HashSet<N>, N> {
        let start = self.index_of(node)?;
        let reversed = Reversed(self.inner());
        let mut dfs = Dfs::new(reversed, start);
        let mut found = HashSet::new();
        while let Some(index) = dfs.next(reversed) {
            if index != start {
                found.insert(index);
            }
        }
        trace!(count = found.len(), "Collected ancestors");
        Ok(self.to_nodes(found).into_iter().collect())
    }

    /// Compute the transitive closure of an initial set of nodes.
    ///
    /// Returns the initial nodes together with all of their descendants.
    /// Initial nodes that are not in the graph are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use acyclic_graph::Dag;
    ///
    /// let dag = Dag::from_edges([("deploy", "test"), ("test", "build"), ("lint", "fmt")])?;
    /// let closure = dag.transitive_closure(&["deploy"]);
    /// assert_eq!(closure.len(), 3);
    /// assert!(!closure.contains("lint"));
    /// # Ok::<(), acyclic_graph::Error<&str>>(())
    /// ```
    #[must_use]
    pub fn transitive_closure<'a>(&self, initial: impl IntoIterator<Item = &'a N>) -> HashSet<N>
    where
        N: 'a,
    {
        let graph = self.inner();
        let mut dfs = Dfs::empty(graph);
        let mut found = Vec::new();

        for node in initial {
            let Ok(start) = self.index_of(node) else {
                continue;
            };
            // `move_to` keeps the discovered set, so shared descendants are walked once.
            dfs.move_to(start);
            while let Some(index) = dfs.next(graph) {
                found.push(index);
            }
        }

        self.to_nodes(found).into_iter().collect()
    }

    /// Path existence between two known indices.
    pub(crate) fn reaches(&self, start: NodeIndex, end: NodeIndex) -> bool {
        let graph = self.inner();
        let mut dfs = Dfs::new(graph, start);
        while let Some(index) = dfs.next(graph) {
            if index == end {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    /// A -> B -> C, A -> D
    fn sample() -> Dag<&'static str> {
        Dag::from_edges([("A", "B"), ("B", "C"), ("A", "D")]).unwrap()
    }

    #[test]
    fn test_has_path() {
        let dag = sample();
        assert!(dag.has_path(&"A", &"C"));
        assert!(dag.has_path(&"A", &"D"));
        assert!(!dag.has_path(&"C", &"A"));
        assert!(!dag.has_path(&"D", &"C"));
    }

    #[test]
    fn test_has_path_to_self() {
        let dag = sample();
        assert!(dag.has_path(&"B", &"B"));
    }

    #[test]
    fn test_has_path_unknown_nodes() {
        let dag = sample();
        assert!(!dag.has_path(&"A", &"Z"));
        assert!(!dag.has_path(&"Z", &"A"));
    }

    #[test]
    fn test_has_path_to_unknown_self() {
        let dag: Dag<&str> = Dag::new();
        assert!(dag.has_path(&"Z", &"Z"));
        assert!(sample().has_path(&"Z", &"Z"));
    }

    #[test]
    fn test_descendants() {
        let dag = sample();
        assert_eq!(
            dag.descendants(&"A").unwrap(),
            HashSet::from(["B", "C", "D"])
        );
        assert_eq!(dag.descendants(&"B").unwrap(), HashSet::from(["C"]));
        assert!(dag.descendants(&"C").unwrap().is_empty());
    }

    #[test]
    fn test_ancestors() {
        let dag = sample();
        assert_eq!(dag.ancestors(&"C").unwrap(), HashSet::from(["A", "B"]));
        assert_eq!(dag.ancestors(&"D").unwrap(), HashSet::from(["A"]));
        assert!(dag.ancestors(&"A").unwrap().is_empty());
    }

    #[test]
    fn test_closures_of_unknown_node_fail() {
        let dag = sample();
        assert_eq!(dag.descendants(&"Z").unwrap_err(), Error::NodeNotFound("Z"));
        assert_eq!(dag.ancestors(&"Z").unwrap_err(), Error::NodeNotFound("Z"));
    }

    #[test]
    fn test_repeated_queries_are_independent() {
        let dag = sample();
        let first = dag.descendants(&"B").unwrap();
        let _ = dag.descendants(&"A").unwrap();
        assert_eq!(dag.descendants(&"B").unwrap(), first);
    }

    #[test]
    fn test_shared_descendants_counted_once() {
        // Diamond: a -> {b, c} -> d -> e
        let dag =
            Dag::from_edges([("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e")]).unwrap();
        assert_eq!(
            dag.descendants(&"a").unwrap(),
            HashSet::from(["b", "c", "d", "e"])
        );
        assert_eq!(
            dag.ancestors(&"e").unwrap(),
            HashSet::from(["a", "b", "c", "d"])
        );
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let dag = Dag::from_edges((0..50_000_u32).map(|i| (i, i + 1))).unwrap();
        assert!(dag.has_path(&0, &50_000));
        assert_eq!(dag.descendants(&0).unwrap().len(), 50_000);
        assert_eq!(dag.ancestors(&50_000).unwrap().len(), 50_000);
    }

    #[test]
    fn test_transitive_closure() {
        let dag = Dag::from_edges([
            ("deploy", "test"),
            ("test", "build"),
            ("lint", "fmt"),
            ("docs", "build"),
        ])
        .unwrap();

        let closure = dag.transitive_closure(&["deploy", "docs", "missing"]);
        assert_eq!(closure, HashSet::from(["deploy", "test", "build", "docs"]));
        assert!(dag.transitive_closure(&[]).is_empty());
    }
}
