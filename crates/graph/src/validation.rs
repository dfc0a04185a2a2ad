//! Validation utilities for DAGs.
//!
//! This module provides types and functions for validating graph structure.

use crate::{Dag, Error};
use petgraph::Direction;
use std::collections::HashSet;
use std::hash::Hash;

/// Outcome of [`Dag::validate`].
///
/// Problems are collected rather than returned one at a time, so a single
/// pass reports both a closing cycle edge and every parallel edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult<N> {
    /// True when `errors` is empty.
    pub is_valid: bool,
    /// At most one [`Error::CycleDetected`] naming the first back edge found,
    /// followed by one [`Error::DuplicateEdge`] per extra copy of an edge.
    pub errors: Vec<Error<N>>,
}

impl<N> ValidationResult<N> {
    /// A result with nothing to report.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
        }
    }

    /// A failing result carrying the problems found.
    #[must_use]
    pub fn invalid(errors: Vec<Error<N>>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

impl<N: Eq + Hash + Clone> Dag<N> {
    /// Validate the graph structure.
    ///
    /// Checks for:
    /// - Cycles, reported as [`Error::CycleDetected`] on the edge that closes one
    /// - Parallel edges, reported as [`Error::DuplicateEdge`]
    ///
    /// Graphs built only through [`Dag::add_edge`] always pass; this exists to
    /// double-check the structure independently of the insertion-time guard.
    #[must_use]
    pub fn validate(&self) -> ValidationResult<N> {
        let graph = self.inner();
        let mut errors = Vec::new();

        if let Some((from, to)) = self.find_back_edge() {
            errors.push(Error::CycleDetected {
                from: graph[from].clone(),
                to: graph[to].clone(),
            });
        }

        for source in graph.node_indices() {
            let mut seen = HashSet::new();
            for target in self.neighbor_indices(source, Direction::Outgoing) {
                if !seen.insert(target) {
                    errors.push(Error::DuplicateEdge {
                        from: graph[source].clone(),
                        to: graph[target].clone(),
                    });
                }
            }
        }

        if errors.is_empty() {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_graph() {
        let dag: Dag<&str> = Dag::new();
        let result = dag.validate();
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validate_valid_graph() {
        let dag = Dag::from_edges([("a", "b"), ("b", "c"), ("a", "c")]).unwrap();
        assert_eq!(dag.validate(), ValidationResult::valid());
    }

    #[test]
    fn test_validate_cyclic_graph() {
        let mut dag = Dag::from_edges([("a", "b")]).unwrap();
        dag.link_raw("b", "a");

        let result = dag.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].is_cycle());
    }

    #[test]
    fn test_validate_reports_cycle_and_duplicate_together() {
        let mut dag = Dag::from_edges([("a", "b")]).unwrap();
        dag.link_raw("a", "b");
        dag.link_raw("b", "a");

        let result = dag.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].is_cycle());
        assert_eq!(result.errors[1], Error::DuplicateEdge { from: "a", to: "b" });
    }

    #[test]
    fn test_validate_duplicate_edge() {
        let mut dag = Dag::from_edges([("a", "b")]).unwrap();
        dag.link_raw("a", "b");

        let result = dag.validate();
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![Error::DuplicateEdge { from: "a", to: "b" }]
        );
    }
}
