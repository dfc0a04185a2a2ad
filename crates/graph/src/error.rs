//! Error types for DAG operations.

use thiserror::Error;

/// Result type for DAG operations over nodes of type `N`.
pub type Result<T, N> = std::result::Result<T, Error<N>>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced node or edge is not in the graph.
    NotFound,
    /// The requested edge is malformed (self-loop, parallel edge).
    InvalidEdge,
    /// The operation would create, or has found, a directed cycle.
    Cycle,
}

/// Errors that can occur during DAG operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error<N> {
    /// The node is not in the graph.
    #[error("Node {0:?} not found in graph")]
    NodeNotFound(N),

    /// The edge is not in the graph.
    #[error("Edge {from:?} -> {to:?} not found in graph")]
    EdgeNotFound {
        /// Source node of the missing edge.
        from: N,
        /// Target node of the missing edge.
        to: N,
    },

    /// An edge from a node to itself was requested.
    #[error("Self-loop on {0:?} is not allowed in an acyclic graph")]
    SelfLoop(N),

    /// The same ordered pair is linked more than once.
    #[error("Duplicate edge {from:?} -> {to:?}")]
    DuplicateEdge {
        /// Source node of the repeated edge.
        from: N,
        /// Target node of the repeated edge.
        to: N,
    },

    /// Linking `from -> to` would close a cycle, because `to` already reaches `from`.
    #[error("Adding edge {from:?} -> {to:?} would create a cycle")]
    CycleDetected {
        /// Source node of the rejected edge.
        from: N,
        /// Target node of the rejected edge.
        to: N,
    },

    /// Kahn's algorithm could not order every node.
    #[error("Graph contains a cycle: only {sorted} of {total} nodes could be ordered")]
    TopologicalSortFailed {
        /// Number of nodes emitted before the algorithm stalled.
        sorted: usize,
        /// Number of nodes in the graph.
        total: usize,
    },
}

impl<N> Error<N> {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NodeNotFound(_) | Self::EdgeNotFound { .. } => ErrorKind::NotFound,
            Self::SelfLoop(_) | Self::DuplicateEdge { .. } => ErrorKind::InvalidEdge,
            Self::CycleDetected { .. } | Self::TopologicalSortFailed { .. } => ErrorKind::Cycle,
        }
    }

    /// Whether this error reports a missing node or edge.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Whether this error reports a cycle.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.kind() == ErrorKind::Cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::NodeNotFound("a").kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::EdgeNotFound { from: "a", to: "b" }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(Error::SelfLoop("a").kind(), ErrorKind::InvalidEdge);
        assert_eq!(
            Error::DuplicateEdge { from: "a", to: "b" }.kind(),
            ErrorKind::InvalidEdge
        );
        assert_eq!(
            Error::CycleDetected { from: "a", to: "b" }.kind(),
            ErrorKind::Cycle
        );
        assert_eq!(
            Error::<&str>::TopologicalSortFailed { sorted: 1, total: 3 }.kind(),
            ErrorKind::Cycle
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::CycleDetected { from: "c", to: "a" };
        assert_eq!(
            err.to_string(),
            "Adding edge \"c\" -> \"a\" would create a cycle"
        );

        let err: Error<u32> = Error::TopologicalSortFailed { sorted: 2, total: 5 };
        assert_eq!(
            err.to_string(),
            "Graph contains a cycle: only 2 of 5 nodes could be ordered"
        );

        assert_eq!(
            Error::NodeNotFound(7).to_string(),
            "Node 7 not found in graph"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::NodeNotFound(1).is_not_found());
        assert!(!Error::NodeNotFound(1).is_cycle());
        assert!(Error::CycleDetected { from: 1, to: 2 }.is_cycle());
    }
}
