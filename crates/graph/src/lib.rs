//! Mutable directed acyclic graphs with cycle-rejecting edge insertion.
//!
//! This crate provides a DAG that stays acyclic after every public
//! operation, together with the reachability and ordering algorithms that
//! dependency graphs need, built on petgraph.
//!
//! # Key Types
//!
//! - [`Dag`]: The graph, generic over any `Eq + Hash + Clone` node identifier
//! - [`Error`]: Failures carrying the offending nodes, classified by [`ErrorKind`]
//! - [`ValidationResult`]: Outcome of a whole-graph structural check
//!
//! # Example
//!
//! ```
//! use acyclic_graph::{Dag, ErrorKind};
//!
//! let mut graph = Dag::new();
//! graph.add_edge("compile", "link")?;
//! graph.add_edge("link", "package")?;
//! graph.add_edge("compile", "test")?;
//!
//! // Closing a loop is rejected and leaves the graph unchanged.
//! let err = graph.add_edge("package", "compile").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Cycle);
//! assert_eq!(graph.edge_count(), 3);
//!
//! // Layers for parallel scheduling.
//! let layers = graph.sorted_topological_generations(|name| *name)?;
//! assert_eq!(layers, vec![vec!["compile"], vec!["link", "test"], vec!["package"]]);
//! # Ok::<(), acyclic_graph::Error<&str>>(())
//! ```
//!
//! # Concurrency
//!
//! The graph does no locking of its own. Mutations take `&mut self` and
//! queries take `&self`, so sharing it across threads means wrapping it in a
//! lock chosen by the caller; [`Dag::reverse`] completes within a single
//! `&mut` borrow and is never observed half-done.

mod error;
mod graph;
mod topology;
mod transform;
mod traversal;
mod validation;

pub use error::{Error, ErrorKind, Result};
pub use graph::Dag;
pub use topology::{Generations, TopologicalOrder};
pub use validation::ValidationResult;
