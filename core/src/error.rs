use thiserror::Error;

use crate::graph::VertexId;

/// Result alias for fallible graph queries.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised by graph queries.
///
/// Precondition failures are reported before any work is done. A negative
/// cycle is reported after Bellman-Ford's verification pass, and the
/// distances computed up to that point are discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The operation only makes sense on a directed graph.
    #[error("{operation} requires a directed graph")]
    RequiresDirected { operation: &'static str },

    /// The operation only makes sense on an undirected graph.
    #[error("{operation} requires an undirected graph")]
    RequiresUndirected { operation: &'static str },

    /// Topological ordering was requested on a graph containing a cycle.
    #[error("graph must be a DAG: a cycle was detected")]
    NotADag,

    /// Bellman-Ford could still relax an edge after |V| - 1 passes.
    #[error("graph contains a negative-weight cycle reachable from vertex {start}")]
    NegativeCycle { start: VertexId },
}

impl GraphError {
    /// True for errors caused by calling an operation on the wrong kind of graph.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GraphError::RequiresDirected { .. }
                | GraphError::RequiresUndirected { .. }
                | GraphError::NotADag
        )
    }
}
