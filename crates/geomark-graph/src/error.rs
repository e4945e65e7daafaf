//! Error types for graph mutations.

use thiserror::Error;

/// Errors reported by [`EntityGraph`](crate::EntityGraph) operations.
///
/// All variants are local, synchronous, and recoverable: the graph is
/// left unchanged when an operation fails.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A point already owned by one structure was offered to another.
    #[error("point is already owned by another structure")]
    OwnershipViolation,

    /// Finalizing a structure below its minimum vertex count.
    #[error("structure needs at least {needed} vertices, has {got}")]
    InsufficientVertices {
        /// Minimum vertex count for the structure kind.
        needed: usize,
        /// Vertex count actually present.
        got: usize,
    },

    /// An otherwise well-formed mutation that the target's state forbids.
    #[error("invalid structural mutation: {0}")]
    Structural(String),

    /// The referenced entity does not exist in the graph.
    #[error("no such entity")]
    NotFound,
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
