//! Error types for the dmrgraph library.

use crate::ids::NodeId;
use thiserror::Error;

/// Errors that can occur while building or analyzing a timepoint's graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A row, symbol, or biclique line could not be interpreted.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable description of what was rejected.
        reason: String,
    },

    /// No biclique cover file exists for the requested timepoint.
    #[error("no biclique cover for timepoint {timepoint}")]
    MissingCover {
        /// The timepoint that has no cover file.
        timepoint: String,
    },

    /// A timepoint's DMR id window was exhausted.
    #[error("DMR id overflow for timepoint {timepoint}")]
    IdOverflow {
        /// The timepoint whose offset window overflowed.
        timepoint: String,
    },

    /// An edge was proposed between two nodes on the same side of the bipartition.
    #[error("bipartition violation: {left} and {right} are on the same side")]
    BipartitionViolation {
        /// First endpoint of the offending edge.
        left: NodeId,
        /// Second endpoint of the offending edge.
        right: NodeId,
    },

    /// A connected component has original edges but no permanent ones.
    #[error("degenerate cover in component {component_id}")]
    DegenerateCover {
        /// Index of the component whose cover is degenerate.
        component_id: usize,
    },

    /// A persistence-collaborator call failed.
    #[error("persistence error: {cause}")]
    Persistence {
        /// The underlying failure reported by the collaborator.
        cause: String,
    },
}

/// Result type alias for dmrgraph operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
