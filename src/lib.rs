//! # dmrgraph
//!
//! Bipartite graph analysis for DMR/gene methylation studies.
//!
//! A cohort's DMRs and the genes they interact with form a bipartite graph;
//! this crate builds that graph per timepoint, folds in an externally
//! supplied biclique cover, decomposes the result structurally, computes a
//! red-blue dominating set over the DMR side, reconciles the cover against
//! the raw graph edge by edge, and annotates every node with its role.
//!
//! ## Example
//!
//! ```rust
//! use dmrgraph::prelude::*;
//!
//! let mut builder = BipartiteGraphBuilder::new(100_000);
//! builder.add_edge(0, 100_000).unwrap();
//! let graph = builder.finish().unwrap();
//! assert_eq!(graph.edge_count(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`config`] run-wide configuration
//! - [`ids`] the DMR/gene id space
//! - [`gene`] the global gene table
//! - [`dmr`] per-timepoint DMR and timepoint records
//! - [`graph`] the bipartite graph (C2)
//! - [`biclique`] biclique cover ingestion (C3)
//! - [`decompose`] structural decomposition (C4)
//! - [`dominate`] the red-blue dominating set solver (C5)
//! - [`edges`] edge reconciliation (C6)
//! - [`annotate`] per-node annotation (C7)
//! - [`collaborators`] the `DataSource`/`Persistence` traits a caller implements
//! - [`pipeline`] the per-timepoint orchestrator (C8)
//! - [`serialize`] the cached-graph wire format
//! - [`error`] the crate's error type

pub mod annotate;
pub mod biclique;
pub mod collaborators;
pub mod config;
pub mod decompose;
pub mod dmr;
pub mod dominate;
pub mod edges;
pub mod error;
pub mod gene;
pub mod graph;
pub mod ids;
pub mod pipeline;
pub mod serialize;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::annotate::{Annotation, NodeRole};
    pub use crate::biclique::{Biclique, BicliqueCategory, BicliqueStore, CoverHeader, ParseWarning};
    pub use crate::collaborators::{
        AnnotationWrite, BicliqueWrite, ComponentWrite, DataSource, DmrRow, EdgeDetailWrite, Persistence,
    };
    pub use crate::config::Config;
    pub use crate::decompose::{
        build_split_graph, decompose, ComponentCategory, ComponentRecord, DecompositionKind, GraphKind,
    };
    pub use crate::dmr::{Dmr, Timepoint};
    pub use crate::dominate::{dominate as dominate_red_blue, DominatingSetRecord};
    pub use crate::edges::{
        classify_component_edges, EdgeClassification, EdgeClassificationStats, EdgeInfo, SourceTag,
    };
    pub use crate::error::{PipelineError, Result};
    pub use crate::gene::{Gene, GeneTable};
    pub use crate::graph::{BipartiteGraph, BipartiteGraphBuilder, BipartiteGraphView};
    pub use crate::ids::{IdSpace, NodeId, NodeKind};
    pub use crate::pipeline::{Pipeline, TimepointOutcome, WarningCounts};
}

// Re-export commonly used items at crate root.
pub use error::{PipelineError, Result};
pub use ids::{IdSpace, NodeId, NodeKind};
pub use pipeline::{Pipeline, TimepointOutcome};
