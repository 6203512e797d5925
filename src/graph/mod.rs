//! Bipartite graph model (C2): the DMR<->gene edge set with bipartition
//! invariant and degree indices.

mod bipartite;

pub use bipartite::{BipartiteGraph, BipartiteGraphBuilder, BipartiteGraphView};
