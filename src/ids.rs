//! IdSpace: disjoint integer id ranges for DMRs (per timepoint) and genes (global).
//!
//! See [`crate::config::Config::gene_id_base`] for the DMR/gene boundary and
//! [`crate::config::DMR_WINDOW_SIZE`] for the per-timepoint window width.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// A node identifier shared by both sides of the bipartite graph.
///
/// Values below the configured `gene_id_base` are DMR ids; values at or above
/// it are gene ids. [`NodeKind::classify`] is the single authoritative
/// predicate for this split.
pub type NodeId = u64;

/// Which side of the bipartition a [`NodeId`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A differentially methylated region.
    Dmr,
    /// A regulatory gene.
    Gene,
}

impl NodeKind {
    /// Classifies `id` as a DMR or a gene, given the configured boundary.
    ///
    /// This is a pure function of the integer value: `is_dmr(n) ≡ n < gene_id_base`.
    pub fn classify(id: NodeId, gene_id_base: u64) -> Self {
        if id < gene_id_base {
            NodeKind::Dmr
        } else {
            NodeKind::Gene
        }
    }
}

/// Assigns [`NodeId`]s for one timepoint's DMRs, given that timepoint's reserved window.
///
/// `IdSpace` holds no shared mutable registry: offsets are injected at
/// construction, and disjointness across timepoints is the caller's
/// responsibility (typically delegated to [`crate::config::Config`]).
#[derive(Debug, Clone, Copy)]
pub struct IdSpace {
    gene_id_base: u64,
    dmr_offset: u64,
}

impl IdSpace {
    /// Creates an id space for a timepoint whose DMR ids start at `dmr_offset`.
    pub fn new(gene_id_base: u64, dmr_offset: u64) -> Self {
        Self {
            gene_id_base,
            dmr_offset,
        }
    }

    /// Returns the configured DMR/gene boundary.
    pub fn gene_id_base(&self) -> u64 {
        self.gene_id_base
    }

    /// Computes the [`NodeId`] for `dmr_number` within this timepoint.
    ///
    /// Fails with [`PipelineError::IdOverflow`] if the result would collide
    /// with the gene id range.
    pub fn dmr_id(&self, timepoint: &str, dmr_number: u64) -> Result<NodeId> {
        let id = self.dmr_offset + dmr_number;
        if id >= self.gene_id_base {
            return Err(PipelineError::IdOverflow {
                timepoint: timepoint.to_string(),
            });
        }
        Ok(id)
    }

    /// Computes the [`NodeId`] for a gene at `index` in the canonical
    /// (case-folded, lexicographically sorted) gene symbol list.
    pub fn gene_id(&self, index: usize) -> NodeId {
        self.gene_id_base + index as u64
    }

    /// Classifies `id` as a DMR or gene.
    pub fn classify(&self, id: NodeId) -> NodeKind {
        NodeKind::classify(id, self.gene_id_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_boundary_pure() {
        assert_eq!(NodeKind::classify(99, 100), NodeKind::Dmr);
        assert_eq!(NodeKind::classify(100, 100), NodeKind::Gene);
    }

    #[test]
    fn dmr_id_offsets_by_window() {
        let space = IdSpace::new(100_000, 10_000);
        assert_eq!(space.dmr_id("P1", 5).unwrap(), 10_005);
    }

    #[test]
    fn dmr_id_overflow_is_fatal() {
        let space = IdSpace::new(100, 0);
        assert_eq!(
            space.dmr_id("P0", 100),
            Err(PipelineError::IdOverflow {
                timepoint: "P0".to_string()
            })
        );
    }

    #[test]
    fn gene_id_is_base_plus_index() {
        let space = IdSpace::new(100_000, 0);
        assert_eq!(space.gene_id(0), 100_000);
        assert_eq!(space.gene_id(42), 100_042);
    }

    #[test]
    fn classify_round_trips_through_id_space() {
        let space = IdSpace::new(100_000, 0);
        assert_eq!(space.classify(space.dmr_id("P0", 3).unwrap()), NodeKind::Dmr);
        assert_eq!(space.classify(space.gene_id(3)), NodeKind::Gene);
    }
}
