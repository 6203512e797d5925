//! Per-timepoint node annotation with idempotent-merge upsert semantics
//! (spec.md §4.7).

use crate::ids::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node's role in the monotonic lattice `Regular -> Hub`, `Regular -> Split`.
///
/// `Split` never reverts once set; `Hub` is sticky within a timepoint but
/// yields to `Split` if a later merge sets it (genes and DMRs never actually
/// compete for the same node, so this ordering is a tie-break of convenience
/// rather than a load-bearing rule).
///
/// spec.md §3 enumerates the role domain as `{REGULAR, HUB, SPLIT, ISOLATE}`;
/// this type deliberately folds `ISOLATE` into [`Annotation::is_isolate`]
/// instead, since isolation is an orthogonal, degree-derived fact rather than
/// a lattice outcome — a node can be both a hub and an isolate (a dominating
/// DMR with no remaining undominated neighbors at the moment it merges).
/// Keeping it as a separate flag avoids a fifth `Regular`/`Isolate` pair of
/// lattice states that would otherwise need its own merge rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Regular,
    Hub,
    Split,
}

fn combine_role(current: NodeRole, incoming: NodeRole) -> NodeRole {
    match (current, incoming) {
        (NodeRole::Split, _) | (_, NodeRole::Split) => NodeRole::Split,
        (NodeRole::Hub, _) | (_, NodeRole::Hub) => NodeRole::Hub,
        _ => NodeRole::Regular,
    }
}

/// A per-timepoint annotation record for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub node: NodeId,
    pub component_id: Option<usize>,
    pub triconnected_id: Option<usize>,
    pub degree: usize,
    pub node_role: NodeRole,
    /// Biclique ids this node belongs to, always stored ascending.
    pub biclique_ids: BTreeSet<usize>,
    /// `true` iff this node has degree 0 in the split graph.
    pub is_isolate: bool,
}

impl Annotation {
    /// Computes a fresh annotation from this pass's observations.
    ///
    /// `is_hub` should be `true` iff `node` is in the computed dominating set
    /// (meaningful for DMRs only); `biclique_ids.len() >= 2` is the SPLIT
    /// condition (meaningful for genes only).
    pub fn compute(
        node: NodeId,
        component_id: Option<usize>,
        triconnected_id: Option<usize>,
        degree: usize,
        is_hub: bool,
        biclique_ids: BTreeSet<usize>,
    ) -> Self {
        let node_role = if biclique_ids.len() >= 2 {
            NodeRole::Split
        } else if is_hub {
            NodeRole::Hub
        } else {
            NodeRole::Regular
        };
        Annotation {
            node,
            component_id,
            triconnected_id,
            degree,
            node_role,
            is_isolate: degree == 0,
            biclique_ids,
        }
    }

    /// Merges a freshly computed annotation into this (presumably
    /// previously persisted) one, per spec.md §4.7's upsert contract.
    pub fn merge(&mut self, new: Annotation) {
        self.component_id = new.component_id;
        self.triconnected_id = new.triconnected_id;
        self.degree = new.degree;
        self.is_isolate = new.is_isolate;
        self.biclique_ids.extend(new.biclique_ids);
        self.node_role = combine_role(self.node_role, new.node_role);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bicliques_and_not_a_hub_is_regular() {
        let a = Annotation::compute(0, Some(1), None, 3, false, BTreeSet::new());
        assert_eq!(a.node_role, NodeRole::Regular);
        assert!(!a.is_isolate);
    }

    #[test]
    fn dominating_set_membership_makes_a_hub() {
        let a = Annotation::compute(0, Some(1), None, 3, true, BTreeSet::new());
        assert_eq!(a.node_role, NodeRole::Hub);
    }

    #[test]
    fn two_or_more_bicliques_makes_a_split() {
        let ids: BTreeSet<usize> = [0, 1].into_iter().collect();
        let a = Annotation::compute(100_000, None, None, 4, false, ids);
        assert_eq!(a.node_role, NodeRole::Split);
    }

    #[test]
    fn zero_degree_is_isolate() {
        let a = Annotation::compute(0, None, None, 0, false, BTreeSet::new());
        assert!(a.is_isolate);
    }

    #[test]
    fn split_role_is_sticky_across_merges() {
        let mut a = Annotation::compute(100_000, None, None, 4, false, [0, 1].into_iter().collect());
        assert_eq!(a.node_role, NodeRole::Split);
        let later = Annotation::compute(100_000, Some(2), None, 1, false, BTreeSet::new());
        a.merge(later);
        assert_eq!(a.node_role, NodeRole::Split, "split never reverts to regular");
    }

    #[test]
    fn biclique_ids_merge_as_an_ascending_union() {
        let mut a = Annotation::compute(100_000, None, None, 1, false, [2, 5].into_iter().collect());
        let later = Annotation::compute(100_000, None, None, 1, false, [1, 5].into_iter().collect());
        a.merge(later);
        assert_eq!(a.biclique_ids.into_iter().collect::<Vec<_>>(), vec![1, 2, 5]);
    }

    #[test]
    fn scalars_overwrite_on_merge() {
        let mut a = Annotation::compute(0, Some(1), Some(1), 3, false, BTreeSet::new());
        let later = Annotation::compute(0, Some(7), None, 9, false, BTreeSet::new());
        a.merge(later);
        assert_eq!(a.component_id, Some(7));
        assert_eq!(a.triconnected_id, None);
        assert_eq!(a.degree, 9);
    }
}
