//! Bipartite graph holding the DMR<->gene edge set.

use crate::error::{PipelineError, Result};
use crate::ids::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// An immutable bipartite graph over DMR and gene [`NodeId`]s.
///
/// Construction is batch-oriented via [`BipartiteGraphBuilder`]; once built,
/// a `BipartiteGraph` cannot gain or lose edges. Invariants enforced at
/// `finish()` time (spec.md §4.2):
///
/// - every node's side matches [`NodeKind::classify`];
/// - no self-loops;
/// - degree sum equals `2 * edge_count()`.
///
/// Nodes with degree 0 are retained, not pruned; callers decide whether to drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BipartiteGraph {
    gene_id_base: u64,
    by_bipartition: [Vec<NodeId>; 2],
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    edges: BTreeSet<(NodeId, NodeId)>,
}

impl BipartiteGraph {
    /// Returns the configured DMR/gene boundary this graph was built against.
    pub fn gene_id_base(&self) -> u64 {
        self.gene_id_base
    }

    /// Returns the sorted, deduplicated neighbor list of `node`.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the degree of `node` (0 if the node is absent).
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Returns `true` if `(dmr, gene)` (in either argument order) is an edge.
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        let (dmr, gene) = Self::canonical_pair(u, v);
        self.edges.contains(&(dmr, gene))
    }

    /// Returns all DMR ([`NodeKind::Dmr`]) or gene ([`NodeKind::Gene`]) node ids, sorted.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> &[NodeId] {
        match kind {
            NodeKind::Dmr => &self.by_bipartition[0],
            NodeKind::Gene => &self.by_bipartition[1],
        }
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Total number of nodes across both sides.
    pub fn node_count(&self) -> usize {
        self.by_bipartition[0].len() + self.by_bipartition[1].len()
    }

    /// Iterates over all `(dmr, gene)` edges in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().copied()
    }

    /// Borrowing view restricted to `nodes`; does not copy adjacency data.
    pub fn subgraph<'a, 'b>(&'a self, nodes: &'b HashSet<NodeId>) -> BipartiteGraphView<'a, 'b> {
        BipartiteGraphView { graph: self, nodes }
    }

    /// Materializes an owned copy of the subgraph induced by `nodes`.
    pub fn subgraph_copy(&self, nodes: &HashSet<NodeId>) -> BipartiteGraph {
        let mut builder = BipartiteGraphBuilder::new(self.gene_id_base);
        for &(dmr, gene) in &self.edges {
            if nodes.contains(&dmr) && nodes.contains(&gene) {
                builder.add_edge(dmr, gene).expect("subgraph edges always well-formed");
            }
        }
        for kind in [NodeKind::Dmr, NodeKind::Gene] {
            for &node in self.nodes_of_kind(kind) {
                if nodes.contains(&node) {
                    builder.touch_node(node);
                }
            }
        }
        builder.finish().expect("subgraph of a valid graph is always valid")
    }

    fn canonical_pair(u: NodeId, v: NodeId) -> (NodeId, NodeId) {
        if u < v {
            (u, v)
        } else {
            (v, u)
        }
    }
}

/// A read-only view of a [`BipartiteGraph`] restricted to a node subset.
///
/// Used by the decomposer to query per-component statistics without
/// materializing a fresh owned graph for every component.
pub struct BipartiteGraphView<'a, 'b> {
    graph: &'a BipartiteGraph,
    nodes: &'b HashSet<NodeId>,
}

impl BipartiteGraphView<'_, '_> {
    /// Returns the neighbors of `node` that also lie in this view's node set.
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains(&node) {
            return Vec::new();
        }
        self.graph
            .neighbors(node)
            .iter()
            .copied()
            .filter(|n| self.nodes.contains(n))
            .collect()
    }

    /// Returns the degree of `node` within this view.
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Returns `true` if both endpoints are in the view and the edge exists
    /// in the underlying graph.
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.nodes.contains(&u) && self.nodes.contains(&v) && self.graph.has_edge(u, v)
    }

    /// Counts edges with both endpoints in the view.
    pub fn edge_count(&self) -> usize {
        self.graph
            .edges()
            .filter(|&(d, g)| self.nodes.contains(&d) && self.nodes.contains(&g))
            .count()
    }
}

/// Batch builder for [`BipartiteGraph`].
///
/// Accumulates edges and touched nodes; `finish()` validates the bipartition
/// invariant and the degree-sum invariant, and finalizes the immutable
/// adjacency representation. If any edge added during the batch violates the
/// bipartition, the whole batch is rejected — there is no partially-built
/// graph left behind.
#[derive(Debug, Clone)]
pub struct BipartiteGraphBuilder {
    gene_id_base: u64,
    touched: BTreeSet<NodeId>,
    edges: BTreeSet<(NodeId, NodeId)>,
    violation: Option<PipelineError>,
}

impl BipartiteGraphBuilder {
    /// Creates a builder for edges classified against `gene_id_base`.
    pub fn new(gene_id_base: u64) -> Self {
        Self {
            gene_id_base,
            touched: BTreeSet::new(),
            edges: BTreeSet::new(),
            violation: None,
        }
    }

    /// Records that `node` participates in the graph even if it ends up with
    /// degree 0 (e.g. a DMR with no resolved gene annotations).
    pub fn touch_node(&mut self, node: NodeId) -> &mut Self {
        self.touched.insert(node);
        self
    }

    /// Adds an edge between `u` and `v`, resolving which side is the DMR and
    /// which is the gene via [`NodeKind::classify`].
    ///
    /// Duplicate edges are silently deduplicated (the edge set is a true
    /// set). An edge between two nodes on the same side is rejected with
    /// [`PipelineError::BipartitionViolation`] and poisons the rest of the
    /// batch: subsequent calls to `finish()` return the same error without
    /// having mutated any previously-finished graph.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<&mut Self> {
        if u == v {
            let err = PipelineError::BipartitionViolation { left: u, right: v };
            self.violation = Some(err.clone());
            return Err(err);
        }
        let u_kind = NodeKind::classify(u, self.gene_id_base);
        let v_kind = NodeKind::classify(v, self.gene_id_base);
        let (dmr, gene) = match (u_kind, v_kind) {
            (NodeKind::Dmr, NodeKind::Gene) => (u, v),
            (NodeKind::Gene, NodeKind::Dmr) => (v, u),
            _ => {
                let err = PipelineError::BipartitionViolation { left: u, right: v };
                self.violation = Some(err.clone());
                return Err(err);
            }
        };
        self.touched.insert(dmr);
        self.touched.insert(gene);
        self.edges.insert((dmr, gene));
        Ok(self)
    }

    /// Validates and finalizes the graph.
    ///
    /// Returns the pending [`PipelineError::BipartitionViolation`] if any
    /// `add_edge` call in this batch failed, rolling the whole batch back
    /// (no graph is returned).
    pub fn finish(self) -> Result<BipartiteGraph> {
        if let Some(err) = self.violation {
            return Err(err);
        }

        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for &(dmr, gene) in &self.edges {
            adjacency.entry(dmr).or_default().push(gene);
            adjacency.entry(gene).or_default().push(dmr);
        }
        for neighbors in adjacency.values_mut() {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        let mut by_bipartition: [Vec<NodeId>; 2] = [Vec::new(), Vec::new()];
        for &node in &self.touched {
            match NodeKind::classify(node, self.gene_id_base) {
                NodeKind::Dmr => by_bipartition[0].push(node),
                NodeKind::Gene => by_bipartition[1].push(node),
            }
        }
        by_bipartition[0].sort_unstable();
        by_bipartition[1].sort_unstable();

        let degree_sum: usize = adjacency.values().map(Vec::len).sum();
        debug_assert_eq!(degree_sum, 2 * self.edges.len(), "degree sum must equal 2|E|");

        Ok(BipartiteGraph {
            gene_id_base: self.gene_id_base,
            by_bipartition,
            adjacency,
            edges: self.edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u64 = 100_000;

    #[test]
    fn k33_has_nine_edges_and_degree_three() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        for d in 0..3u64 {
            for g in 0..3u64 {
                builder.add_edge(d, BASE + g).unwrap();
            }
        }
        let graph = builder.finish().unwrap();
        assert_eq!(graph.edge_count(), 9);
        for d in 0..3u64 {
            assert_eq!(graph.degree(d), 3);
        }
        for g in 0..3u64 {
            assert_eq!(graph.degree(BASE + g), 3);
        }
    }

    #[test]
    fn duplicate_edges_deduplicate() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.add_edge(BASE, 0).unwrap(); // reversed argument order, same edge
        let graph = builder.finish().unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn same_side_edge_is_rejected_and_batch_rolls_back() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        let err = builder.add_edge(0, 1).unwrap_err();
        assert!(matches!(err, PipelineError::BipartitionViolation { .. }));
        assert!(builder.finish().is_err());
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        assert!(builder.add_edge(5, 5).is_err());
    }

    #[test]
    fn isolated_node_is_retained_with_zero_degree() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.touch_node(1);
        let graph = builder.finish().unwrap();
        assert_eq!(graph.degree(1), 0);
        assert!(graph.nodes_of_kind(NodeKind::Dmr).contains(&1));
    }

    #[test]
    fn subgraph_copy_restricts_edges_to_the_node_set() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        for d in 0..3u64 {
            for g in 0..3u64 {
                builder.add_edge(d, BASE + g).unwrap();
            }
        }
        let graph = builder.finish().unwrap();
        let subset: HashSet<NodeId> = [0, BASE].into_iter().collect();
        let sub = graph.subgraph_copy(&subset);
        assert_eq!(sub.edge_count(), 1);
        assert!(sub.has_edge(0, BASE));
    }

    #[test]
    fn view_does_not_leak_edges_outside_the_node_set() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.add_edge(0, BASE + 1).unwrap();
        let graph = builder.finish().unwrap();
        let subset: HashSet<NodeId> = [0, BASE].into_iter().collect();
        let view = graph.subgraph(&subset);
        assert_eq!(view.degree(0), 1);
        assert!(!view.has_edge(0, BASE + 1));
    }
}
