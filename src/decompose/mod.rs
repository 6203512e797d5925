//! Structural decomposition layer (C4): connected, biconnected, and
//! triconnected components over both the original and split graphs, plus
//! per-component size/coverage classification (spec.md §4.4).

mod biconnected;
mod classify;
mod components;
mod triconnected;

pub use biconnected::{biconnected_components, BiconnectedDecomposition};
pub use classify::{classify_component, ComponentCategory};
pub use components::connected_components;
pub use triconnected::{triconnected_pieces, TriconnectedPiece};

use crate::biclique::BicliqueStore;
use crate::error::Result;
use crate::graph::{BipartiteGraph, BipartiteGraphBuilder};
use crate::ids::{NodeId, NodeKind};
use std::collections::{BTreeSet, HashSet};

/// Which of the two input graphs (spec.md §4.4) a [`ComponentRecord`] was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    /// G_orig: the raw DMR<->gene graph.
    Original,
    /// G_split: G_orig with every biclique-claimed pair added as an edge.
    Split,
}

/// Which structural decomposition produced a [`ComponentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecompositionKind {
    Connected,
    Biconnected,
    Triconnected,
}

/// One reported component from a structural decomposition.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub graph_kind: GraphKind,
    pub decomposition_kind: DecompositionKind,
    /// Member nodes, sorted ascending (spec.md §4.4 determinism contract).
    pub nodes: Vec<NodeId>,
    pub dmr_count: usize,
    pub gene_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub category: ComponentCategory,
    /// Biclique ids intersecting this component's node set, ascending.
    pub biclique_ids: Vec<usize>,
    /// The 2-node cut this piece was split on, for triconnected pieces only.
    pub separation_pair: Option<(NodeId, NodeId)>,
}

/// Builds G_split = G_orig with every `(d, v)` pair claimed by any biclique
/// in `store` added as an edge, per spec.md §4.4.
///
/// This replaces the Python `add_split_graph_nodes` helper, whose source is
/// syntactically broken; the intent — carry every original node into the
/// split graph, then union in the cover edges — is reproduced directly
/// rather than transliterated.
pub fn build_split_graph(orig: &BipartiteGraph, store: &BicliqueStore) -> Result<BipartiteGraph> {
    let mut builder = BipartiteGraphBuilder::new(orig.gene_id_base());
    for kind in [NodeKind::Dmr, NodeKind::Gene] {
        for &node in orig.nodes_of_kind(kind) {
            builder.touch_node(node);
        }
    }
    for (dmr, gene) in orig.edges() {
        builder.add_edge(dmr, gene)?;
    }
    for (dmr, gene) in store.cover_edges() {
        builder.add_edge(dmr, gene)?;
    }
    builder.finish()
}

/// Runs all three structural decompositions over `graph` and classifies every
/// reported component, per spec.md §4.4.
///
/// Triconnected analysis is skipped for connected components whose DMR side
/// has cardinality 1 (step 1 of the layered approximation): such components
/// are star-shaped and trivially have no triconnectivity structure beyond
/// `K_{1,n}`.
pub fn decompose(
    graph: &BipartiteGraph,
    graph_kind: GraphKind,
    store: &BicliqueStore,
    triconnected_enabled: bool,
) -> Vec<ComponentRecord> {
    let mut records = Vec::new();
    let components = connected_components(graph);

    for component in &components {
        records.push(build_record(
            graph,
            graph_kind,
            DecompositionKind::Connected,
            component,
            store,
            None,
        ));

        let dmr_side = component.iter().filter(|&&n| NodeKind::classify(n, graph.gene_id_base()) == NodeKind::Dmr).count();

        let decomposition = biconnected_components(graph, component);
        for block in &decomposition.blocks {
            records.push(build_record(graph, graph_kind, DecompositionKind::Biconnected, block, store, None));
        }

        if !triconnected_enabled || dmr_side <= 1 {
            continue;
        }
        for block in &decomposition.blocks {
            for piece in triconnected_pieces(graph, block) {
                records.push(build_record(
                    graph,
                    graph_kind,
                    DecompositionKind::Triconnected,
                    &piece.nodes,
                    store,
                    piece.separation_pair,
                ));
            }
        }
    }

    records.sort_by(|a, b| a.nodes[0].cmp(&b.nodes[0]));
    records
}

fn build_record(
    graph: &BipartiteGraph,
    graph_kind: GraphKind,
    decomposition_kind: DecompositionKind,
    nodes: &[NodeId],
    store: &BicliqueStore,
    separation_pair: Option<(NodeId, NodeId)>,
) -> ComponentRecord {
    let node_set: HashSet<NodeId> = nodes.iter().copied().collect();
    let view = graph.subgraph(&node_set);

    let dmr_set: BTreeSet<NodeId> =
        nodes.iter().copied().filter(|&n| NodeKind::classify(n, graph.gene_id_base()) == NodeKind::Dmr).collect();
    let gene_set: BTreeSet<NodeId> =
        nodes.iter().copied().filter(|&n| NodeKind::classify(n, graph.gene_id_base()) == NodeKind::Gene).collect();

    let edge_count = view.edge_count();
    let size = nodes.len();
    let density = if size < 2 { 0.0 } else { (2 * edge_count) as f64 / (size * (size - 1)) as f64 };

    let mut biclique_ids: BTreeSet<usize> = BTreeSet::new();
    for &node in nodes {
        biclique_ids.extend(store.bicliques_of(node).iter().copied());
    }
    let biclique_ids: Vec<usize> = biclique_ids.into_iter().collect();

    let category = classify_component(size, &dmr_set, &gene_set, &biclique_ids, store);

    let mut sorted_nodes = nodes.to_vec();
    sorted_nodes.sort_unstable();

    ComponentRecord {
        graph_kind,
        decomposition_kind,
        nodes: sorted_nodes,
        dmr_count: dmr_set.len(),
        gene_count: gene_set.len(),
        edge_count,
        density,
        category,
        biclique_ids,
        separation_pair,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::GeneTable;
    use crate::graph::BipartiteGraphBuilder;

    const BASE: u64 = 100_000;

    fn empty_store() -> BicliqueStore {
        BicliqueStore::parse("# Clusters\n", BASE, &GeneTable::new())
    }

    #[test]
    fn build_split_graph_unions_cover_edges_into_the_original() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        let orig = builder.finish().unwrap();

        let store = BicliqueStore::for_test(vec![crate::biclique::Biclique {
            dmrs: [0u64, 1].into_iter().collect(),
            genes: [BASE, BASE + 1].into_iter().collect(),
        }]);

        let split = build_split_graph(&orig, &store).unwrap();
        assert!(split.has_edge(0, BASE));
        assert!(split.has_edge(0, BASE + 1));
        assert!(split.has_edge(1, BASE));
        assert!(split.has_edge(1, BASE + 1));
    }

    #[test]
    fn decompose_k33_yields_one_connected_and_one_biconnected_record() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        for d in 0..3u64 {
            for g in 0..3u64 {
                builder.add_edge(d, BASE + g).unwrap();
            }
        }
        let graph = builder.finish().unwrap();
        let store = empty_store();
        let records = decompose(&graph, GraphKind::Original, &store, true);

        let connected: Vec<_> =
            records.iter().filter(|r| r.decomposition_kind == DecompositionKind::Connected).collect();
        assert_eq!(connected.len(), 1);
        assert_eq!(connected[0].nodes.len(), 6);
        assert_eq!(connected[0].dmr_count, 3);
        assert_eq!(connected[0].gene_count, 3);

        let biconnected: Vec<_> =
            records.iter().filter(|r| r.decomposition_kind == DecompositionKind::Biconnected).collect();
        assert_eq!(biconnected.len(), 1);
    }

    #[test]
    fn single_dmr_star_skips_triconnected_analysis() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.add_edge(0, BASE + 1).unwrap();
        builder.add_edge(0, BASE + 2).unwrap();
        let graph = builder.finish().unwrap();
        let store = empty_store();
        let records = decompose(&graph, GraphKind::Original, &store, true);
        assert!(records.iter().all(|r| r.decomposition_kind != DecompositionKind::Triconnected));
    }

    #[test]
    fn isolated_node_is_single_node_category() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.touch_node(0);
        let graph = builder.finish().unwrap();
        let store = empty_store();
        let records = decompose(&graph, GraphKind::Original, &store, true);
        let connected = records.iter().find(|r| r.decomposition_kind == DecompositionKind::Connected).unwrap();
        assert_eq!(connected.category, ComponentCategory::SingleNode);
        assert_eq!(connected.density, 0.0);
    }
}
