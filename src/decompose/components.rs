//! Connected components via disjoint-set union (spec.md §4.4).

use crate::graph::BipartiteGraph;
use crate::ids::NodeId;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Partitions `graph`'s nodes into maximal connected sets.
///
/// Runs in linear time via [`petgraph::unionfind::UnionFind`] over a dense
/// index space built from the graph's own node list. Returned groups are
/// ordered ascending by their minimum [`NodeId`], and each group's members
/// are sorted ascending — the determinism contract in spec.md §4.4.
pub fn connected_components(graph: &BipartiteGraph) -> Vec<Vec<NodeId>> {
    let mut index_of: HashMap<NodeId, usize> = HashMap::new();
    let mut nodes: Vec<NodeId> = Vec::new();
    for &n in graph.nodes_of_kind(crate::ids::NodeKind::Dmr) {
        index_of.insert(n, nodes.len());
        nodes.push(n);
    }
    for &n in graph.nodes_of_kind(crate::ids::NodeKind::Gene) {
        index_of.insert(n, nodes.len());
        nodes.push(n);
    }

    if nodes.is_empty() {
        return Vec::new();
    }

    let mut uf = UnionFind::new(nodes.len());
    for (dmr, gene) in graph.edges() {
        let a = index_of[&dmr];
        let b = index_of[&gene];
        uf.union(a, b);
    }

    let mut groups: HashMap<usize, Vec<NodeId>> = HashMap::new();
    for (i, &node) in nodes.iter().enumerate() {
        groups.entry(uf.find(i)).or_default().push(node);
    }

    let mut components: Vec<Vec<NodeId>> = groups.into_values().collect();
    for component in &mut components {
        component.sort_unstable();
    }
    components.sort_unstable_by_key(|c| c[0]);
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BipartiteGraphBuilder;

    const BASE: u64 = 100_000;

    #[test]
    fn empty_graph_has_no_components() {
        let graph = BipartiteGraphBuilder::new(BASE).finish().unwrap();
        assert!(connected_components(&graph).is_empty());
    }

    #[test]
    fn two_disjoint_edges_are_two_components() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.add_edge(1, BASE + 1).unwrap();
        let graph = builder.finish().unwrap();
        let components = connected_components(&graph);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0], vec![0, BASE]);
        assert_eq!(components[1], vec![1, BASE + 1]);
    }

    #[test]
    fn shared_gene_merges_two_stars_into_one_component() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE + 2).unwrap();
        builder.add_edge(1, BASE + 2).unwrap();
        let graph = builder.finish().unwrap();
        let components = connected_components(&graph);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0], vec![0, 1, BASE + 2]);
    }

    #[test]
    fn components_are_ordered_by_minimum_node_id() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(5, BASE + 5).unwrap();
        builder.add_edge(1, BASE + 1).unwrap();
        let graph = builder.finish().unwrap();
        let components = connected_components(&graph);
        assert_eq!(components[0][0], 1);
        assert_eq!(components[1][0], 5);
    }
}
