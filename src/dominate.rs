//! Red-blue dominating set solver (spec.md §4.5): a typed port of
//! `greedy_rb_domination` / `minimize_dominating_set` from the original
//! `rb_domination.py`, generalized to run against any [`BipartiteGraph`].

use crate::graph::BipartiteGraph;
use crate::ids::{NodeId, NodeKind};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

/// One DMR chosen into the dominating set, with the stats it had at the
/// moment of selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DominatingSetRecord {
    pub dmr: NodeId,
    pub area_at_selection: f64,
    pub utility_at_selection: usize,
    pub newly_dominated_count: usize,
}

type HeapEntry = (usize, OrderedFloat<f64>, Reverse<NodeId>);

/// Computes a red-blue dominating set over `graph`'s DMR side, preferring
/// DMRs with larger `area` values to break utility ties. Genes with degree 0
/// are not required to be dominated (spec.md §4.5 failure modes).
pub fn dominate(graph: &BipartiteGraph, area: &HashMap<NodeId, f64>) -> Vec<DominatingSetRecord> {
    let gene_nodes: Vec<NodeId> =
        graph.nodes_of_kind(NodeKind::Gene).iter().copied().filter(|&g| graph.degree(g) > 0).collect();
    let target_genes: HashSet<NodeId> = gene_nodes.iter().copied().collect();
    if target_genes.is_empty() {
        return Vec::new();
    }

    let mut dominating_set: BTreeSet<NodeId> = BTreeSet::new();
    let mut dominated_genes: HashSet<NodeId> = HashSet::new();
    let mut records: Vec<DominatingSetRecord> = Vec::new();
    let area_of = |dmr: NodeId| area.get(&dmr).copied().unwrap_or(1.0);

    // Step 1: degree-1 sweep. Every gene with exactly one neighbor forces
    // that neighbor into the set; this is optimal for such a gene.
    let degree_one_genes: Vec<NodeId> = gene_nodes.iter().copied().filter(|&g| graph.degree(g) == 1).collect();
    for gene in degree_one_genes {
        if dominated_genes.contains(&gene) {
            continue;
        }
        let dmr = graph.neighbors(gene)[0];
        if dominating_set.insert(dmr) {
            let neighbors = graph.neighbors(dmr);
            let newly: Vec<NodeId> = neighbors.iter().copied().filter(|g| !dominated_genes.contains(g)).collect();
            records.push(DominatingSetRecord {
                dmr,
                area_at_selection: area_of(dmr),
                utility_at_selection: newly.len(),
                newly_dominated_count: newly.len(),
            });
        }
        dominated_genes.extend(graph.neighbors(dmr).iter().copied());
    }

    // Step 2: heap seeding for every DMR not yet selected with ≥1 undominated neighbor.
    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
    let mut utility_map: HashMap<NodeId, (usize, OrderedFloat<f64>)> = HashMap::new();
    for &dmr in graph.nodes_of_kind(NodeKind::Dmr) {
        if dominating_set.contains(&dmr) {
            continue;
        }
        let utility = graph.neighbors(dmr).iter().filter(|g| !dominated_genes.contains(g)).count();
        if utility > 0 {
            let entry = (utility, OrderedFloat(area_of(dmr)), Reverse(dmr));
            utility_map.insert(dmr, (entry.0, entry.1));
            heap.push(entry);
        }
    }

    // Step 3: main greedy loop with lazy invalidation.
    while dominated_genes.len() < target_genes.len() {
        let Some((utility, heap_area, Reverse(dmr))) = heap.pop() else { break };
        match utility_map.get(&dmr) {
            Some(&(current_utility, current_area)) if current_utility == utility && current_area == heap_area => {}
            _ => continue,
        }

        dominating_set.insert(dmr);
        let newly: Vec<NodeId> =
            graph.neighbors(dmr).iter().copied().filter(|g| !dominated_genes.contains(g)).collect();
        dominated_genes.extend(newly.iter().copied());
        records.push(DominatingSetRecord {
            dmr,
            area_at_selection: heap_area.into_inner(),
            utility_at_selection: utility,
            newly_dominated_count: newly.len(),
        });
        utility_map.remove(&dmr);

        let mut affected: HashSet<NodeId> = HashSet::new();
        for &gene in &newly {
            for &neighbor_dmr in graph.neighbors(gene) {
                if !dominating_set.contains(&neighbor_dmr) && utility_map.contains_key(&neighbor_dmr) {
                    affected.insert(neighbor_dmr);
                }
            }
        }
        for affected_dmr in affected {
            let new_utility =
                graph.neighbors(affected_dmr).iter().filter(|g| !dominated_genes.contains(g)).count();
            if new_utility > 0 {
                let entry_area = OrderedFloat(area_of(affected_dmr));
                utility_map.insert(affected_dmr, (new_utility, entry_area));
                heap.push((new_utility, entry_area, Reverse(affected_dmr)));
            } else {
                utility_map.remove(&affected_dmr);
            }
        }
    }

    // Step 4: irredundancy minimization, repeated to a fixpoint.
    let minimized = minimize(graph, dominating_set);
    records.retain(|r| minimized.contains(&r.dmr));
    records.sort_by_key(|r| r.dmr);
    records
}

fn minimize(graph: &BipartiteGraph, dominating_set: BTreeSet<NodeId>) -> BTreeSet<NodeId> {
    let mut current = dominating_set;
    loop {
        let mut removed_any = false;
        for d in current.clone() {
            if !current.contains(&d) {
                continue;
            }
            let still_dominated = graph
                .neighbors(d)
                .iter()
                .all(|&gene| graph.neighbors(gene).iter().any(|&other| other != d && current.contains(&other)));
            if still_dominated {
                current.remove(&d);
                removed_any = true;
            }
        }
        if !removed_any {
            break;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BipartiteGraphBuilder;

    const BASE: u64 = 100_000;

    #[test]
    fn empty_graph_yields_empty_set() {
        let graph = BipartiteGraphBuilder::new(BASE).finish().unwrap();
        assert!(dominate(&graph, &HashMap::new()).is_empty());
    }

    #[test]
    fn degree_zero_gene_is_not_required_to_be_dominated() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.touch_node(BASE); // isolated gene
        let graph = builder.finish().unwrap();
        assert!(dominate(&graph, &HashMap::new()).is_empty());
    }

    #[test]
    fn degree_one_gene_forces_its_neighbor_in() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        let graph = builder.finish().unwrap();
        let result = dominate(&graph, &HashMap::new());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].dmr, 0);
    }

    #[test]
    fn star_picks_the_single_hub_dmr() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        for g in 0..5u64 {
            builder.add_edge(0, BASE + g).unwrap();
        }
        let graph = builder.finish().unwrap();
        let result = dominate(&graph, &HashMap::new());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].dmr, 0);
        assert_eq!(result[0].newly_dominated_count, 5);
    }

    #[test]
    fn tie_breaks_toward_larger_area() {
        // Two DMRs each cover one distinct gene; no degree-1 forcing applies
        // since both genes have degree 1 via two different DMRs... use degree 2
        // genes instead so the heap path (not the sweep) makes the choice.
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.add_edge(0, BASE + 1).unwrap();
        builder.add_edge(1, BASE).unwrap();
        builder.add_edge(1, BASE + 1).unwrap();
        let graph = builder.finish().unwrap();
        let mut area = HashMap::new();
        area.insert(0, 5.0);
        area.insert(1, 9.0);
        let result = dominate(&graph, &area);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].dmr, 1);
    }

    #[test]
    fn minimization_drops_a_fully_redundant_dmr() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.add_edge(0, BASE + 1).unwrap();
        builder.add_edge(1, BASE).unwrap();
        builder.add_edge(1, BASE + 1).unwrap();
        let graph = builder.finish().unwrap();
        let result = minimize(&graph, [0u64, 1u64].into_iter().collect());
        assert_eq!(result.len(), 1);
    }
}
