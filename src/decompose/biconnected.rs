//! Biconnected components via an iterative Tarjan articulation-point DFS
//! (spec.md §4.4).

use crate::graph::BipartiteGraph;
use crate::ids::NodeId;
use std::collections::{HashMap, HashSet};

/// Result of decomposing one connected component into biconnected blocks.
pub struct BiconnectedDecomposition {
    /// Node sets of each maximal biconnected block, members sorted ascending.
    pub blocks: Vec<Vec<NodeId>>,
    /// Articulation points of the component, sorted ascending.
    pub articulation_points: Vec<NodeId>,
}

struct Frame {
    node: NodeId,
    parent: Option<NodeId>,
    neighbor_idx: usize,
    children: usize,
    parent_skipped: bool,
}

/// Decomposes the subgraph induced by `component_nodes` (assumed connected)
/// into biconnected blocks, using a non-recursive DFS so block size is not
/// bounded by call-stack depth.
pub fn biconnected_components(graph: &BipartiteGraph, component_nodes: &[NodeId]) -> BiconnectedDecomposition {
    if component_nodes.len() <= 1 {
        return BiconnectedDecomposition {
            blocks: vec![component_nodes.to_vec()],
            articulation_points: Vec::new(),
        };
    }

    let node_set: HashSet<NodeId> = component_nodes.iter().copied().collect();
    let mut disc: HashMap<NodeId, usize> = HashMap::new();
    let mut low: HashMap<NodeId, usize> = HashMap::new();
    let mut timer = 0usize;
    let mut edge_stack: Vec<(NodeId, NodeId)> = Vec::new();
    let mut blocks: Vec<Vec<NodeId>> = Vec::new();
    let mut articulation: HashSet<NodeId> = HashSet::new();

    for &start in component_nodes {
        if disc.contains_key(&start) {
            continue;
        }

        let mut stack: Vec<Frame> =
            vec![Frame { node: start, parent: None, neighbor_idx: 0, children: 0, parent_skipped: false }];
        disc.insert(start, timer);
        low.insert(start, timer);
        timer += 1;

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            let neighbors = graph.neighbors(node);
            if frame.neighbor_idx < neighbors.len() {
                let next = neighbors[frame.neighbor_idx];
                frame.neighbor_idx += 1;
                if !node_set.contains(&next) {
                    continue;
                }
                if !frame.parent_skipped && Some(next) == frame.parent {
                    // Skip exactly one edge back to the immediate parent;
                    // parallel edges don't exist in a simple bipartite graph.
                    frame.parent_skipped = true;
                    continue;
                }
                if let Some(&next_disc) = disc.get(&next) {
                    if next_disc < disc[&node] {
                        edge_stack.push((node, next));
                        let node_low = low[&node];
                        low.insert(node, node_low.min(next_disc));
                    }
                } else {
                    edge_stack.push((node, next));
                    frame.children += 1;
                    disc.insert(next, timer);
                    low.insert(next, timer);
                    timer += 1;
                    stack.push(Frame {
                        node: next,
                        parent: Some(node),
                        neighbor_idx: 0,
                        children: 0,
                        parent_skipped: false,
                    });
                }
            } else {
                let finished = stack.pop().unwrap();
                if let Some(parent) = finished.parent {
                    let child_low = low[&finished.node];
                    let parent_low = low[&parent];
                    low.insert(parent, parent_low.min(child_low));

                    let parent_is_root = stack.len() == 1;
                    let cuts_here = child_low >= disc[&parent];
                    if cuts_here {
                        let mut block = HashSet::new();
                        while let Some(&(u, v)) = edge_stack.last() {
                            if disc[&u] >= disc[&finished.node] || (u == parent && v == finished.node) {
                                block.insert(u);
                                block.insert(v);
                                edge_stack.pop();
                                if u == parent && v == finished.node {
                                    break;
                                }
                            } else {
                                break;
                            }
                        }
                        if !block.is_empty() {
                            let mut members: Vec<NodeId> = block.into_iter().collect();
                            members.sort_unstable();
                            blocks.push(members);
                        }
                        // The root is only an articulation point if it has more
                        // than one DFS child; that is checked when the root
                        // frame itself finishes, not here.
                        if !parent_is_root {
                            articulation.insert(parent);
                        }
                    }
                } else {
                    // Root frame finished: flush any leftover edges (single-block component),
                    // and the root is an articulation point only if it had >1 DFS children.
                    if finished.children > 1 {
                        articulation.insert(finished.node);
                    }
                    if !edge_stack.is_empty() {
                        let mut block = HashSet::new();
                        for (u, v) in edge_stack.drain(..) {
                            block.insert(u);
                            block.insert(v);
                        }
                        if !block.is_empty() {
                            let mut members: Vec<NodeId> = block.into_iter().collect();
                            members.sort_unstable();
                            blocks.push(members);
                        }
                    }
                }
            }
        }
    }

    if blocks.is_empty() {
        blocks.push(component_nodes.to_vec());
    }

    let mut articulation_points: Vec<NodeId> = articulation.into_iter().collect();
    articulation_points.sort_unstable();

    BiconnectedDecomposition { blocks, articulation_points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BipartiteGraphBuilder;

    const BASE: u64 = 100_000;

    #[test]
    fn single_node_component_is_its_own_block() {
        let graph = BipartiteGraphBuilder::new(BASE).finish().unwrap();
        let decomposition = biconnected_components(&graph, &[0]);
        assert_eq!(decomposition.blocks, vec![vec![0]]);
        assert!(decomposition.articulation_points.is_empty());
    }

    #[test]
    fn k33_is_one_biconnected_block_with_no_articulation_points() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        for d in 0..3u64 {
            for g in 0..3u64 {
                builder.add_edge(d, BASE + g).unwrap();
            }
        }
        let graph = builder.finish().unwrap();
        let nodes: Vec<NodeId> = (0..3).chain((BASE..BASE + 3).map(|g| g)).collect();
        let decomposition = biconnected_components(&graph, &nodes);
        assert_eq!(decomposition.blocks.len(), 1);
        assert_eq!(decomposition.blocks[0].len(), 6);
        assert!(decomposition.articulation_points.is_empty());
    }

    #[test]
    fn two_triangles_joined_at_a_cut_vertex() {
        // DMR 100 is shared between two otherwise-disjoint stars, making it
        // the articulation point joining two blocks.
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.add_edge(0, BASE + 1).unwrap();
        builder.add_edge(1, BASE + 1).unwrap();
        builder.add_edge(1, BASE + 2).unwrap();
        let graph = builder.finish().unwrap();
        let nodes: Vec<NodeId> = vec![0, 1, BASE, BASE + 1, BASE + 2];
        let decomposition = biconnected_components(&graph, &nodes);
        assert_eq!(decomposition.blocks.len(), 2);
        assert_eq!(decomposition.articulation_points, vec![BASE + 1]);
    }
}
