//! Layered triconnectivity approximation (spec.md §4.4 step 3).
//!
//! This is explicitly not a Hopcroft-Tarjan SPQR decomposition. For each
//! biconnected block with more than three nodes, it brute-force searches for
//! a 2-node separation pair whose removal disconnects the block, and reports
//! the resulting pieces as candidate triconnected components. Blocks of size
//! three or fewer, and blocks with no such pair, are reported as singletons.
//! Acceptable for the corpus sizes this runs against; a real SPQR tree is a
//! permitted future upgrade.

use crate::graph::BipartiteGraph;
use crate::ids::NodeId;
use std::collections::HashSet;

/// One candidate triconnected piece within a biconnected block.
pub struct TriconnectedPiece {
    /// Member nodes, sorted ascending. Includes both separation-pair nodes
    /// when `separation_pair` is `Some`.
    pub nodes: Vec<NodeId>,
    /// The 2-node cut this piece was split on, if any.
    pub separation_pair: Option<(NodeId, NodeId)>,
}

/// Splits `block_nodes` (assumed biconnected) into candidate triconnected pieces.
pub fn triconnected_pieces(graph: &BipartiteGraph, block_nodes: &[NodeId]) -> Vec<TriconnectedPiece> {
    if block_nodes.len() <= 3 {
        return vec![TriconnectedPiece { nodes: block_nodes.to_vec(), separation_pair: None }];
    }

    match find_separation_pair(graph, block_nodes) {
        Some((pair, pieces)) => pieces
            .into_iter()
            .map(|mut nodes| {
                if !nodes.contains(&pair.0) {
                    nodes.push(pair.0);
                }
                if !nodes.contains(&pair.1) {
                    nodes.push(pair.1);
                }
                nodes.sort_unstable();
                TriconnectedPiece { nodes, separation_pair: Some(pair) }
            })
            .collect(),
        None => vec![TriconnectedPiece { nodes: block_nodes.to_vec(), separation_pair: None }],
    }
}

fn find_separation_pair(
    graph: &BipartiteGraph,
    block_nodes: &[NodeId],
) -> Option<((NodeId, NodeId), Vec<Vec<NodeId>>)> {
    let block_set: HashSet<NodeId> = block_nodes.iter().copied().collect();
    for i in 0..block_nodes.len() {
        for j in (i + 1)..block_nodes.len() {
            let (a, b) = (block_nodes[i], block_nodes[j]);
            let remaining: Vec<NodeId> =
                block_nodes.iter().copied().filter(|&n| n != a && n != b).collect();
            if remaining.is_empty() {
                continue;
            }
            let pieces = pieces_excluding(graph, &block_set, &remaining, a, b);
            if pieces.len() >= 2 {
                let pair = if a < b { (a, b) } else { (b, a) };
                return Some((pair, pieces));
            }
        }
    }
    None
}

fn pieces_excluding(
    graph: &BipartiteGraph,
    block_set: &HashSet<NodeId>,
    remaining: &[NodeId],
    exclude_a: NodeId,
    exclude_b: NodeId,
) -> Vec<Vec<NodeId>> {
    let remaining_set: HashSet<NodeId> = remaining.iter().copied().collect();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut pieces = Vec::new();

    for &start in remaining {
        if visited.contains(&start) {
            continue;
        }
        let mut stack = vec![start];
        let mut piece = Vec::new();
        visited.insert(start);
        while let Some(node) = stack.pop() {
            piece.push(node);
            for &next in graph.neighbors(node) {
                if next == exclude_a || next == exclude_b {
                    continue;
                }
                if !block_set.contains(&next) || !remaining_set.contains(&next) {
                    continue;
                }
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        piece.sort_unstable();
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BipartiteGraphBuilder;

    const BASE: u64 = 100_000;

    #[test]
    fn small_block_is_a_singleton() {
        let graph = BipartiteGraphBuilder::new(BASE).finish().unwrap();
        let pieces = triconnected_pieces(&graph, &[0, 1, BASE]);
        assert_eq!(pieces.len(), 1);
        assert!(pieces[0].separation_pair.is_none());
    }

    #[test]
    fn k33_has_no_two_node_cut() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        for d in 0..3u64 {
            for g in 0..3u64 {
                builder.add_edge(d, BASE + g).unwrap();
            }
        }
        let graph = builder.finish().unwrap();
        let nodes: Vec<NodeId> = vec![0, 1, 2, BASE, BASE + 1, BASE + 2];
        let pieces = triconnected_pieces(&graph, &nodes);
        assert_eq!(pieces.len(), 1);
        assert!(pieces[0].separation_pair.is_none());
    }

    #[test]
    fn block_with_a_two_node_cut_is_split_into_consistent_pieces() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(0, BASE).unwrap();
        builder.add_edge(0, BASE + 1).unwrap();
        builder.add_edge(1, BASE).unwrap();
        builder.add_edge(1, BASE + 1).unwrap();
        builder.add_edge(1, BASE + 2).unwrap();
        builder.add_edge(2, BASE + 1).unwrap();
        builder.add_edge(2, BASE + 2).unwrap();
        let graph = builder.finish().unwrap();
        let nodes: Vec<NodeId> = vec![0, 1, 2, BASE, BASE + 1, BASE + 2];
        let pieces = triconnected_pieces(&graph, &nodes);
        assert!(pieces.len() >= 2);
        let pair = pieces[0].separation_pair.expect("a cut was found");
        for piece in &pieces {
            assert_eq!(piece.separation_pair, Some(pair));
            assert!(piece.nodes.contains(&pair.0));
            assert!(piece.nodes.contains(&pair.1));
        }
        let mut covered: Vec<NodeId> = pieces.iter().flat_map(|p| p.nodes.clone()).collect();
        covered.sort_unstable();
        covered.dedup();
        assert_eq!(covered, nodes);
    }
}
