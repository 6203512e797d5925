//! Internal bipartite-graph wire format (spec.md §6), used for caching a
//! timepoint's graph between runs without round-tripping through the full
//! data source.
//!
//! Format: first line `<n_dmrs> <n_genes>`; second line the minimum gene
//! [`NodeId`] (the DMR/gene separator); then one `<dmr_sequential_index>
//! <gene_node_id>` line per edge. DMR ids are renumbered 0..n_dmrs-1 on
//! write and re-inflated on read using the caller-supplied timepoint offset.
//! Isolated genes (degree 0, no edge line) are not reconstructed by this
//! format alone; callers that need them intact rely on the global gene table.

use crate::error::{PipelineError, Result};
use crate::graph::{BipartiteGraph, BipartiteGraphBuilder};
use crate::ids::{NodeId, NodeKind};
use std::collections::HashMap;
use std::fmt::Write as _;

fn invalid(reason: impl Into<String>) -> PipelineError {
    PipelineError::InvalidInput { reason: reason.into() }
}

/// Serializes `graph` to the wire format described above.
pub fn write_graph(graph: &BipartiteGraph) -> String {
    let dmrs = graph.nodes_of_kind(NodeKind::Dmr);
    let genes = graph.nodes_of_kind(NodeKind::Gene);
    let dmr_index: HashMap<NodeId, u64> = dmrs.iter().enumerate().map(|(i, &d)| (d, i as u64)).collect();
    let separator = genes.iter().copied().min().unwrap_or_else(|| graph.gene_id_base());

    let mut out = String::new();
    let _ = writeln!(out, "{} {}", dmrs.len(), genes.len());
    let _ = writeln!(out, "{separator}");
    for (dmr, gene) in graph.edges() {
        let _ = writeln!(out, "{} {}", dmr_index[&dmr], gene);
    }
    out
}

/// Deserializes the wire format, re-inflating DMR ids against `dmr_offset`
/// and classifying nodes against `gene_id_base`.
pub fn read_graph(text: &str, dmr_offset: u64, gene_id_base: u64) -> Result<BipartiteGraph> {
    let mut lines = text.lines();

    let header = lines.next().ok_or_else(|| invalid("empty graph file"))?;
    let mut header_parts = header.split_whitespace();
    let n_dmrs: u64 = header_parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| invalid("malformed header: expected <n_dmrs> <n_genes>"))?;
    header_parts.next().ok_or_else(|| invalid("malformed header: missing n_genes"))?;

    lines
        .next()
        .ok_or_else(|| invalid("missing separator line"))?
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid("separator line is not an integer"))?;

    let mut builder = BipartiteGraphBuilder::new(gene_id_base);
    for i in 0..n_dmrs {
        builder.touch_node(dmr_offset + i);
    }

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let seq: u64 =
            tokens.next().and_then(|s| s.parse().ok()).ok_or_else(|| invalid("malformed edge line"))?;
        let gene_id: NodeId =
            tokens.next().and_then(|s| s.parse().ok()).ok_or_else(|| invalid("malformed edge line"))?;
        builder.add_edge(dmr_offset + seq, gene_id)?;
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u64 = 100_000;

    #[test]
    fn round_trip_preserves_edges_and_partition() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        for d in 0..3u64 {
            for g in 0..3u64 {
                builder.add_edge(d, BASE + g).unwrap();
            }
        }
        let graph = builder.finish().unwrap();
        let text = write_graph(&graph);
        let recovered = read_graph(&text, 0, BASE).unwrap();

        assert_eq!(recovered.edge_count(), graph.edge_count());
        assert_eq!(recovered.nodes_of_kind(NodeKind::Dmr), graph.nodes_of_kind(NodeKind::Dmr));
        assert_eq!(recovered.nodes_of_kind(NodeKind::Gene), graph.nodes_of_kind(NodeKind::Gene));
        for (dmr, gene) in graph.edges() {
            assert!(recovered.has_edge(dmr, gene));
        }
    }

    #[test]
    fn round_trip_respects_a_nonzero_dmr_offset() {
        let mut builder = BipartiteGraphBuilder::new(BASE);
        builder.add_edge(10_005, BASE).unwrap();
        let graph = builder.finish().unwrap();
        let text = write_graph(&graph);
        // Sequential index 0 re-inflates to dmr_offset + 0; supply the same offset used originally.
        let recovered = read_graph(&text, 10_005, BASE).unwrap();
        assert!(recovered.has_edge(10_005, BASE));
    }

    #[test]
    fn empty_graph_round_trips_to_empty() {
        let graph = BipartiteGraphBuilder::new(BASE).finish().unwrap();
        let text = write_graph(&graph);
        let recovered = read_graph(&text, 0, BASE).unwrap();
        assert_eq!(recovered.edge_count(), 0);
    }

    #[test]
    fn malformed_header_is_rejected() {
        assert!(read_graph("not a header\n0\n", 0, BASE).is_err());
    }
}
