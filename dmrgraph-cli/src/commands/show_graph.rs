use crate::adapters::read_rows_file;
use crate::output::{fmt_section, OutputConfig};
use anyhow::Result;
use dmrgraph::prelude::*;
use std::path::Path;
use tracing::warn;

/// Builds the bipartite graph for one timepoint directly (no cover, no
/// pipeline orchestration) and prints its node/edge counts.
pub fn show_graph(rows_path: &Path, timepoint: &str, dmr_offset: u64, out: &OutputConfig) -> Result<()> {
    let rows = read_rows_file(rows_path)?;

    let mut genes = GeneTable::new();
    for row in &rows {
        for symbol in row.nearby_gene.iter().chain(&row.enhancer_genes).chain(&row.promoter_genes) {
            genes.insert(Gene { symbol: symbol.clone(), description: None, source: None, promoter: None });
        }
    }
    genes.assign_ids(&IdSpace::new(dmrgraph::config::DEFAULT_GENE_ID_BASE, 0));

    let id_space = IdSpace::new(dmrgraph::config::DEFAULT_GENE_ID_BASE, dmr_offset);
    let mut builder = BipartiteGraphBuilder::new(dmrgraph::config::DEFAULT_GENE_ID_BASE);
    let mut skipped = 0usize;

    for row in &rows {
        let dmr_id = id_space.dmr_id(timepoint, row.dmr_number)?;
        builder.touch_node(dmr_id);
        for symbol in row.nearby_gene.iter().chain(&row.enhancer_genes).chain(&row.promoter_genes) {
            match genes.id_of(symbol) {
                Some(gene_id) => {
                    builder.add_edge(dmr_id, gene_id)?;
                }
                None => {
                    warn!(timepoint, symbol, "unresolved gene symbol; skipping relation");
                    skipped += 1;
                }
            }
        }
    }
    let graph = builder.finish()?;

    let mut text = format!("{}\n", fmt_section(&format!("Graph for {timepoint}")));
    text.push_str(&format!("DMR nodes: {}\n", graph.nodes_of_kind(NodeKind::Dmr).len()));
    text.push_str(&format!("Gene nodes: {}\n", graph.nodes_of_kind(NodeKind::Gene).len()));
    text.push_str(&format!("Edges: {}\n", graph.edge_count()));
    if skipped > 0 {
        text.push_str(&format!("Skipped relations (unresolved symbol): {skipped}\n"));
    }

    let json = serde_json::json!({
        "timepoint": timepoint,
        "dmr_nodes": graph.nodes_of_kind(NodeKind::Dmr).len(),
        "gene_nodes": graph.nodes_of_kind(NodeKind::Gene).len(),
        "edges": graph.edge_count(),
        "skipped_relations": skipped,
    });

    out.emit(&text, &json)
}
