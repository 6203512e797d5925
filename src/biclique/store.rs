//! Biclique-cover file parsing, validation against a [`BipartiteGraph`], and
//! the node<->biclique membership index (spec.md §4.3, §6).

use crate::gene::GeneTable;
use crate::graph::BipartiteGraph;
use crate::ids::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Recognized header keys in a biclique-cover file, terminated by `# Clusters`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverHeader {
    /// `- Nb operations: N`
    pub nb_operations: Option<u64>,
    /// `- Nb splits: N`
    pub nb_splits: Option<u64>,
    /// `- Nb deletions: N`
    pub nb_deletions: Option<u64>,
    /// `- Nb additions: N`
    pub nb_additions: Option<u64>,
}

/// A biclique cover entry: disjoint-subset claim over DMRs and genes.
///
/// Completeness is asserted, not verified, at parse time: the cover claims
/// every `(d, v)` pair with `d` in `dmrs` and `v` in `genes` is an edge. See
/// [`BicliqueStore::missing_pairs`] for the count of claimed pairs the
/// original graph does not actually contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biclique {
    /// DMR side of the biclique.
    pub dmrs: BTreeSet<NodeId>,
    /// Gene side of the biclique.
    pub genes: BTreeSet<NodeId>,
}

/// A non-fatal condition encountered while parsing a cover file.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    /// A gene-symbol token did not resolve against the gene table.
    UnresolvedSymbol { line: usize, token: String },
    /// A biclique line resolved to an empty DMR or gene side and was dropped.
    EmptyBiclique { line: usize },
    /// A header line outside the recognized `- key: value` shape.
    UnrecognizedHeaderLine { line: usize, text: String },
}

/// Parsed, indexed biclique cover for one timepoint.
///
/// The biclique vector is append-only (index = biclique id); there is no
/// removal API. `node_to_bicliques` is built in a single pass after parsing
/// and is always ascending and duplicate-free per biclique id, satisfying
/// spec.md §8 invariant 3.
#[derive(Debug, Clone, Default)]
pub struct BicliqueStore {
    header: CoverHeader,
    bicliques: Vec<Biclique>,
    node_to_bicliques: HashMap<NodeId, Vec<usize>>,
    warnings: Vec<ParseWarning>,
    missing_pairs: BTreeMap<usize, usize>,
}

impl BicliqueStore {
    /// Parses a biclique-cover file (spec.md §6) against `max_dmr_id` and `genes`.
    ///
    /// A token parses as a DMR id if it is a non-negative integer strictly
    /// less than `max_dmr_id`; otherwise its case-folded form is looked up in
    /// `genes`. Unresolved symbols and empty-sided bicliques are dropped with
    /// a [`ParseWarning`], never a fatal error — this module implements only
    /// the token-based dialect; there is no second "number" dialect (spec.md §9).
    pub fn parse(text: &str, max_dmr_id: NodeId, genes: &GeneTable) -> Self {
        let mut store = BicliqueStore::default();
        let mut lines = text.lines().enumerate();
        let mut in_header = true;

        for (idx, raw_line) in &mut lines {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "# Clusters" {
                in_header = false;
                break;
            }
            if let Some(rest) = line.strip_prefix("- ") {
                if let Some((key, value)) = rest.split_once(':') {
                    let key = key.trim();
                    let value = value.trim().parse::<u64>().ok();
                    match (key, value) {
                        ("Nb operations", Some(v)) => store.header.nb_operations = Some(v),
                        ("Nb splits", Some(v)) => store.header.nb_splits = Some(v),
                        ("Nb deletions", Some(v)) => store.header.nb_deletions = Some(v),
                        ("Nb additions", Some(v)) => store.header.nb_additions = Some(v),
                        _ => store
                            .warnings
                            .push(ParseWarning::UnrecognizedHeaderLine { line: idx + 1, text: line.to_string() }),
                    }
                } else {
                    store
                        .warnings
                        .push(ParseWarning::UnrecognizedHeaderLine { line: idx + 1, text: line.to_string() });
                }
            } else {
                store
                    .warnings
                    .push(ParseWarning::UnrecognizedHeaderLine { line: idx + 1, text: line.to_string() });
            }
        }
        // If no `# Clusters` line was seen, every non-blank line was (mis)treated
        // as header; `in_header` stays true and there is nothing left to parse
        // as cluster body. This matches "optional header block" semantics.
        if in_header {
            store.index();
            return store;
        }

        for (idx, raw_line) in lines {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let mut dmrs = BTreeSet::new();
            let mut genes_side = BTreeSet::new();
            for token in line.split_whitespace() {
                if let Ok(value) = token.parse::<u64>() {
                    if value < max_dmr_id {
                        dmrs.insert(value);
                        continue;
                    }
                }
                match genes.id_of(token) {
                    Some(gene_id) => {
                        genes_side.insert(gene_id);
                    }
                    None => store.warnings.push(ParseWarning::UnresolvedSymbol {
                        line: idx + 1,
                        token: token.to_string(),
                    }),
                }
            }
            if dmrs.is_empty() || genes_side.is_empty() {
                store.warnings.push(ParseWarning::EmptyBiclique { line: idx + 1 });
                continue;
            }
            store.bicliques.push(Biclique { dmrs, genes: genes_side });
        }

        store.index();
        store
    }

    fn index(&mut self) {
        self.node_to_bicliques.clear();
        for (id, biclique) in self.bicliques.iter().enumerate() {
            for &dmr in &biclique.dmrs {
                self.node_to_bicliques.entry(dmr).or_default().push(id);
            }
            for &gene in &biclique.genes {
                self.node_to_bicliques.entry(gene).or_default().push(id);
            }
        }
        for ids in self.node_to_bicliques.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
    }

    /// Checks every claimed `(d, v)` pair in each biclique against `graph`,
    /// recording the count of claimed-but-missing pairs per biclique id.
    /// This seeds [`crate::edges::EdgeClassifier`]'s false-negative enumeration.
    pub fn validate_against(&mut self, graph: &BipartiteGraph) {
        self.missing_pairs.clear();
        for (id, biclique) in self.bicliques.iter().enumerate() {
            let mut missing = 0usize;
            for &d in &biclique.dmrs {
                for &v in &biclique.genes {
                    if !graph.has_edge(d, v) {
                        missing += 1;
                    }
                }
            }
            if missing > 0 {
                self.missing_pairs.insert(id, missing);
            }
        }
    }

    /// Parsed header block, if present.
    pub fn header(&self) -> &CoverHeader {
        &self.header
    }

    /// All bicliques, indexed by id (vector position).
    pub fn bicliques(&self) -> &[Biclique] {
        &self.bicliques
    }

    /// Biclique ids containing `node`, ascending and duplicate-free.
    pub fn bicliques_of(&self, node: NodeId) -> &[usize] {
        self.node_to_bicliques.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-fatal parse warnings accumulated while reading the file.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Count of claimed-but-missing `(d, v)` pairs for a biclique id, if any.
    pub fn missing_pairs(&self, biclique_id: usize) -> usize {
        self.missing_pairs.get(&biclique_id).copied().unwrap_or(0)
    }

    /// Builds a store directly from a biclique list, bypassing file parsing.
    #[cfg(test)]
    pub(crate) fn for_test(bicliques: Vec<Biclique>) -> Self {
        let mut store = BicliqueStore { bicliques, ..Default::default() };
        store.index();
        store
    }

    /// Union of every `(dmr, gene)` pair claimed by any biclique in the cover.
    pub fn cover_edges(&self) -> BTreeSet<(NodeId, NodeId)> {
        let mut edges = BTreeSet::new();
        for biclique in &self.bicliques {
            for &d in &biclique.dmrs {
                for &v in &biclique.genes {
                    edges.insert((d, v));
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::Gene;

    fn genes_table() -> GeneTable {
        let mut table = GeneTable::new();
        for symbol in ["Actb", "Zeb1", "Brca1"] {
            table.insert(Gene {
                symbol: symbol.to_string(),
                description: None,
                source: None,
                promoter: None,
            });
        }
        table.assign_ids(&crate::ids::IdSpace::new(100_000, 0));
        table
    }

    #[test]
    fn parses_header_and_one_cluster_line() {
        let genes = genes_table();
        let text = "- Nb operations: 4\n- Nb splits: 1\n# Clusters\n0 1 2 actb zeb1 brca1\n";
        let store = BicliqueStore::parse(text, 10, &genes);
        assert_eq!(store.header().nb_operations, Some(4));
        assert_eq!(store.bicliques().len(), 1);
        assert_eq!(store.bicliques()[0].dmrs.len(), 3);
        assert_eq!(store.bicliques()[0].genes.len(), 3);
        assert!(store.warnings().is_empty());
    }

    #[test]
    fn unresolved_symbol_is_dropped_with_warning() {
        let genes = genes_table();
        let text = "# Clusters\n0 1 nosuchgene actb\n";
        let store = BicliqueStore::parse(text, 10, &genes);
        assert_eq!(store.bicliques().len(), 1);
        assert_eq!(store.bicliques()[0].genes.len(), 1);
        assert!(matches!(store.warnings()[0], ParseWarning::UnresolvedSymbol { .. }));
    }

    #[test]
    fn empty_sided_biclique_is_dropped() {
        let genes = genes_table();
        let text = "# Clusters\n0 1 2\n";
        let store = BicliqueStore::parse(text, 10, &genes);
        assert!(store.bicliques().is_empty());
        assert!(matches!(store.warnings()[0], ParseWarning::EmptyBiclique { .. }));
    }

    #[test]
    fn node_biclique_map_is_ascending_and_deduplicated() {
        let genes = genes_table();
        let text = "# Clusters\n0 1 actb\n0 2 zeb1\n";
        let store = BicliqueStore::parse(text, 10, &genes);
        let ids = store.bicliques_of(0);
        assert_eq!(ids, &[0, 1]);
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted.as_slice());
    }

    #[test]
    fn validate_against_counts_missing_pairs() {
        use crate::graph::BipartiteGraphBuilder;
        let genes = genes_table();
        let actb = genes.id_of("actb").unwrap();
        let zeb1 = genes.id_of("zeb1").unwrap();
        let text = format!("# Clusters\n0 actb zeb1\n");
        let mut store = BicliqueStore::parse(&text, 10, &genes);

        let mut builder = BipartiteGraphBuilder::new(100_000);
        builder.add_edge(0, actb).unwrap();
        // zeb1 edge intentionally missing from the original graph.
        let graph = builder.finish().unwrap();

        store.validate_against(&graph);
        assert_eq!(store.missing_pairs(0), 1);
    }

    #[test]
    fn number_only_dialect_without_cluster_marker_yields_no_bicliques() {
        let genes = genes_table();
        // No `# Clusters` marker: everything is treated as an (unrecognized) header.
        let text = "0 1 2 actb\n";
        let store = BicliqueStore::parse(text, 10, &genes);
        assert!(store.bicliques().is_empty());
    }
}
