//! Per-timepoint pipeline orchestrator (C8, spec.md §4.8): wires C1–C7
//! together against the [`DataSource`]/[`Persistence`] collaborators.

use crate::annotate::Annotation;
use crate::biclique::BicliqueStore;
use crate::collaborators::{
    AnnotationWrite, BicliqueWrite, ComponentWrite, DataSource, DmrRow, EdgeDetailWrite, Persistence,
};
use crate::config::Config;
use crate::decompose::{self, ComponentRecord, DecompositionKind, GraphKind};
use crate::dominate::{dominate, DominatingSetRecord};
use crate::edges::{classify_component_edges, SourceTag};
use crate::error::{PipelineError, Result};
use crate::gene::{Gene, GeneTable};
use crate::graph::{BipartiteGraph, BipartiteGraphBuilder};
use crate::ids::{IdSpace, NodeId, NodeKind};
use std::collections::{BTreeSet, HashMap};
use tracing::{instrument, warn};

/// Per-class warning counts accumulated while running one timepoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarningCounts {
    pub invalid_input: usize,
    pub missing_cover: usize,
    pub degenerate_cover: usize,
}

impl WarningCounts {
    fn total(&self) -> usize {
        self.invalid_input + self.missing_cover + self.degenerate_cover
    }
}

/// The outcome of running one timepoint through the pipeline (spec.md §7
/// "User-visible behavior").
#[derive(Debug, Clone, PartialEq)]
pub enum TimepointOutcome {
    Succeeded,
    SucceededWithWarnings { warning_counts: WarningCounts },
    Failed { reason: PipelineError, timepoint: String, component_id: Option<usize> },
}

fn component_kind_name(kind: DecompositionKind) -> &'static str {
    match kind {
        DecompositionKind::Connected => "CONNECTED",
        DecompositionKind::Biconnected => "BICONNECTED",
        DecompositionKind::Triconnected => "TRICONNECTED",
    }
}

fn graph_type_name(kind: GraphKind) -> &'static str {
    match kind {
        GraphKind::Original => "ORIGINAL",
        GraphKind::Split => "SPLIT",
    }
}

fn category_name(category: crate::decompose::ComponentCategory) -> &'static str {
    use crate::decompose::ComponentCategory::*;
    match category {
        SingleNode => "SINGLE_NODE",
        Simple => "SIMPLE",
        Interesting => "INTERESTING",
        Complex => "COMPLEX",
    }
}

fn biclique_category_name(category: crate::biclique::BicliqueCategory) -> &'static str {
    use crate::biclique::BicliqueCategory::*;
    match category {
        Empty => "EMPTY",
        Trivial => "TRIVIAL",
        Simple => "SIMPLE",
        Interesting => "INTERESTING",
    }
}

/// Assembled, pre-persistence state for one timepoint's run. Building this
/// struct is pure compute; nothing is written to `Persistence` until every
/// step below has succeeded, so a fatal error partway through never leaves a
/// partial write behind.
struct TimepointComputation {
    orig: BipartiteGraph,
    split: BipartiteGraph,
    store: BicliqueStore,
    has_cover: bool,
    orig_records: Vec<ComponentRecord>,
    split_records: Vec<ComponentRecord>,
    dominating_set: Vec<DominatingSetRecord>,
    edge_details: Vec<(usize, EdgeDetailWrite)>,
    degenerate_components: BTreeSet<usize>,
    warnings: WarningCounts,
}

/// Drives the eight-step per-timepoint flow in spec.md §4.8.
pub struct Pipeline<'a> {
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Runs one timepoint end to end: fetch rows, build C1–C2, optionally
    /// load C3, run C4–C7, and persist the results.
    #[instrument(skip(self, genes, data_source, persistence), fields(timepoint = %timepoint))]
    pub fn run_timepoint(
        &self,
        timepoint: &str,
        genes: &mut GeneTable,
        data_source: &dyn DataSource,
        persistence: &mut dyn Persistence,
    ) -> TimepointOutcome {
        let rows = match data_source.rows(timepoint) {
            Ok(rows) => rows,
            Err(reason) => return TimepointOutcome::Failed { reason, timepoint: timepoint.to_string(), component_id: None },
        };

        self.register_gene_symbols(genes, &rows);

        let offset = self.config.offset_for(timepoint);
        let id_space = IdSpace::new(self.config.gene_id_base, offset);

        let computation = match self.compute(timepoint, &id_space, genes, &rows, data_source) {
            Ok(computation) => computation,
            Err(reason) => return TimepointOutcome::Failed { reason, timepoint: timepoint.to_string(), component_id: None },
        };

        if let Err(reason) = self.persist(timepoint, &id_space, persistence, &computation) {
            return TimepointOutcome::Failed { reason, timepoint: timepoint.to_string(), component_id: None };
        }

        if computation.warnings.total() == 0 {
            TimepointOutcome::Succeeded
        } else {
            TimepointOutcome::SucceededWithWarnings { warning_counts: computation.warnings }
        }
    }

    /// Step 2 (partial): inserts every gene symbol referenced by `rows` into
    /// the shared table and re-freezes the id assignment. Genes are
    /// append-only across timepoints (spec.md §4.8).
    fn register_gene_symbols(&self, genes: &mut GeneTable, rows: &[DmrRow]) {
        for row in rows {
            for symbol in row.nearby_gene.iter().chain(&row.enhancer_genes).chain(&row.promoter_genes) {
                genes.insert(Gene { symbol: symbol.clone(), description: None, source: None, promoter: None });
            }
        }
        genes.assign_ids(&IdSpace::new(self.config.gene_id_base, 0));
    }

    /// Steps 1–8 except persistence: pure compute over in-memory structures.
    fn compute(
        &self,
        timepoint: &str,
        id_space: &IdSpace,
        genes: &GeneTable,
        rows: &[DmrRow],
        data_source: &dyn DataSource,
    ) -> Result<TimepointComputation> {
        let mut warnings = WarningCounts::default();

        // Step 3: build G_orig.
        let (orig, origins, area) = self.build_graph(timepoint, id_space, genes, rows, &mut warnings)?;

        // Step 4: load the cover, if one exists; downgrade otherwise.
        let cover_text = data_source.cover_text(timepoint)?;
        let has_cover = cover_text.is_some();
        let mut store = match cover_text {
            Some(text) => BicliqueStore::parse(&text, self.config.gene_id_base, genes),
            None => {
                warn!(timepoint, "no biclique cover; downgrading to graph + annotation only");
                warnings.missing_cover += 1;
                BicliqueStore::parse("# Clusters\n", self.config.gene_id_base, genes)
            }
        };
        if has_cover && self.config.validate_cover_against_graph {
            store.validate_against(&orig);
        }

        // Step 5: build G_split, run C4 on both graphs.
        let split = decompose::build_split_graph(&orig, &store)?;
        let orig_records = decompose::decompose(&orig, GraphKind::Original, &store, self.config.triconnected_enabled);
        let split_records = decompose::decompose(&split, GraphKind::Split, &store, self.config.triconnected_enabled);

        // Step 6: run C5 on G_orig (skipped entirely when there is no cover).
        let dominating_set = if has_cover { dominate(&orig, &area) } else { Vec::new() };

        // Step 7: for each connected component of the split graph, run C6
        // (also skipped when there is no cover — see MissingCover downgrade).
        let mut edge_details = Vec::new();
        let mut degenerate_components = BTreeSet::new();
        if has_cover {
            let cover_edges = store.cover_edges();
            for (component_id, record) in
                split_records.iter().filter(|r| r.decomposition_kind == DecompositionKind::Connected).enumerate()
            {
                match classify_component_edges(component_id, &record.nodes, &orig, &cover_edges, &origins) {
                    Ok((infos, _stats)) => {
                        for info in infos {
                            edge_details.push((
                                component_id,
                                EdgeDetailWrite {
                                    dmr_id: info.dmr,
                                    gene_id: info.gene,
                                    edge_type: info.classification,
                                    source_tags: info.source_tags,
                                },
                            ));
                        }
                    }
                    Err(PipelineError::DegenerateCover { component_id }) => {
                        warn!(timepoint, component_id, "degenerate cover; excluding component from annotation");
                        warnings.degenerate_cover += 1;
                        degenerate_components.insert(component_id);
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        Ok(TimepointComputation {
            orig,
            split,
            store,
            has_cover,
            orig_records,
            split_records,
            dominating_set,
            edge_details,
            degenerate_components,
            warnings,
        })
    }

    /// Step 3 plus the gene-relation edges that feed `EdgeClassifier`'s
    /// provenance tags (spec.md §4.2, §4.6).
    fn build_graph(
        &self,
        timepoint: &str,
        id_space: &IdSpace,
        genes: &GeneTable,
        rows: &[DmrRow],
        warnings: &mut WarningCounts,
    ) -> Result<(BipartiteGraph, HashMap<(NodeId, NodeId), BTreeSet<SourceTag>>, HashMap<NodeId, f64>)> {
        let mut builder = BipartiteGraphBuilder::new(self.config.gene_id_base);
        let mut origins: HashMap<(NodeId, NodeId), BTreeSet<SourceTag>> = HashMap::new();
        let mut area = HashMap::new();

        for row in rows {
            let dmr_id = id_space.dmr_id(timepoint, row.dmr_number)?;
            builder.touch_node(dmr_id);
            if let Some(area_stat) = row.area_stat {
                area.insert(dmr_id, area_stat);
            }

            let relations: Vec<(&str, SourceTag)> = row
                .nearby_gene
                .iter()
                .map(|symbol| (symbol.as_str(), SourceTag::Nearby))
                .chain(row.enhancer_genes.iter().map(|symbol| (symbol.as_str(), SourceTag::Enhancer)))
                .chain(row.promoter_genes.iter().map(|symbol| (symbol.as_str(), SourceTag::Promoter)))
                .collect();

            for (symbol, tag) in relations {
                match genes.id_of(symbol) {
                    Some(gene_id) => {
                        builder.add_edge(dmr_id, gene_id)?;
                        let key = if dmr_id < gene_id { (dmr_id, gene_id) } else { (gene_id, dmr_id) };
                        origins.entry(key).or_default().insert(tag);
                    }
                    None => {
                        warn!(timepoint, dmr_id, symbol, "unresolved gene symbol; skipping relation");
                        warnings.invalid_input += 1;
                    }
                }
            }
        }

        Ok((builder.finish()?, origins, area))
    }

    /// Step 8 plus writing every computed artifact through `Persistence`,
    /// scoped by a `replace_for_timepoint` call so a re-run is idempotent.
    fn persist(
        &self,
        timepoint: &str,
        id_space: &IdSpace,
        persistence: &mut dyn Persistence,
        computation: &TimepointComputation,
    ) -> Result<()> {
        let timepoint_id = persistence.upsert_timepoint(timepoint, self.config.offset_for(timepoint))?;
        persistence.replace_for_timepoint(timepoint_id)?;

        for &dmr in computation.orig.nodes_of_kind(NodeKind::Dmr) {
            let dmr_number = dmr - id_space.dmr_id(timepoint, 0).unwrap_or(dmr);
            persistence.insert_dmr(timepoint_id, dmr_number, None)?;
        }

        // Persist every biclique once, keyed by its index in the store, and
        // remember the persisted id so components can link to it.
        let mut persisted_biclique_ids: HashMap<usize, usize> = HashMap::new();
        // Same enumeration order as `compute`'s edge-classification loop: the
        // index is among connected split components only, so these ids line
        // up with `computation.degenerate_components`.
        let component_of_node = |records: &[ComponentRecord], node: NodeId| -> Option<usize> {
            records
                .iter()
                .filter(|r| r.decomposition_kind == DecompositionKind::Connected)
                .enumerate()
                .find(|(_, r)| r.nodes.binary_search(&node).is_ok())
                .map(|(i, _)| i)
        };

        for (graph_kind, records) in
            [(GraphKind::Original, &computation.orig_records), (GraphKind::Split, &computation.split_records)]
        {
            for record in records {
                let write = ComponentWrite {
                    graph_type: graph_type_name(graph_kind),
                    kind: component_kind_name(record.decomposition_kind),
                    category: category_name(record.category),
                    size: record.nodes.len(),
                    dmr_count: record.dmr_count,
                    gene_count: record.gene_count,
                    edge_count: record.edge_count,
                    density: record.density,
                    nodes: record.nodes.clone(),
                };
                let persisted_component_id = persistence.insert_component(timepoint_id, write)?;

                if graph_kind == GraphKind::Split && record.decomposition_kind == DecompositionKind::Connected {
                    for &biclique_id in &record.biclique_ids {
                        let persisted_biclique_id = match persisted_biclique_ids.get(&biclique_id) {
                            Some(&id) => id,
                            None => {
                                let biclique = &computation.store.bicliques()[biclique_id];
                                let category =
                                    crate::biclique::classify_biclique(&biclique.dmrs, &biclique.genes);
                                let write = BicliqueWrite {
                                    component_index: persisted_component_id,
                                    dmr_ids: biclique.dmrs.iter().copied().collect(),
                                    gene_ids: biclique.genes.iter().copied().collect(),
                                    category: biclique_category_name(category),
                                };
                                let id = persistence.insert_biclique(timepoint_id, write)?;
                                persisted_biclique_ids.insert(biclique_id, id);
                                id
                            }
                        };
                        persistence.link_component_biclique(timepoint_id, persisted_component_id, persisted_biclique_id)?;
                    }
                }
            }
        }

        persistence.store_dominating_set(timepoint_id, computation.dominating_set.clone())?;

        for (component_id, detail) in &computation.edge_details {
            if computation.degenerate_components.contains(component_id) {
                continue;
            }
            persistence.insert_edge_details(timepoint_id, detail.clone())?;
        }

        // Step 8: annotate every node touched by this timepoint's graph.
        let hubs: BTreeSet<NodeId> = computation.dominating_set.iter().map(|r| r.dmr).collect();
        for kind in [NodeKind::Dmr, NodeKind::Gene] {
            for &node in computation.orig.nodes_of_kind(kind) {
                let excluded = component_of_node(&computation.split_records, node)
                    .map(|idx| computation.degenerate_components.contains(&idx))
                    .unwrap_or(false);
                if excluded {
                    continue;
                }

                let component_id = component_of_node(&computation.split_records, node);
                let triconnected_id = computation
                    .split_records
                    .iter()
                    .filter(|r| r.decomposition_kind == DecompositionKind::Triconnected)
                    .enumerate()
                    .find(|(_, r)| r.nodes.binary_search(&node).is_ok())
                    .map(|(i, _)| i);
                let degree = computation.split.degree(node);
                let is_hub = kind == NodeKind::Dmr && hubs.contains(&node);
                let biclique_ids: BTreeSet<usize> = computation.store.bicliques_of(node).iter().copied().collect();

                let annotation = Annotation::compute(node, component_id, triconnected_id, degree, is_hub, biclique_ids);
                persistence.upsert_annotation(
                    timepoint_id,
                    AnnotationWrite {
                        node: annotation.node,
                        component_id: annotation.component_id,
                        role: annotation.node_role,
                        degree: annotation.degree,
                        is_isolate: annotation.is_isolate,
                        biclique_ids: annotation.biclique_ids,
                    },
                )?;
            }
        }

        Ok(())
    }
}
