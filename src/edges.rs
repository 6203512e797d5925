//! Edge reconciliation (spec.md §4.6): a typed, per-component port of
//! `edge_classification.py::classify_edges` / `validate_edge_classification`.

use crate::error::{PipelineError, Result};
use crate::graph::BipartiteGraph;
use crate::ids::{NodeId, NodeKind};
use std::collections::{BTreeSet, HashMap};

/// Where an original-graph edge's gene relation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum SourceTag {
    Nearby,
    Enhancer,
    Promoter,
    /// Only asserted by the biclique cover; absent from the original graph.
    CoverOnly,
}

/// Which of the three disjoint partitions (spec.md §4.6) an edge falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClassification {
    /// Present in both the original graph and the cover.
    Permanent,
    /// Present in the original graph only.
    FalsePositive,
    /// Present in the cover only.
    FalseNegative,
}

/// A single classified `(dmr, gene)` pair with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeInfo {
    pub dmr: NodeId,
    pub gene: NodeId,
    pub classification: EdgeClassification,
    pub source_tags: BTreeSet<SourceTag>,
}

/// Per-component reconciliation statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeClassificationStats {
    pub permanent: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    /// `permanent / (permanent + false_positive + false_negative)`.
    pub accuracy: f64,
    /// `false_negative / (permanent + false_negative)`.
    pub noise: f64,
    /// `false_positive / (permanent + false_positive)`.
    pub false_positive_rate: f64,
    /// `false_negative / (permanent + false_negative)`.
    pub false_negative_rate: f64,
}

/// Classifies every `(d, v)` pair with `d` a DMR in `component` and `v` a
/// gene in `component` against `orig` and `cover_edges`, checking the
/// invariants in spec.md §4.6.
///
/// `origins` maps an original-graph edge to the set of gene-relation tags it
/// carries (`NEARBY`/`ENHANCER`/`PROMOTER`); edges absent from `origins` but
/// present in `orig` are treated as having no recorded tag.
pub fn classify_component_edges(
    component_id: usize,
    component: &[NodeId],
    orig: &BipartiteGraph,
    cover_edges: &BTreeSet<(NodeId, NodeId)>,
    origins: &HashMap<(NodeId, NodeId), BTreeSet<SourceTag>>,
) -> Result<(Vec<EdgeInfo>, EdgeClassificationStats)> {
    let gene_id_base = orig.gene_id_base();
    let dmrs: Vec<NodeId> =
        component.iter().copied().filter(|&n| NodeKind::classify(n, gene_id_base) == NodeKind::Dmr).collect();
    let genes: Vec<NodeId> =
        component.iter().copied().filter(|&n| NodeKind::classify(n, gene_id_base) == NodeKind::Gene).collect();

    let mut edges = Vec::new();
    let mut permanent = 0usize;
    let mut false_positive = 0usize;
    let mut false_negative = 0usize;
    let mut original_edge_count = 0usize;
    let mut cover_edge_count = 0usize;

    for &dmr in &dmrs {
        for &gene in &genes {
            let in_original = orig.has_edge(dmr, gene);
            let in_cover = cover_edges.contains(&(dmr, gene));
            if !in_original && !in_cover {
                continue;
            }
            if in_original {
                original_edge_count += 1;
            }
            if in_cover {
                cover_edge_count += 1;
            }

            let (classification, tags) = if in_original && in_cover {
                permanent += 1;
                (EdgeClassification::Permanent, origins.get(&(dmr, gene)).cloned().unwrap_or_default())
            } else if in_original {
                false_positive += 1;
                (EdgeClassification::FalsePositive, origins.get(&(dmr, gene)).cloned().unwrap_or_default())
            } else {
                false_negative += 1;
                (EdgeClassification::FalseNegative, [SourceTag::CoverOnly].into_iter().collect())
            };

            edges.push(EdgeInfo { dmr, gene, classification, source_tags: tags });
        }
    }

    if permanent + false_positive != original_edge_count {
        return Err(PipelineError::InvalidInput {
            reason: format!("component {component_id}: permanent+false_positive does not equal |E_orig|"),
        });
    }
    if permanent + false_negative != cover_edge_count {
        return Err(PipelineError::InvalidInput {
            reason: format!("component {component_id}: permanent+false_negative does not equal |E_cover|"),
        });
    }
    if original_edge_count > 0 && permanent == 0 {
        return Err(PipelineError::DegenerateCover { component_id });
    }

    let total = permanent + false_positive + false_negative;
    let stats = EdgeClassificationStats {
        permanent,
        false_positive,
        false_negative,
        accuracy: if total == 0 { 0.0 } else { permanent as f64 / total as f64 },
        noise: if cover_edge_count == 0 { 0.0 } else { false_negative as f64 / cover_edge_count as f64 },
        false_positive_rate: if original_edge_count == 0 { 0.0 } else { false_positive as f64 / original_edge_count as f64 },
        false_negative_rate: if cover_edge_count == 0 { 0.0 } else { false_negative as f64 / cover_edge_count as f64 },
    };

    Ok((edges, stats))
}
