//! External collaborator contracts (spec.md §6): the core never touches a
//! spreadsheet, a database, or a network socket directly. Callers supply
//! implementations of these two traits.

use crate::edges::{EdgeClassification, SourceTag};
use crate::error::Result;
use crate::ids::NodeId;
use crate::annotate::NodeRole;
use std::collections::BTreeSet;

/// One raw row describing a DMR and its candidate gene relations, as
/// produced by whatever spreadsheet or database a caller reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct DmrRow {
    pub dmr_number: u64,
    pub area_stat: Option<f64>,
    pub nearby_gene: Option<String>,
    pub enhancer_genes: Vec<String>,
    pub promoter_genes: Vec<String>,
    pub chr: Option<String>,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// Supplies raw per-timepoint rows. The core never parses spreadsheets
/// itself; this is the one read-side boundary it depends on.
pub trait DataSource {
    /// Returns every DMR row for `timepoint`, in any order.
    fn rows(&self, timepoint: &str) -> Result<Vec<DmrRow>>;

    /// Returns the raw biclique-cover file text for `timepoint`, if one exists.
    fn cover_text(&self, timepoint: &str) -> Result<Option<String>>;
}

/// A component record ready for persistence (spec.md §6 `insert_component`).
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentWrite {
    pub graph_type: &'static str,
    pub kind: &'static str,
    pub category: &'static str,
    pub size: usize,
    pub dmr_count: usize,
    pub gene_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub nodes: Vec<NodeId>,
}

/// A biclique record ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct BicliqueWrite {
    pub component_index: usize,
    pub dmr_ids: Vec<NodeId>,
    pub gene_ids: Vec<NodeId>,
    pub category: &'static str,
}

/// An edge classification record ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDetailWrite {
    pub dmr_id: NodeId,
    pub gene_id: NodeId,
    pub edge_type: EdgeClassification,
    pub source_tags: BTreeSet<SourceTag>,
}

/// An annotation upsert payload for either a DMR or a gene node.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationWrite {
    pub node: NodeId,
    pub component_id: Option<usize>,
    pub role: NodeRole,
    pub degree: usize,
    pub is_isolate: bool,
    pub biclique_ids: BTreeSet<usize>,
}

/// The persistence boundary (spec.md §6). Every method is the typed
/// equivalent of the named bullet in the persistence collaborator contract.
/// Re-running a timepoint is expected to call `replace_for_timepoint` first,
/// and every method downstream of it to be idempotent given identical inputs.
pub trait Persistence {
    fn upsert_timepoint(&mut self, name: &str, offset: u64) -> Result<u64>;
    fn insert_gene(&mut self, symbol: &str, description: Option<&str>) -> Result<NodeId>;
    fn insert_dmr(&mut self, timepoint_id: u64, dmr_number: u64, area_stat: Option<f64>) -> Result<NodeId>;
    fn insert_component(&mut self, timepoint_id: u64, component: ComponentWrite) -> Result<usize>;
    fn insert_biclique(&mut self, timepoint_id: u64, biclique: BicliqueWrite) -> Result<usize>;
    fn link_component_biclique(&mut self, timepoint_id: u64, component_id: usize, biclique_id: usize) -> Result<()>;
    fn upsert_annotation(&mut self, timepoint_id: u64, annotation: AnnotationWrite) -> Result<()>;
    fn insert_edge_details(&mut self, timepoint_id: u64, detail: EdgeDetailWrite) -> Result<()>;
    fn store_dominating_set(
        &mut self,
        timepoint_id: u64,
        records: Vec<crate::dominate::DominatingSetRecord>,
    ) -> Result<()>;
    /// Atomically clears every previously persisted record for `timepoint_id`;
    /// called at the start of a re-run before any other write.
    fn replace_for_timepoint(&mut self, timepoint_id: u64) -> Result<()>;
}
