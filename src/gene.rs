//! Global, case-folded gene table.
//!
//! Genes are shared across timepoints and keyed by case-folded symbol. The
//! table is append-only: once a symbol has a [`crate::ids::NodeId`], that
//! mapping never changes, matching the "genes are preserved" re-run contract
//! in spec.md §4.8.

use crate::ids::{IdSpace, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A regulatory gene, keyed by its case-folded symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    /// Display symbol as supplied by the data source (case preserved).
    pub symbol: String,
    /// Free-text description, if any.
    pub description: Option<String>,
    /// Tag describing where the interaction claim came from (e.g. an enhancer
    /// database name).
    pub source: Option<String>,
    /// Promoter-interaction annotation, if any.
    pub promoter: Option<String>,
}

/// Returns the case-folded form of `symbol`, using Unicode simple lowercase
/// folding as mandated by spec.md §9.
pub fn fold(symbol: &str) -> String {
    symbol.to_lowercase()
}

/// Returns `true` if `symbol` must be rejected at ingestion (spec.md §3):
/// an `Unnamed: N`-style pandas column label, `nan`, `n/a`, `.`, or empty.
pub fn is_rejected_symbol(symbol: &str) -> bool {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return true;
    }
    let folded = fold(trimmed);
    folded.starts_with("unnamed:") || folded.starts_with("unnamed-") || matches!(folded.as_str(), "nan" | "n/a" | ".")
}

/// Global gene registry: assigns a stable [`NodeId`] to every accepted,
/// case-folded gene symbol and stores the matching [`Gene`] record.
///
/// Id assignment is append-only: once [`GeneTable::assign_ids`] has given a
/// symbol an id, that id never changes, even if a later call introduces new
/// symbols that would otherwise sort earlier. Within one call, newly
/// unassigned symbols receive the next ids in case-folded, lexicographically
/// sorted order among themselves, so the mapping is deterministic given the
/// same sequence of insert/assign batches.
#[derive(Debug, Clone, Default)]
pub struct GeneTable {
    by_fold: BTreeMap<String, Gene>,
    ids: BTreeMap<String, NodeId>,
    built: bool,
}

impl GeneTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates a gene record, keyed by its case-folded symbol.
    ///
    /// Rejected symbols (see [`is_rejected_symbol`]) are silently ignored;
    /// the caller is expected to have logged an `InvalidInput` warning
    /// before calling this. Returns `false` if the symbol was rejected.
    ///
    /// Inserting after [`GeneTable::assign_ids`] has run is allowed — a
    /// later timepoint may introduce new symbols — but leaves the id
    /// mapping stale until `assign_ids` is called again.
    pub fn insert(&mut self, gene: Gene) -> bool {
        if is_rejected_symbol(&gene.symbol) {
            return false;
        }
        let key = fold(&gene.symbol);
        self.by_fold
            .entry(key)
            .and_modify(|existing| {
                if gene.description.is_some() {
                    existing.description = gene.description.clone();
                }
                if gene.source.is_some() {
                    existing.source = gene.source.clone();
                }
                if gene.promoter.is_some() {
                    existing.promoter = gene.promoter.clone();
                }
            })
            .or_insert(gene);
        true
    }

    /// Assigns ids to every symbol that doesn't already have one, via `id_space`.
    ///
    /// Append-only: a symbol that already has an id keeps it forever, matching
    /// the "master gene ids never move" contract a multi-timepoint run relies
    /// on. Calling this again after more symbols were inserted assigns the new
    /// symbols the next ids in the case-folded, lexicographically sorted order
    /// among themselves, without disturbing any id assigned by an earlier call.
    pub fn assign_ids(&mut self, id_space: &IdSpace) {
        let mut next_index = self.ids.len();
        for key in self.by_fold.keys() {
            if !self.ids.contains_key(key) {
                self.ids.insert(key.clone(), id_space.gene_id(next_index));
                next_index += 1;
            }
        }
        self.built = true;
    }

    /// Looks up the [`NodeId`] for a (possibly differently-cased) symbol.
    pub fn id_of(&self, symbol: &str) -> Option<NodeId> {
        self.ids.get(&fold(symbol)).copied()
    }

    /// Looks up the stored [`Gene`] record for a symbol.
    pub fn get(&self, symbol: &str) -> Option<&Gene> {
        self.by_fold.get(&fold(symbol))
    }

    /// Number of distinct genes currently registered.
    pub fn len(&self) -> usize {
        self.by_fold.len()
    }

    /// Returns `true` if no genes are registered.
    pub fn is_empty(&self) -> bool {
        self.by_fold.is_empty()
    }

    /// Returns `true` if [`GeneTable::assign_ids`] has run at least once.
    pub fn is_built(&self) -> bool {
        self.built
    }
}
