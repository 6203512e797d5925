//! Configuration for the DMR/gene bipartite analysis pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default boundary between DMR ids and gene ids; see [`crate::ids`].
pub const DEFAULT_GENE_ID_BASE: u64 = 100_000;

/// Width of each timepoint's reserved DMR id window.
pub const DMR_WINDOW_SIZE: u64 = 10_000;

/// Run-wide configuration, supplied by the caller and never mutated by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// First gene NodeId; all values below this are DMR ids.
    pub gene_id_base: u64,
    /// Per-timepoint DMR id offset, keyed by timepoint name.
    pub timepoint_offsets: BTreeMap<String, u64>,
    /// Format string for locating a timepoint's biclique cover file, with one
    /// placeholder (`{timepoint}`) for the timepoint name.
    pub biclique_file_pattern: String,
    /// Whether to run irredundancy minimization after the greedy dominating-set pass.
    pub minimize_dominating_set: bool,
    /// Whether to compute the triconnected-component layer.
    pub triconnected_enabled: bool,
    /// Whether to validate every claimed biclique pair against the original graph.
    pub validate_cover_against_graph: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gene_id_base: DEFAULT_GENE_ID_BASE,
            timepoint_offsets: BTreeMap::new(),
            biclique_file_pattern: "{timepoint}_bicliques.txt".to_string(),
            minimize_dominating_set: true,
            triconnected_enabled: true,
            validate_cover_against_graph: true,
        }
    }
}

impl Config {
    /// Returns the DMR id offset reserved for `timepoint`.
    ///
    /// Timepoints without an explicit entry are treated as the baseline
    /// (offset 0); callers that register more than one unlisted timepoint
    /// are responsible for assigning disjoint offsets themselves.
    pub fn offset_for(&self, timepoint: &str) -> u64 {
        self.timepoint_offsets.get(timepoint).copied().unwrap_or(0)
    }

    /// Renders the biclique cover file name for `timepoint`.
    pub fn biclique_file_name(&self, timepoint: &str) -> String {
        self.biclique_file_pattern.replace("{timepoint}", timepoint)
    }

    #[cfg(test)]
    pub(crate) fn with_offset(mut self, timepoint: &str, offset: u64) -> Self {
        self.timepoint_offsets.insert(timepoint.to_string(), offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_defaults() {
        let config = Config::default();
        assert_eq!(config.gene_id_base, 100_000);
        assert!(config.minimize_dominating_set);
        assert!(config.triconnected_enabled);
        assert!(config.validate_cover_against_graph);
    }

    #[test]
    fn unlisted_timepoint_is_baseline() {
        let config = Config::default();
        assert_eq!(config.offset_for("anything"), 0);
    }

    #[test]
    fn biclique_file_name_substitutes_placeholder() {
        let config = Config::default();
        assert_eq!(config.biclique_file_name("P0"), "P0_bicliques.txt");
    }
}
