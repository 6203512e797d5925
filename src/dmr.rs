//! Per-timepoint DMR records and timepoint metadata.

use serde::{Deserialize, Serialize};

/// A cohort whose DMR ids live in a disjoint integer window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timepoint {
    /// Cohort name, e.g. `"P0"` or `"DSStimeseries"`.
    pub name: String,
    /// First DMR id reserved for this timepoint.
    pub offset: u64,
}

impl Timepoint {
    /// Creates a timepoint with the given name and DMR id offset.
    pub fn new(name: impl Into<String>, offset: u64) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// Returns `true` if this is the designated baseline timepoint (offset 0).
    pub fn is_baseline(&self) -> bool {
        self.offset == 0
    }
}

/// A differentially methylated region observed in a given timepoint.
///
/// `(timepoint, dmr_number)` is the entity key; the same `dmr_number` in two
/// different timepoints names two distinct entities with distinct
/// [`crate::ids::NodeId`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dmr {
    /// Name of the owning timepoint.
    pub timepoint: String,
    /// Sequential number of this DMR within its timepoint.
    pub dmr_number: u64,
    /// Area statistic, used to break ties in the dominating-set heap.
    pub area_stat: f64,
    /// Chromosome name.
    pub chr: Option<String>,
    /// Start coordinate.
    pub start: Option<u64>,
    /// End coordinate.
    pub end: Option<u64>,
    /// Strand, `'+'` or `'-'`.
    pub strand: Option<char>,
    /// Statistical p-value.
    pub p_value: Option<f64>,
    /// Multiple-testing-adjusted q-value.
    pub q_value: Option<f64>,
    /// Mean methylation fraction over the region.
    pub mean_methylation: Option<f64>,
}

impl Dmr {
    /// Creates a DMR with only the fields required by the dominating-set
    /// solver populated; all coordinate/statistic fields default to `None`.
    pub fn new(timepoint: impl Into<String>, dmr_number: u64, area_stat: f64) -> Self {
        Self {
            timepoint: timepoint.into(),
            dmr_number,
            area_stat,
            chr: None,
            start: None,
            end: None,
            strand: None,
            p_value: None,
            q_value: None,
            mean_methylation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_timepoint_has_zero_offset() {
        assert!(Timepoint::new("baseline", 0).is_baseline());
        assert!(!Timepoint::new("P1", 10_000).is_baseline());
    }

    #[test]
    fn same_dmr_number_different_timepoints_are_distinct_entities() {
        let a = Dmr::new("P0", 5, 1.0);
        let b = Dmr::new("P1", 5, 1.0);
        assert_ne!(a.timepoint, b.timepoint);
        assert_eq!(a.dmr_number, b.dmr_number);
    }
}
