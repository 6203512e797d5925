//! File-backed `DataSource` and in-memory recording `Persistence`, the CLI's
//! own stand-ins for the spreadsheet reader and relational database a real
//! deployment would plug in.

use anyhow::{Context, Result as AnyResult};
use dmrgraph::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One line of the rows file: the JSON shape of a [`DmrRow`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowLine {
    pub dmr_number: u64,
    #[serde(default)]
    pub area_stat: Option<f64>,
    #[serde(default)]
    pub nearby_gene: Option<String>,
    #[serde(default)]
    pub enhancer_genes: Vec<String>,
    #[serde(default)]
    pub promoter_genes: Vec<String>,
    #[serde(default)]
    pub chr: Option<String>,
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub end: Option<u64>,
}

impl From<RowLine> for DmrRow {
    fn from(line: RowLine) -> Self {
        DmrRow {
            dmr_number: line.dmr_number,
            area_stat: line.area_stat,
            nearby_gene: line.nearby_gene,
            enhancer_genes: line.enhancer_genes,
            promoter_genes: line.promoter_genes,
            chr: line.chr,
            start: line.start,
            end: line.end,
        }
    }
}

/// Reads one DMR row per non-empty, non-comment line of `path`.
pub fn read_rows_file(path: &Path) -> AnyResult<Vec<DmrRow>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parsed: RowLine =
            serde_json::from_str(line).with_context(|| format!("{}:{}: malformed row", path.display(), idx + 1))?;
        rows.push(parsed.into());
    }
    Ok(rows)
}

/// A single timepoint's rows plus an optional cover file, held in memory.
pub struct FileDataSource {
    timepoint: String,
    rows: Vec<DmrRow>,
    cover_text: Option<String>,
}

impl FileDataSource {
    pub fn new(timepoint: impl Into<String>, rows: Vec<DmrRow>, cover_text: Option<String>) -> Self {
        Self { timepoint: timepoint.into(), rows, cover_text }
    }
}

impl DataSource for FileDataSource {
    fn rows(&self, timepoint: &str) -> Result<Vec<DmrRow>> {
        if timepoint == self.timepoint {
            Ok(self.rows.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn cover_text(&self, timepoint: &str) -> Result<Option<String>> {
        if timepoint == self.timepoint {
            Ok(self.cover_text.clone())
        } else {
            Ok(None)
        }
    }
}

/// Records every write in memory so `dmr run` can print a summary afterward.
#[derive(Default)]
pub struct RecordingPersistence {
    next_component_id: usize,
    next_biclique_id: usize,
    pub components: Vec<ComponentWrite>,
    pub bicliques: Vec<BicliqueWrite>,
    pub annotations: BTreeMap<NodeId, AnnotationWrite>,
    pub dominating_set: Vec<DominatingSetRecord>,
    pub edge_details: Vec<EdgeDetailWrite>,
}

impl Persistence for RecordingPersistence {
    fn upsert_timepoint(&mut self, _name: &str, _offset: u64) -> Result<u64> {
        Ok(1)
    }

    fn insert_gene(&mut self, _symbol: &str, _description: Option<&str>) -> Result<NodeId> {
        Ok(0)
    }

    fn insert_dmr(&mut self, _timepoint_id: u64, dmr_number: u64, _area_stat: Option<f64>) -> Result<NodeId> {
        Ok(dmr_number)
    }

    fn insert_component(&mut self, _timepoint_id: u64, component: ComponentWrite) -> Result<usize> {
        let id = self.next_component_id;
        self.next_component_id += 1;
        self.components.push(component);
        Ok(id)
    }

    fn insert_biclique(&mut self, _timepoint_id: u64, biclique: BicliqueWrite) -> Result<usize> {
        let id = self.next_biclique_id;
        self.next_biclique_id += 1;
        self.bicliques.push(biclique);
        Ok(id)
    }

    fn link_component_biclique(&mut self, _timepoint_id: u64, _component_id: usize, _biclique_id: usize) -> Result<()> {
        Ok(())
    }

    fn upsert_annotation(&mut self, _timepoint_id: u64, annotation: AnnotationWrite) -> Result<()> {
        self.annotations.insert(annotation.node, annotation);
        Ok(())
    }

    fn insert_edge_details(&mut self, _timepoint_id: u64, detail: EdgeDetailWrite) -> Result<()> {
        self.edge_details.push(detail);
        Ok(())
    }

    fn store_dominating_set(&mut self, _timepoint_id: u64, records: Vec<DominatingSetRecord>) -> Result<()> {
        self.dominating_set = records;
        Ok(())
    }

    fn replace_for_timepoint(&mut self, _timepoint_id: u64) -> Result<()> {
        self.components.clear();
        self.bicliques.clear();
        self.edge_details.clear();
        self.dominating_set.clear();
        self.annotations.clear();
        Ok(())
    }
}
