use crate::adapters::{read_rows_file, FileDataSource, RecordingPersistence};
use crate::output::{fmt_error, fmt_section, fmt_warning, OutputConfig};
use anyhow::{Context, Result};
use dmrgraph::prelude::*;

pub fn run(
    rows_path: &std::path::Path,
    timepoint: &str,
    cover_path: Option<&std::path::Path>,
    dmr_offset: u64,
    gene_id_base: u64,
    out: &OutputConfig,
) -> Result<()> {
    let rows = read_rows_file(rows_path)?;
    let cover_text = cover_path
        .map(|path| {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        })
        .transpose()?;

    let mut config = Config::default();
    config.gene_id_base = gene_id_base;
    config.timepoint_offsets.insert(timepoint.to_string(), dmr_offset);

    let mut genes = GeneTable::new();
    let source = FileDataSource::new(timepoint, rows, cover_text);
    let mut persistence = RecordingPersistence::default();

    let pipeline = Pipeline::new(&config);
    let outcome = pipeline.run_timepoint(timepoint, &mut genes, &source, &mut persistence);

    match &outcome {
        TimepointOutcome::Succeeded => {
            print_summary(timepoint, &persistence, out)
        }
        TimepointOutcome::SucceededWithWarnings { warning_counts } => {
            eprintln!(
                "{}: invalid_input={} missing_cover={} degenerate_cover={}",
                fmt_warning("warnings"),
                warning_counts.invalid_input,
                warning_counts.missing_cover,
                warning_counts.degenerate_cover
            );
            print_summary(timepoint, &persistence, out)
        }
        TimepointOutcome::Failed { reason, timepoint, component_id } => {
            eprintln!("{}: {reason} (timepoint={timepoint}, component_id={component_id:?})", fmt_error("failed"));
            anyhow::bail!("pipeline run failed: {reason}")
        }
    }
}

fn print_summary(timepoint: &str, persistence: &RecordingPersistence, out: &OutputConfig) -> Result<()> {
    let interesting = persistence.components.iter().filter(|c| c.category == "INTERESTING").count();
    let complex = persistence.components.iter().filter(|c| c.category == "COMPLEX").count();
    let hubs = persistence.annotations.values().filter(|a| a.role == NodeRole::Hub).count();
    let splits = persistence.annotations.values().filter(|a| a.role == NodeRole::Split).count();

    let mut text = format!("{}\n", fmt_section(&format!("Pipeline result for {timepoint}")));
    text.push_str(&format!("Components: {}\n", persistence.components.len()));
    text.push_str(&format!("  interesting: {interesting}, complex: {complex}\n"));
    text.push_str(&format!("Bicliques: {}\n", persistence.bicliques.len()));
    text.push_str(&format!("Dominating set size: {}\n", persistence.dominating_set.len()));
    text.push_str(&format!("Edge details: {}\n", persistence.edge_details.len()));
    text.push_str(&format!("Annotations: {} (hubs: {hubs}, splits: {splits})\n", persistence.annotations.len()));

    let json = serde_json::json!({
        "timepoint": timepoint,
        "components": persistence.components.len(),
        "interesting_components": interesting,
        "complex_components": complex,
        "bicliques": persistence.bicliques.len(),
        "dominating_set_size": persistence.dominating_set.len(),
        "edge_details": persistence.edge_details.len(),
        "annotations": persistence.annotations.len(),
        "hubs": hubs,
        "splits": splits,
    });

    out.emit(&text, &json)
}
