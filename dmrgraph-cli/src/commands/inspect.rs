use crate::adapters::read_rows_file;
use crate::output::{fmt_section, OutputConfig};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

pub fn inspect(rows_path: &Path, out: &OutputConfig) -> Result<()> {
    let rows = read_rows_file(rows_path)?;

    let mut symbols: BTreeSet<String> = BTreeSet::new();
    let mut with_area = 0usize;
    for row in &rows {
        symbols.extend(row.nearby_gene.iter().cloned());
        symbols.extend(row.enhancer_genes.iter().cloned());
        symbols.extend(row.promoter_genes.iter().cloned());
        if row.area_stat.is_some() {
            with_area += 1;
        }
    }

    let mut text = format!("{}\n", fmt_section("Rows file"));
    text.push_str(&format!("DMR rows: {}\n", rows.len()));
    text.push_str(&format!("Distinct gene symbols: {}\n", symbols.len()));
    text.push_str(&format!("Rows with an area statistic: {}\n", with_area));

    let json = serde_json::json!({
        "dmr_rows": rows.len(),
        "distinct_gene_symbols": symbols.len(),
        "rows_with_area_stat": with_area,
    });

    out.emit(&text, &json)
}
