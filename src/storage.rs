use crate::models::CompositeSeries;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save the dataset as CSV with header `country,year,value`.
pub fn save_csv<P: AsRef<Path>>(series: &CompositeSeries, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("country", "year", "value"))?;
    for r in &series.rows {
        wtr.serialize((sanitize_cell(&r.country), r.year, r.value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the dataset rows as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(series: &CompositeSeries, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&series.rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
