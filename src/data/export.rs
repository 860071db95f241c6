use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Dataset;

/// Write `dataset` as CSV: fixed columns first, then the extra columns in
/// source order. Missing cells are written as empty fields.
pub fn write_csv<W: Write>(dataset: &Dataset, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(dataset.column_headers())
        .context("writing CSV header")?;
    for (row_no, record) in dataset.iter().enumerate() {
        writer
            .write_record(record.display_cells(dataset.extra_columns()))
            .with_context(|| format!("writing CSV row {}", row_no + 1))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Create (or truncate) `path` and write the dataset to it.
pub fn export_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, file)?;
    log::info!("Exported {} records to {}", dataset.len(), path.display());
    Ok(())
}
