use chrono::NaiveDateTime;
use rcm_kpi_core::render::RenderedTable;
use std::fs;
use std::path::{Path, PathBuf};

use super::csv_out::write_table;

/// Write each table to `<dir>/KPI_Metrics_<YYYYmmdd_HHMMSS>_<sheet>.csv`.
///
/// Creates `dir` if needed and returns the written paths in table order.
pub fn export_tables(
    dir: &Path,
    tables: &[RenderedTable],
    stamp: NaiveDateTime,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed creating output dir '{}': {}", dir.display(), e))?;

    let prefix = format!("KPI_Metrics_{}", stamp.format("%Y%m%d_%H%M%S"));
    let mut written = Vec::with_capacity(tables.len());

    for t in tables {
        let path = dir.join(format!("{}_{}.csv", prefix, t.name));
        let file = fs::File::create(&path)
            .map_err(|e| format!("Failed creating '{}': {}", path.display(), e))?;
        write_table(file, t).map_err(|e| format!("Failed writing '{}': {}", path.display(), e))?;
        tracing::info!(path = %path.display(), rows = t.rows.len(), "exported table");
        written.push(path);
    }

    Ok(written)
}
