use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;

use rcm_kpi_core::records::{RawVisitRow, SOURCE_COLUMNS};

/// Rows of a visit export plus the expected columns its header lacked.
pub struct VisitExport {
    pub rows: Vec<RawVisitRow>,
    pub missing_columns: Vec<String>,
}

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a YAML file and deserialise into a typed struct.
pub fn read_yaml<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a config file, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
pub fn read_config<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        read_yaml(path)
    } else {
        read_json(path)
    }
}

/// Read a visit export CSV from disk.
pub fn read_visit_csv(path: &str) -> Result<VisitExport, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let file = fs::File::open(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    read_visit_rows(file, &canonical.display().to_string())
}

/// Deserialize visit rows by header name. Extra columns are ignored and short
/// rows are accepted; missing expected columns are reported, not fatal.
pub fn read_visit_rows<R: Read>(
    reader: R,
    source: &str,
) -> Result<VisitExport, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| format!("Failed to read header of '{}': {}", source, e))?
        .clone();
    let missing_columns: Vec<String> = SOURCE_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == **c))
        .map(|c| c.to_string())
        .collect();
    if !missing_columns.is_empty() {
        tracing::warn!(source, missing = ?missing_columns, "visit export lacks expected columns");
    }

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<RawVisitRow>().enumerate() {
        let row = result.map_err(|e| {
            // +2: one for the header line, one for 1-based numbering
            format!("Failed reading row {} of '{}': {}", i + 2, source, e)
        })?;
        rows.push(row);
    }
    tracing::debug!(source, rows = rows.len(), "read visit export");

    Ok(VisitExport {
        rows,
        missing_columns,
    })
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    // Basic existence check
    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
