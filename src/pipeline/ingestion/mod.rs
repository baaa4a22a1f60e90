// Pipeline ingestion: discovery of raw source files for a run

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Extraction step: source data lands in the raw area unchanged.
/// Returns the CSV files currently present there, sorted by file name.
pub fn extract_raw(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(raw_dir)?;
    let paths = list_csv_files(raw_dir)?;
    debug!("Found {} raw file(s) in {}", paths.len(), raw_dir.display());
    Ok(paths)
}

/// All `*.csv` files directly inside `dir`, sorted by file name so every
/// run processes the same inputs in the same order.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    if !dir.exists() {
        return Ok(paths);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
