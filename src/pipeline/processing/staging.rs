use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::domain::{PlanetRecord, CANONICAL_COLUMNS};
use crate::error::Result;

use super::{read_table, reset_stage_dir, write_table};

const STAGE: &str = "staging";

/// Schema normalization: maps each raw tabular file onto the canonical
/// column set and drops structurally empty rows.
///
/// One staging file per input, keeping the input's base name. The output
/// depends only on the input bytes and the canonical schema, so re-running
/// over the same raw files produces byte-identical staging files.
#[instrument(skip(raw_paths))]
pub fn to_staging(raw_paths: &[PathBuf], staging_dir: &Path) -> Result<Vec<PathBuf>> {
    reset_stage_dir(staging_dir, STAGE)?;

    let mut out_paths = Vec::new();
    for raw_path in raw_paths {
        let records = read_table(raw_path, STAGE)?;
        let total = records.len();

        let kept: Vec<PlanetRecord> = records
            .into_iter()
            .filter(|record| !record.is_structurally_empty())
            .collect();
        let dropped = total - kept.len();

        let out_path = stage_path(raw_path, staging_dir);
        write_table(&kept, &CANONICAL_COLUMNS, &out_path, STAGE)?;

        info!(
            "Staged {} -> {} ({} rows kept, {} dropped)",
            raw_path.display(),
            out_path.display(),
            kept.len(),
            dropped
        );
        out_paths.push(out_path);
    }
    Ok(out_paths)
}

fn stage_path(input: &Path, staging_dir: &Path) -> PathBuf {
    let name = input.file_name().unwrap_or_default();
    staging_dir.join(name)
}
