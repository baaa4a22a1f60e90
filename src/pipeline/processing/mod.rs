// Pipeline processing: schema normalization and semantic cleaning

pub mod curated;
pub mod staging;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;

use crate::domain::PlanetRecord;
use crate::error::{EtlError, Result};

/// Normalizes a header cell: trim, lowercase, internal spaces to
/// underscores. Keeps header matching resilient to source formatting drift.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Lenient float parse. Empty, unparseable, and non-finite values all map
/// to `None`; per-value failures never abort a run.
pub fn coerce_float(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Lenient integer parse. Accepts float-shaped text with an integral part
/// (e.g. "2014.0"), since year and id columns often arrive that way.
pub fn coerce_int(field: &str) -> Option<i64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.fract() == 0.0)
        .map(|value| value as i64)
}

/// Text coercion: an empty field is null, anything else is kept verbatim.
pub fn coerce_text(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

fn stage_error(stage: &'static str, path: &Path, message: impl ToString) -> EtlError {
    EtlError::Stage {
        stage,
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Reads a tabular file into canonical records, mapping whatever columns
/// the input has onto the canonical schema. Unknown columns are ignored,
/// missing ones come back null, and every value goes through the lenient
/// coercers. Only I/O and CSV-level failures are fatal.
pub(crate) fn read_table(path: &Path, stage: &'static str) -> Result<Vec<PlanetRecord>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| stage_error(stage, path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| stage_error(stage, path, e))?
        .clone();
    let index: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| (normalize_column_name(header), i))
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| stage_error(stage, path, e))?;
        records.push(record_from_row(&row, &index));
    }
    Ok(records)
}

fn field<'a>(row: &'a StringRecord, index: &HashMap<String, usize>, name: &str) -> &'a str {
    index
        .get(name)
        .and_then(|&i| row.get(i))
        .unwrap_or_default()
}

fn record_from_row(row: &StringRecord, index: &HashMap<String, usize>) -> PlanetRecord {
    PlanetRecord {
        planet_id: coerce_int(field(row, index, "planet_id")),
        planet_name: coerce_text(field(row, index, "planet_name")),
        star_name: coerce_text(field(row, index, "star_name")),
        disc_year: coerce_int(field(row, index, "disc_year")),
        disc_method: coerce_text(field(row, index, "disc_method")),
        distance_ly: coerce_float(field(row, index, "distance_ly")),
        radius_earth: coerce_float(field(row, index, "radius_earth")),
        mass_earth: coerce_float(field(row, index, "mass_earth")),
        orbital_period_days: coerce_float(field(row, index, "orbital_period_days")),
        eq_temp_k: coerce_float(field(row, index, "eq_temp_k")),
        notes: coerce_text(field(row, index, "notes")),
    }
}

/// Writes records with an explicit header row, so even an empty dataset
/// keeps the stable schema contract.
pub(crate) fn write_table<T: Serialize>(
    records: &[T],
    columns: &[&str],
    path: &Path,
    stage: &'static str,
) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| stage_error(stage, path, e))?;

    writer
        .write_record(columns)
        .map_err(|e| stage_error(stage, path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| stage_error(stage, path, e))?;
    }
    writer.flush().map_err(|e| stage_error(stage, path, e))?;
    Ok(())
}

/// Prepares a stage's output directory: creates it if absent and removes
/// CSV output from previous runs. Each stage fully regenerates its area.
pub(crate) fn reset_stage_dir(dir: &Path, stage: &'static str) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| stage_error(stage, dir, e))?;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            fs::remove_file(&path).map_err(|e| stage_error(stage, &path, e))?;
        }
    }
    Ok(())
}
