use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use tracing::{info, instrument};

use crate::domain::{CuratedRecord, PlanetRecord, SizeClass, CURATED_COLUMNS};
use crate::error::Result;

use super::{read_table, reset_stage_dir, write_table};

const STAGE: &str = "curated";

/// Fixed synonym map for discovery method labels. Unmapped values pass
/// through unchanged (trimmed).
static METHOD_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("RV", "Radial Velocity"),
        ("Radial", "Radial Velocity"),
        ("Radial Velocity", "Radial Velocity"),
        ("Transit", "Transit"),
    ])
});

/// Domain validity bounds and derived-feature constants applied by the
/// semantic cleaner. Domain-informed, not physics-perfect.
#[derive(Debug, Clone)]
pub struct CleaningPolicy {
    /// Dwarf-planet territory below this radius
    pub min_radius_earth: f64,
    /// Roughly twice Jupiter, the largest radius observed so far
    pub max_radius_earth: f64,
    /// Earth's mean density, the unit for relative density
    pub earth_density_g_cm3: f64,
    /// Far too dense for a normal planet; treated as data error beyond this
    pub max_density_g_cm3: f64,
    pub size_bins: SizeBins,
}

/// Lower edges of the size-class buckets, in Earth radii. Buckets are
/// half-open; radii at or above `giant` classify as Giant.
#[derive(Debug, Clone)]
pub struct SizeBins {
    pub earth_like: f64,
    pub super_earth: f64,
    pub giant: f64,
}

impl Default for CleaningPolicy {
    fn default() -> Self {
        Self {
            min_radius_earth: 0.1,
            max_radius_earth: 25.0,
            earth_density_g_cm3: 5.51,
            max_density_g_cm3: 30.0,
            size_bins: SizeBins {
                earth_like: 0.8,
                super_earth: 1.25,
                giant: 2.0,
            },
        }
    }
}

impl CleaningPolicy {
    /// Trim and map a discovery method label onto the canonical vocabulary.
    pub fn normalize_method(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        match METHOD_SYNONYMS.get(trimmed) {
            Some(canonical) => (*canonical).to_string(),
            None => trimmed.to_string(),
        }
    }

    /// Applies validity rules and computes derived features for one record.
    /// Bad values degrade to null; the row itself is always kept.
    pub fn clean(&self, mut record: PlanetRecord, current_year: i64) -> CuratedRecord {
        if let Some(method) = record.disc_method.take() {
            record.disc_method = Some(self.normalize_method(&method));
        }

        record.radius_earth = record
            .radius_earth
            .filter(|r| (self.min_radius_earth..=self.max_radius_earth).contains(r));
        record.mass_earth = record.mass_earth.filter(|m| *m > 0.0);
        record.disc_year = record.disc_year.filter(|year| *year <= current_year);

        let mut density_rel_earth = self.relative_density(record.mass_earth, record.radius_earth);
        let mut density_g_cm3 = density_rel_earth.map(|d| d * self.earth_density_g_cm3);
        if density_g_cm3.map_or(false, |d| d > self.max_density_g_cm3) {
            density_rel_earth = None;
            density_g_cm3 = None;
        }

        let class_size = record.radius_earth.and_then(|r| self.classify(r));

        CuratedRecord {
            planet_id: record.planet_id,
            planet_name: record.planet_name,
            star_name: record.star_name,
            disc_year: record.disc_year,
            disc_method: record.disc_method,
            distance_ly: record.distance_ly,
            radius_earth: record.radius_earth,
            mass_earth: record.mass_earth,
            orbital_period_days: record.orbital_period_days,
            eq_temp_k: record.eq_temp_k,
            notes: record.notes,
            density_rel_earth,
            density_g_cm3,
            class_size,
        }
    }

    /// Density relative to Earth: mass / radius^3. Undefined when either
    /// operand is null, and a zero or non-finite cube maps to null rather
    /// than raising or producing infinity, even for radii that slip past
    /// the validity bound.
    fn relative_density(&self, mass: Option<f64>, radius: Option<f64>) -> Option<f64> {
        let (mass, radius) = match (mass, radius) {
            (Some(mass), Some(radius)) => (mass, radius),
            _ => return None,
        };
        let cubed = radius.powi(3);
        if cubed == 0.0 {
            return None;
        }
        let density = mass / cubed;
        if density.is_finite() {
            Some(density)
        } else {
            None
        }
    }

    /// Buckets a radius into its size class. Radii below zero carry no
    /// meaningful class and map to null.
    fn classify(&self, radius: f64) -> Option<SizeClass> {
        if radius < 0.0 {
            return None;
        }
        let class = if radius < self.size_bins.earth_like {
            SizeClass::SubEarth
        } else if radius < self.size_bins.super_earth {
            SizeClass::EarthLike
        } else if radius < self.size_bins.giant {
            SizeClass::SuperEarth
        } else {
            SizeClass::Giant
        };
        Some(class)
    }
}

/// Semantic cleaning: applies the validity rules and derives density and
/// size-class features for every staged file. One curated file per input,
/// keeping the input's base name. Numeric columns are re-coerced on read,
/// so running the cleaner over its own output is a no-op.
#[instrument(skip(staging_paths))]
pub fn to_curated(staging_paths: &[PathBuf], curated_dir: &Path) -> Result<Vec<PathBuf>> {
    let policy = CleaningPolicy::default();
    let current_year = i64::from(Local::now().year());

    reset_stage_dir(curated_dir, STAGE)?;

    let mut out_paths = Vec::new();
    for staging_path in staging_paths {
        let records = read_table(staging_path, STAGE)?;
        let curated: Vec<CuratedRecord> = records
            .into_iter()
            .map(|record| policy.clean(record, current_year))
            .collect();

        let out_path = curated_dir.join(staging_path.file_name().unwrap_or_default());
        write_table(&curated, &CURATED_COLUMNS, &out_path, STAGE)?;

        info!(
            "Curated {} -> {} ({} rows)",
            staging_path.display(),
            out_path.display(),
            curated.len()
        );
        out_paths.push(out_path);
    }
    Ok(out_paths)
}
