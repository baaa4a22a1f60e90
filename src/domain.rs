use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical column set for staged datasets, in output order.
/// Field order of [`PlanetRecord`] must stay in sync with this list.
pub const CANONICAL_COLUMNS: [&str; 11] = [
    "planet_id",
    "planet_name",
    "star_name",
    "disc_year",
    "disc_method",
    "distance_ly",
    "radius_earth",
    "mass_earth",
    "orbital_period_days",
    "eq_temp_k",
    "notes",
];

/// Curated column set: the canonical columns plus the derived fields.
pub const CURATED_COLUMNS: [&str; 14] = [
    "planet_id",
    "planet_name",
    "star_name",
    "disc_year",
    "disc_method",
    "distance_ly",
    "radius_earth",
    "mass_earth",
    "orbital_period_days",
    "eq_temp_k",
    "notes",
    "density_rel_earth",
    "density_g_cm3",
    "class_size",
];

/// One row of tabular data in the canonical (post-staging) schema.
/// Every field is nullable; absent values are empty fields on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub planet_id: Option<i64>,
    pub planet_name: Option<String>,
    pub star_name: Option<String>,
    pub disc_year: Option<i64>,
    pub disc_method: Option<String>,
    pub distance_ly: Option<f64>,
    pub radius_earth: Option<f64>,
    pub mass_earth: Option<f64>,
    pub orbital_period_days: Option<f64>,
    pub eq_temp_k: Option<f64>,
    pub notes: Option<String>,
}

impl PlanetRecord {
    /// Whether the record carries a usable key identity.
    pub fn has_identity(&self) -> bool {
        self.planet_name.as_deref().map_or(false, |name| !name.is_empty())
    }

    /// Whether all five physical measurement columns are null.
    pub fn all_measurements_missing(&self) -> bool {
        self.distance_ly.is_none()
            && self.radius_earth.is_none()
            && self.mass_earth.is_none()
            && self.orbital_period_days.is_none()
            && self.eq_temp_k.is_none()
    }

    /// Row filter applied during staging: no identity and no measurements
    /// means the row is structural noise rather than a partial observation.
    pub fn is_structurally_empty(&self) -> bool {
        !self.has_identity() && self.all_measurements_missing()
    }
}

/// A curated row: the canonical columns plus derived astrophysical features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedRecord {
    pub planet_id: Option<i64>,
    pub planet_name: Option<String>,
    pub star_name: Option<String>,
    pub disc_year: Option<i64>,
    pub disc_method: Option<String>,
    pub distance_ly: Option<f64>,
    pub radius_earth: Option<f64>,
    pub mass_earth: Option<f64>,
    pub orbital_period_days: Option<f64>,
    pub eq_temp_k: Option<f64>,
    pub notes: Option<String>,
    pub density_rel_earth: Option<f64>,
    pub density_g_cm3: Option<f64>,
    pub class_size: Option<SizeClass>,
}

/// Discrete size bucket derived from planetary radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    #[serde(rename = "Sub-Earth")]
    SubEarth,
    #[serde(rename = "Earth-Like")]
    EarthLike,
    #[serde(rename = "Super-Earth")]
    SuperEarth,
    #[serde(rename = "Giant")]
    Giant,
}

impl SizeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::SubEarth => "Sub-Earth",
            SizeClass::EarthLike => "Earth-Like",
            SizeClass::SuperEarth => "Super-Earth",
            SizeClass::Giant => "Giant",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structurally_empty_requires_no_identity_and_no_measurements() {
        let empty = PlanetRecord::default();
        assert!(empty.is_structurally_empty());

        let named = PlanetRecord {
            planet_name: Some("Kepler-22 b".to_string()),
            ..Default::default()
        };
        assert!(!named.is_structurally_empty());

        let measured = PlanetRecord {
            radius_earth: Some(1.0),
            ..Default::default()
        };
        assert!(!measured.is_structurally_empty());
    }

    #[test]
    fn empty_name_counts_as_missing_identity() {
        let record = PlanetRecord {
            planet_name: Some(String::new()),
            ..Default::default()
        };
        assert!(!record.has_identity());
        assert!(record.is_structurally_empty());
    }

    #[test]
    fn size_class_labels() {
        assert_eq!(SizeClass::SubEarth.to_string(), "Sub-Earth");
        assert_eq!(SizeClass::Giant.as_str(), "Giant");
    }
}
