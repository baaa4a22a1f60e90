use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{EtlError, Result};

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root directory holding the raw/staging/curated/db areas
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Destination table for the curated dataset
    pub table_name: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            table_name: constants::DEFAULT_TABLE.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_content = fs::read_to_string(CONFIG_PATH).map_err(|e| {
            EtlError::Config(format!("Failed to read config file '{CONFIG_PATH}': {e}"))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Loads `config.toml` if present, otherwise falls back to defaults.
    pub fn load_or_default() -> Result<Self> {
        if Path::new(CONFIG_PATH).exists() {
            Self::load()
        } else {
            Ok(Self::default())
        }
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data.root.join(constants::RAW_DIR)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.data.root.join(constants::STAGING_DIR)
    }

    pub fn curated_dir(&self) -> PathBuf {
        self.data.root.join(constants::CURATED_DIR)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data.root.join(constants::DB_DIR).join(constants::DB_FILE)
    }

    pub fn run_summary_path(&self) -> PathBuf {
        self.data.root.join(constants::RUN_SUMMARY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            [data]
            root = "/tmp/exo"

            [load]
            table_name = "observations"
            "#,
        )
        .unwrap();

        assert_eq!(config.data.root, PathBuf::from("/tmp/exo"));
        assert_eq!(config.load.table_name, "observations");
        assert_eq!(config.raw_dir(), PathBuf::from("/tmp/exo/raw"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/exo/db/exoplanets.sqlite"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.data.root, PathBuf::from("data"));
        assert_eq!(config.load.table_name, "exoplanets");
    }
}
