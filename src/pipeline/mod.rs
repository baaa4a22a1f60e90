// Data pipeline: ingestion, processing, and storage

pub mod ingestion;
pub mod processing;
pub mod storage;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::error::Result;
use self::processing::{curated, staging};
use self::storage::SqliteLoader;

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineRunResult {
    pub run_id: String,
    pub raw_files: usize,
    pub staging_files: usize,
    pub curated_files: usize,
    pub rows_loaded: usize,
}

/// Sequences extract -> stage -> curate -> load over one batch run.
/// Stages hand off through file lists; each stage fully regenerates its
/// own area, so re-running the whole pipeline is safe.
pub struct EtlPipeline {
    config: Config,
}

impl EtlPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the complete pipeline end to end.
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<PipelineRunResult> {
        let run_id = Local::now().format("%Y%m%d_%H%M%S").to_string();
        info!("Starting ETL run {}", run_id);
        println!("🚀 Starting ETL run {run_id}");
        counter!("etl_runs_total").increment(1);
        let t_run = Instant::now();

        let raw_paths = self.extract()?;
        let staging_paths = self.stage(&raw_paths)?;
        let curated_paths = self.curate(&staging_paths)?;
        let rows_loaded = self.load(&curated_paths)?;

        histogram!("etl_run_duration_seconds").record(t_run.elapsed().as_secs_f64());

        let result = PipelineRunResult {
            run_id,
            raw_files: raw_paths.len(),
            staging_files: staging_paths.len(),
            curated_files: curated_paths.len(),
            rows_loaded,
        };
        self.persist_run_summary(&result)?;

        info!("ETL run {} complete", result.run_id);
        println!("✅ ETL run {} complete", result.run_id);
        Ok(result)
    }

    /// Extraction step: discover the raw files for this run.
    pub fn extract(&self) -> Result<Vec<PathBuf>> {
        let raw_paths = ingestion::extract_raw(&self.config.raw_dir())?;
        info!("Extracted {} raw file(s)", raw_paths.len());
        println!("📥 Extracted {} raw file(s)", raw_paths.len());
        Ok(raw_paths)
    }

    /// Staging step over an explicit raw file list.
    pub fn stage(&self, raw_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let t_stage = Instant::now();
        let staging_paths = staging::to_staging(raw_paths, &self.config.staging_dir())
            .map_err(|e| {
                error!("Staging failed: {}", e);
                e
            })?;
        histogram!("etl_stage_duration_seconds", "stage" => "staging")
            .record(t_stage.elapsed().as_secs_f64());
        println!("🔧 Staged {} file(s)", staging_paths.len());
        Ok(staging_paths)
    }

    /// Curation step over an explicit staging file list.
    pub fn curate(&self, staging_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let t_curate = Instant::now();
        let curated_paths = curated::to_curated(staging_paths, &self.config.curated_dir())
            .map_err(|e| {
                error!("Curation failed: {}", e);
                e
            })?;
        histogram!("etl_stage_duration_seconds", "stage" => "curated")
            .record(t_curate.elapsed().as_secs_f64());
        println!("🧹 Curated {} file(s)", curated_paths.len());
        Ok(curated_paths)
    }

    /// Load step: bulk-replace the store table with the curated rows.
    /// An empty file list is a successful no-op, not an error.
    pub fn load(&self, curated_paths: &[PathBuf]) -> Result<usize> {
        if curated_paths.is_empty() {
            info!("No curated files to load");
            println!("💾 No curated files to load");
            return Ok(0);
        }

        let t_load = Instant::now();
        let mut loader = SqliteLoader::open(&self.config.db_path())?;
        let rows_loaded = loader
            .load_files(curated_paths, &self.config.load.table_name)
            .map_err(|e| {
                error!("Load failed: {}", e);
                e
            })?;
        histogram!("etl_stage_duration_seconds", "stage" => "load")
            .record(t_load.elapsed().as_secs_f64());
        counter!("etl_rows_loaded_total").increment(rows_loaded as u64);
        println!(
            "💾 Loaded {} row(s) into {}",
            rows_loaded,
            self.config.db_path().display()
        );
        Ok(rows_loaded)
    }

    /// Per-stage entry point: stage whatever is in the raw area now.
    pub fn run_staging(&self) -> Result<Vec<PathBuf>> {
        let raw_paths = self.extract()?;
        self.stage(&raw_paths)
    }

    /// Per-stage entry point: curate whatever is in the staging area now.
    pub fn run_curated(&self) -> Result<Vec<PathBuf>> {
        let staging_paths = ingestion::list_csv_files(&self.config.staging_dir())?;
        self.curate(&staging_paths)
    }

    /// Per-stage entry point: load whatever is in the curated area now.
    pub fn run_load(&self) -> Result<usize> {
        let curated_paths = ingestion::list_csv_files(&self.config.curated_dir())?;
        self.load(&curated_paths)
    }

    /// Persist the run summary to the data root, overwritten on each run.
    fn persist_run_summary(&self, result: &PipelineRunResult) -> Result<()> {
        fs::create_dir_all(&self.config.data.root)?;
        let json_content = serde_json::to_string_pretty(result)?;
        fs::write(self.config.run_summary_path(), json_content)?;
        Ok(())
    }
}
