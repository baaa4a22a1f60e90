/// Directory and file name constants for the data areas each stage owns.
/// All paths are resolved relative to the configured data root.

// Stage areas under the data root
pub const RAW_DIR: &str = "raw";
pub const STAGING_DIR: &str = "staging";
pub const CURATED_DIR: &str = "curated";
pub const DB_DIR: &str = "db";

// Store target
pub const DB_FILE: &str = "exoplanets.sqlite";
pub const DEFAULT_TABLE: &str = "exoplanets";

// Run summary written at the end of a full pipeline run
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";
