use std::fs;

use anyhow::Result;
use rusqlite::Connection;
use tempfile::tempdir;

use exo_etl::config::{Config, DataConfig, LoadConfig};
use exo_etl::domain::{CANONICAL_COLUMNS, CURATED_COLUMNS};
use exo_etl::pipeline::EtlPipeline;

fn test_config(root: &std::path::Path) -> Config {
    Config {
        data: DataConfig {
            root: root.to_path_buf(),
        },
        load: LoadConfig {
            table_name: "exoplanets".to_string(),
        },
    }
}

#[test]
fn full_run_over_a_messy_raw_file() -> Result<()> {
    let temp = tempdir()?;
    let config = test_config(temp.path());

    let raw_dir = config.raw_dir();
    fs::create_dir_all(&raw_dir)?;
    fs::write(
        raw_dir.join("observations.csv"),
        " Planet Name ,Star Name,Disc Year,Disc Method,RADIUS_EARTH,Mass Earth,Telescope\n\
         Earth twin,Sol B,2011,Transit,1.0,1.0,Kepler\n\
         Dense dwarf,GJ 1214,2300,RV,0.11,20.0,Spitzer\n\
         Broken row,HD 209458,bad-year,Radial,not-a-number,,Hubble\n\
         ,,,,,,\n",
    )?;

    let pipeline = EtlPipeline::new(config.clone());
    let result = pipeline.run()?;

    assert_eq!(result.raw_files, 1);
    assert_eq!(result.staging_files, 1);
    assert_eq!(result.curated_files, 1);
    // The all-empty row is dropped in staging; the rest survive
    assert_eq!(result.rows_loaded, 3);

    // Staging output carries exactly the canonical schema
    let staged = fs::read_to_string(config.staging_dir().join("observations.csv"))?;
    assert_eq!(staged.lines().next().unwrap(), CANONICAL_COLUMNS.join(","));
    assert!(!staged.contains("Kepler"), "unknown column must not leak");

    // Curated output extends the schema with the derived fields
    let curated = fs::read_to_string(config.curated_dir().join("observations.csv"))?;
    assert_eq!(curated.lines().next().unwrap(), CURATED_COLUMNS.join(","));

    // Run summary is persisted to the data root
    assert!(config.run_summary_path().exists());

    // Store round-trip: the table holds exactly the curated rows
    let conn = Connection::open(config.db_path())?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM exoplanets", [], |row| row.get(0))?;
    assert_eq!(count, 3);

    // Earth twin: unit relative density, Earth-Like class
    let (density, class): (f64, String) = conn.query_row(
        "SELECT density_g_cm3, class_size FROM exoplanets WHERE planet_name = 'Earth twin'",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    assert!((density - 5.51).abs() < 1e-9);
    assert_eq!(class, "Earth-Like");

    // Dense dwarf: density capped to null, class kept, future year nulled
    let (dwarf_density, dwarf_class, dwarf_year): (Option<f64>, Option<String>, Option<i64>) =
        conn.query_row(
            "SELECT density_g_cm3, class_size, disc_year FROM exoplanets \
             WHERE planet_name = 'Dense dwarf'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
    assert_eq!(dwarf_density, None);
    assert_eq!(dwarf_class.as_deref(), Some("Sub-Earth"));
    assert_eq!(dwarf_year, None);

    // Broken row: unparseable values degraded to null, method mapped
    let (method, radius): (Option<String>, Option<f64>) = conn.query_row(
        "SELECT disc_method, radius_earth FROM exoplanets WHERE planet_name = 'Broken row'",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    assert_eq!(method.as_deref(), Some("Radial Velocity"));
    assert_eq!(radius, None);

    Ok(())
}

#[test]
fn empty_raw_area_is_a_successful_no_op() -> Result<()> {
    let temp = tempdir()?;
    let config = test_config(temp.path());

    let pipeline = EtlPipeline::new(config.clone());
    let result = pipeline.run()?;

    assert_eq!(result.raw_files, 0);
    assert_eq!(result.staging_files, 0);
    assert_eq!(result.curated_files, 0);
    assert_eq!(result.rows_loaded, 0);
    // The load stage never ran, so no database was created
    assert!(!config.db_path().exists());

    Ok(())
}

#[test]
fn rerunning_the_pipeline_reproduces_the_same_outputs() -> Result<()> {
    let temp = tempdir()?;
    let config = test_config(temp.path());

    let raw_dir = config.raw_dir();
    fs::create_dir_all(&raw_dir)?;
    fs::write(
        raw_dir.join("exoplanets.csv"),
        "planet_name,radius_earth,mass_earth,disc_method\n\
         Kepler-22 b,2.38,9.1,Transit\n\
         55 Cnc e,1.88,7.99,RV\n",
    )?;

    let pipeline = EtlPipeline::new(config.clone());
    let first = pipeline.run()?;
    let staged_first = fs::read(config.staging_dir().join("exoplanets.csv"))?;
    let curated_first = fs::read(config.curated_dir().join("exoplanets.csv"))?;

    let second = pipeline.run()?;
    let staged_second = fs::read(config.staging_dir().join("exoplanets.csv"))?;
    let curated_second = fs::read(config.curated_dir().join("exoplanets.csv"))?;

    assert_eq!(first.rows_loaded, second.rows_loaded);
    assert_eq!(staged_first, staged_second);
    assert_eq!(curated_first, curated_second);

    Ok(())
}

#[test]
fn per_stage_entry_points_compose_into_a_full_run() -> Result<()> {
    let temp = tempdir()?;
    let config = test_config(temp.path());

    let raw_dir = config.raw_dir();
    fs::create_dir_all(&raw_dir)?;
    fs::write(
        raw_dir.join("batch.csv"),
        "planet_name,radius_earth\nTRAPPIST-1 e,0.92\n",
    )?;

    let pipeline = EtlPipeline::new(config.clone());
    let staged = pipeline.run_staging()?;
    assert_eq!(staged.len(), 1);

    let curated = pipeline.run_curated()?;
    assert_eq!(curated.len(), 1);

    let rows = pipeline.run_load()?;
    assert_eq!(rows, 1);

    let conn = Connection::open(config.db_path())?;
    let class: String = conn.query_row(
        "SELECT class_size FROM exoplanets WHERE planet_name = 'TRAPPIST-1 e'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(class, "Earth-Like");

    Ok(())
}
