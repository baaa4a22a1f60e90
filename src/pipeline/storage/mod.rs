// Pipeline storage: bulk loading of curated datasets into SQLite

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::{info, instrument};

use crate::domain::CuratedRecord;
use crate::error::{EtlError, Result};

/// Loader that replaces a SQLite table with the contents of curated CSV
/// files. Replace semantics, never append: each load drops and recreates
/// the destination table.
pub struct SqliteLoader {
    conn: Connection,
}

impl SqliteLoader {
    /// Opens (and creates if needed) the database, creating its parent
    /// directory first.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Ok(Self { conn })
    }

    /// Replaces `table_name` with the rows of the given curated files and
    /// returns the row count of the table afterwards.
    #[instrument(skip(self, csv_paths))]
    pub fn load_files(&mut self, csv_paths: &[PathBuf], table_name: &str) -> Result<usize> {
        self.recreate_table(table_name)?;

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table_name} (
                    planet_id, planet_name, star_name, disc_year, disc_method,
                    distance_ly, radius_earth, mass_earth, orbital_period_days,
                    eq_temp_k, notes, density_rel_earth, density_g_cm3, class_size
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            ))?;

            for csv_path in csv_paths {
                let mut reader = csv::Reader::from_path(csv_path).map_err(|e| EtlError::Stage {
                    stage: "load",
                    path: csv_path.display().to_string(),
                    message: e.to_string(),
                })?;
                for row in reader.deserialize::<CuratedRecord>() {
                    let record = row.map_err(|e| EtlError::Stage {
                        stage: "load",
                        path: csv_path.display().to_string(),
                        message: e.to_string(),
                    })?;
                    stmt.execute(params![
                        record.planet_id,
                        record.planet_name,
                        record.star_name,
                        record.disc_year,
                        record.disc_method,
                        record.distance_ly,
                        record.radius_earth,
                        record.mass_earth,
                        record.orbital_period_days,
                        record.eq_temp_k,
                        record.notes,
                        record.density_rel_earth,
                        record.density_g_cm3,
                        record.class_size.map(|class| class.as_str()),
                    ])?;
                }
            }
        }
        tx.commit()?;

        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table_name}"),
            [],
            |row| row.get(0),
        )?;
        info!("Loaded {} row(s) into table '{}'", count, table_name);
        Ok(count as usize)
    }

    fn recreate_table(&self, table_name: &str) -> Result<()> {
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table_name};
             CREATE TABLE {table_name} (
                planet_id           INTEGER,
                planet_name         TEXT,
                star_name           TEXT,
                disc_year           INTEGER,
                disc_method         TEXT,
                distance_ly         REAL,
                radius_earth        REAL,
                mass_earth          REAL,
                orbital_period_days REAL,
                eq_temp_k           REAL,
                notes               TEXT,
                density_rel_earth   REAL,
                density_g_cm3       REAL,
                class_size          TEXT
             );"
        ))?;
        Ok(())
    }
}
