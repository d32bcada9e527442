//! SQLite export of a year's tables.
//!
//! Writes `ise_<year>.sqlite` next to the JSON artifacts so dashboards can
//! query dependency records with SQL. The file is rebuilt on every run.

#![cfg(feature = "sqlite")]

use crate::aggregate::YearTables;
use crate::artifacts::ArtifactStore;
use ise_core::error::{IseError, Result};
use ise_core::types::YearResults;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

fn db(e: rusqlite::Error) -> IseError {
    IseError::Io(format!("sqlite: {}", e))
}

const SCHEMA: &str = r#"
    CREATE TABLE dependencies (
        year INTEGER NOT NULL,
        industry TEXT NOT NULL,
        dependent_country TEXT NOT NULL,
        supplier_country TEXT NOT NULL,
        dependency_value REAL NOT NULL,
        direct REAL NOT NULL,
        indirect REAL NOT NULL,
        trade_value REAL NOT NULL,
        longitud_optima INTEGER NOT NULL
    );

    CREATE TABLE hubs (
        country TEXT PRIMARY KEY,
        year INTEGER NOT NULL,
        frequency_total INTEGER NOT NULL,
        strength_total REAL NOT NULL,
        global_score REAL NOT NULL,
        global_rank INTEGER NOT NULL
    );

    CREATE TABLE critical (
        industry TEXT NOT NULL,
        exportador TEXT NOT NULL,
        importador TEXT NOT NULL,
        dependencia_total REAL NOT NULL,
        caminos_alternativos INTEGER NOT NULL,
        criticidad REAL NOT NULL
    );

    CREATE TABLE profiles (
        country TEXT PRIMARY KEY,
        vulnerability REAL NOT NULL,
        importance REAL NOT NULL,
        indirect_share REAL NOT NULL,
        num_suppliers_effective REAL NOT NULL,
        global_rank INTEGER NOT NULL
    );

    CREATE INDEX idx_dep_dependent ON dependencies(dependent_country);
    CREATE INDEX idx_dep_supplier ON dependencies(supplier_country);
    CREATE INDEX idx_dep_industry ON dependencies(industry);
"#;

pub fn sqlite_path(store: &ArtifactStore, year: i32) -> PathBuf {
    store.root().join(format!("ise_{}.sqlite", year))
}

/// Write the year's records and tables into `ise_<year>.sqlite`.
pub fn export_year(store: &ArtifactStore, results: &YearResults, tables: &YearTables) -> Result<PathBuf> {
    let path = sqlite_path(store, results.year);
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    let mut conn = Connection::open(&path).map_err(db)?;
    write_tables(&mut conn, results, tables)?;
    Ok(path)
}

fn write_tables(conn: &mut Connection, results: &YearResults, tables: &YearTables) -> Result<()> {
    conn.execute_batch(SCHEMA).map_err(db)?;
    let tx = conn.transaction().map_err(db)?;
    {
        let mut stmt = tx
            .prepare("INSERT INTO dependencies VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)")
            .map_err(db)?;
        for dep in results.dependencies() {
            stmt.execute(params![
                results.year,
                dep.industry.as_str(),
                dep.importer.as_str(),
                dep.exporter.as_str(),
                dep.total,
                dep.direct,
                dep.indirect,
                dep.trade_value,
                dep.chain_length,
            ])
            .map_err(db)?;
        }

        let mut stmt = tx
            .prepare("INSERT INTO hubs VALUES (?1, ?2, ?3, ?4, ?5, ?6)")
            .map_err(db)?;
        for hub in &tables.hubs {
            stmt.execute(params![
                hub.country.as_str(),
                hub.year,
                hub.frequency_total as i64,
                hub.strength_total,
                hub.global_score,
                hub.global_rank,
            ])
            .map_err(db)?;
        }

        let mut stmt = tx
            .prepare("INSERT INTO critical VALUES (?1, ?2, ?3, ?4, ?5, ?6)")
            .map_err(db)?;
        for link in &tables.critical {
            stmt.execute(params![
                link.industry.as_str(),
                link.exporter.as_str(),
                link.importer.as_str(),
                link.total,
                link.alternative_paths as i64,
                link.criticality,
            ])
            .map_err(db)?;
        }

        let mut stmt = tx
            .prepare("INSERT INTO profiles VALUES (?1, ?2, ?3, ?4, ?5, ?6)")
            .map_err(db)?;
        for profile in &tables.profiles {
            stmt.execute(params![
                profile.country.as_str(),
                profile.vulnerability,
                profile.importance,
                profile.indirect_share,
                profile.num_suppliers_effective,
                profile.global_rank,
            ])
            .map_err(db)?;
        }
    }
    tx.commit().map_err(db)
}

/// Row counts of the exported tables: (dependencies, hubs, critical, profiles).
pub fn table_counts(path: &Path) -> Result<(usize, usize, usize, usize)> {
    let conn = Connection::open(path).map_err(db)?;
    let count = |table: &str| -> Result<usize> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .map_err(db)
    };
    Ok((
        count("dependencies")?,
        count("hubs")?,
        count("critical")?,
        count("profiles")?,
    ))
}
