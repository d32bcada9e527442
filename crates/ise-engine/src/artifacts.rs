//! Artifact persistence: per-year JSON tables on disk.
//!
//! Every table of a year lands in the output directory as
//! `<kind>_<year>.json`. The full engine result set is stored as
//! `results_<year>.json` so aggregations can be recomputed without
//! rerunning the decomposition. A manifest records what went in.

use crate::aggregate::YearTables;
use crate::explorer::{ExplorerEntry, ExplorerIndex};
use ise_core::error::{IseError, Result};
use ise_core::types::{IndustryId, SkippedIndustry, YearResults};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub const RESULTS: &str = "results";
pub const HUBS: &str = "hubs";
pub const CRITICAL: &str = "critical";
pub const PROFILES: &str = "profiles";
pub const DEPENDENCIES: &str = "dependencies";
pub const BILATERAL: &str = "bilateral";
pub const EXPLORER: &str = "explorer";
pub const MANIFEST: &str = "manifest";

/// Run metadata for one processed year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub run_id: String,
    pub year: i32,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
    pub source: String,
    pub industries: Vec<IndustryId>,
    #[serde(default)]
    pub skipped: Vec<SkippedIndustry>,
    pub dependency_records: usize,
    pub critical_paths: usize,
}

impl Manifest {
    pub fn new(results: &YearResults, source: impl Into<String>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            run_id: Uuid::new_v4().to_string(),
            year: results.year,
            created_at,
            source: source.into(),
            industries: results.industries.keys().cloned().collect(),
            skipped: results.skipped.clone(),
            dependency_records: results.dependencies().count(),
            critical_paths: results
                .industries
                .values()
                .map(|r| r.critical_paths.len())
                .sum(),
        }
    }
}

/// Pretty JSON through a buffer. Flush errors are returned.
fn write_pretty<W: Write, T: Serialize + ?Sized>(sink: W, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(sink);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Reads and writes the artifacts of one output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, kind: &str, year: i32) -> PathBuf {
        self.root.join(format!("{}_{}.json", kind, year))
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, kind: &str, year: i32, value: &T) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.path(kind, year);
        write_pretty(File::create(&path)?, value)?;
        Ok(path)
    }

    /// Read one artifact. A missing file means the year was not processed.
    pub fn read_json<T: DeserializeOwned>(&self, kind: &str, year: i32) -> Result<T> {
        let path = self.path(kind, year);
        if !path.exists() {
            return Err(IseError::year_not_processed(
                year,
                format!("missing {}", path.display()),
            ));
        }
        let reader = BufReader::new(File::open(&path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Persist the result set, every derived table and the manifest.
    pub fn save_year(
        &self,
        results: &YearResults,
        tables: &YearTables,
        manifest: &Manifest,
    ) -> Result<Vec<PathBuf>> {
        let year = results.year;
        let explorer_rows: Vec<&ExplorerEntry> = tables.explorer.rows();
        Ok(vec![
            self.write_json(RESULTS, year, results)?,
            self.write_json(HUBS, year, &tables.hubs)?,
            self.write_json(CRITICAL, year, &tables.critical)?,
            self.write_json(PROFILES, year, &tables.profiles)?,
            self.write_json(DEPENDENCIES, year, &tables.dependencies)?,
            self.write_json(BILATERAL, year, &tables.bilateral)?,
            self.write_json(EXPLORER, year, &explorer_rows)?,
            self.write_json(MANIFEST, year, manifest)?,
        ])
    }

    /// Load and validate a year's engine results.
    pub fn load_results(&self, year: i32) -> Result<YearResults> {
        let results: YearResults = self.read_json(RESULTS, year)?;
        if results.year != year {
            return Err(IseError::malformed(format!(
                "{} holds year {}",
                self.path(RESULTS, year).display(),
                results.year
            )));
        }
        results.validate()?;
        Ok(results)
    }

    /// Load a year's derived tables.
    pub fn load_tables(&self, year: i32) -> Result<YearTables> {
        let explorer: Vec<ExplorerEntry> = self.read_json(EXPLORER, year)?;
        Ok(YearTables {
            year,
            hubs: self.read_json(HUBS, year)?,
            critical: self.read_json(CRITICAL, year)?,
            profiles: self.read_json(PROFILES, year)?,
            dependencies: self.read_json(DEPENDENCIES, year)?,
            bilateral: self.read_json(BILATERAL, year)?,
            explorer: ExplorerIndex::from_rows(explorer),
        })
    }

    pub fn load_manifest(&self, year: i32) -> Result<Manifest> {
        self.read_json(MANIFEST, year)
    }

    /// Years with a results artifact, ascending.
    pub fn available_years(&self) -> Result<Vec<i32>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", RESULTS);
        let mut years = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(year) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|y| y.parse::<i32>().ok())
            {
                years.push(year);
            }
        }
        years.sort_unstable();
        Ok(years)
    }
}
