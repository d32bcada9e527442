//! Year batch runner.
//!
//! A year is read from `trade_<year>.csv`, decomposed industry by industry
//! in parallel, aggregated, and written to the artifact store. An industry
//! whose rows or graph are malformed is skipped and recorded; the rest of
//! the year still completes.

use crate::aggregate::{aggregate_year, YearTables};
use crate::artifacts::{ArtifactStore, Manifest};
use crate::config::{AggregationConfig, EngineConfig};
use crate::decompose::DecompositionEngine;
use ise_core::error::{IseError, Result};
use ise_core::input::{read_trade_table, TradeTable};
use ise_core::types::{EngineResult, IndustryId, SkippedIndustry, YearResults};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Results and derived tables of one processed year.
#[derive(Debug, Clone)]
pub struct YearRun {
    pub results: YearResults,
    pub tables: YearTables,
    pub manifest: Manifest,
}

/// Location of a year's trade table inside `input_dir`.
pub fn trade_file(input_dir: &Path, year: i32) -> PathBuf {
    input_dir.join(format!("trade_{}.csv", year))
}

/// Decomposes and aggregates whole years.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    engine: DecompositionEngine,
    aggregation: AggregationConfig,
}

impl BatchRunner {
    pub fn new(engine: EngineConfig, aggregation: AggregationConfig) -> Result<Self> {
        aggregation.validate()?;
        Ok(Self {
            engine: DecompositionEngine::new(engine)?,
            aggregation,
        })
    }

    pub fn engine(&self) -> &DecompositionEngine {
        &self.engine
    }

    pub fn aggregation(&self) -> &AggregationConfig {
        &self.aggregation
    }

    /// Decompose every industry of a trade table.
    ///
    /// Industries with bad rows or an invalid graph go to `skipped`.
    pub fn decompose_table(&self, year: i32, table: &TradeTable) -> YearResults {
        let outcomes: Vec<(IndustryId, std::result::Result<EngineResult, String>)> = table
            .industries
            .par_iter()
            .map(|(industry, rows)| {
                let outcome = match &rows.error {
                    Some(reason) => Err(reason.clone()),
                    None => self
                        .engine
                        .decompose_edges(industry, &rows.edges)
                        .map_err(|e| e.to_string()),
                };
                (industry.clone(), outcome)
            })
            .collect();

        let mut results = YearResults::new(year);
        for (industry, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    results.industries.insert(industry, result);
                }
                Err(reason) => {
                    warn!(year, industry = %industry, %reason, "Skipping industry");
                    results.skipped.push(SkippedIndustry { industry, reason });
                }
            }
        }
        results
    }

    /// Read, decompose and aggregate one year without touching the store.
    pub fn process_year(&self, year: i32, input_dir: &Path) -> Result<YearRun> {
        let path = trade_file(input_dir, year);
        if !path.exists() {
            return Err(IseError::year_not_processed(
                year,
                format!("no trade table at {}", path.display()),
            ));
        }

        info!(year, path = %path.display(), "Processing year");
        let table = read_trade_table(&path)?;
        info!(
            year,
            industries = table.industry_count(),
            rows = table.row_count(),
            "Loaded trade table"
        );

        let results = self.decompose_table(year, &table);
        let tables = aggregate_year(&results, &self.aggregation);
        let manifest = Manifest::new(&results, path.display().to_string());

        info!(
            year,
            industries = results.industries.len(),
            skipped = results.skipped.len(),
            critical = tables.critical.len(),
            "Year complete"
        );
        Ok(YearRun {
            results,
            tables,
            manifest,
        })
    }

    /// Process a year and persist every artifact.
    pub fn run_year(&self, year: i32, input_dir: &Path, store: &ArtifactStore) -> Result<YearRun> {
        let run = self.process_year(year, input_dir)?;
        store.save_year(&run.results, &run.tables, &run.manifest)?;
        #[cfg(feature = "sqlite")]
        crate::sqlite_store::export_year(store, &run.results, &run.tables)?;
        Ok(run)
    }

    /// Recompute the derived tables from stored engine results.
    pub fn reaggregate(&self, year: i32, store: &ArtifactStore) -> Result<YearTables> {
        let results = store.load_results(year)?;
        Ok(aggregate_year(&results, &self.aggregation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ise_core::input::read_trade_csv;

    fn runner() -> BatchRunner {
        BatchRunner::new(EngineConfig::default(), AggregationConfig::default()).unwrap()
    }

    #[test]
    fn bad_industry_is_skipped() {
        let csv = "industry,exporter,importer,trade_value\n\
                   C26,A,B,100\n\
                   C26,C,B,50\n\
                   C27,A,B,abc\n\
                   C28,A,B,-5\n";
        let table = read_trade_csv(csv.as_bytes(), "inline").unwrap();
        let results = runner().decompose_table(2022, &table);

        assert_eq!(results.industries.len(), 1);
        assert!(results.industries.contains_key(&IndustryId::new("C26")));
        let skipped: Vec<&str> = results.skipped.iter().map(|s| s.industry.as_str()).collect();
        assert_eq!(skipped, vec!["C27", "C28"]);
    }

    #[test]
    fn missing_trade_file_is_year_not_processed() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = runner().process_year(2003, dir.path()).unwrap_err();
        assert!(matches!(err, IseError::YearNotProcessed(2003, _)));
    }

    #[test]
    fn invalid_aggregation_config_is_rejected() {
        let mut aggregation = AggregationConfig::default();
        aggregation.dependencies.top_n = 0;
        assert!(BatchRunner::new(EngineConfig::default(), aggregation).is_err());
    }
}
