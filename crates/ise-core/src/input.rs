//! Trade table input: per-year CSV of industry trade flows.
//!
//! Required columns: `industry,exporter,importer,trade_value`. The header
//! is checked before any row is read; a missing column fails the whole
//! table. Rows with bad values are charged to their industry so that the
//! caller can skip that industry and keep the rest.

use crate::error::{IseError, Result};
use crate::types::{IndustryId, TradeEdge};
use std::collections::BTreeMap;
use std::path::Path;

pub const TRADE_COLUMNS: [&str; 4] = ["industry", "exporter", "importer", "trade_value"];

/// Rows of one industry, plus the first problem found in them, if any.
#[derive(Debug, Clone, Default)]
pub struct IndustryRows {
    pub edges: Vec<TradeEdge>,
    pub error: Option<String>,
}

/// A year's trade table grouped by industry.
#[derive(Debug, Clone, Default)]
pub struct TradeTable {
    pub industries: BTreeMap<IndustryId, IndustryRows>,
}

impl TradeTable {
    pub fn industry_count(&self) -> usize {
        self.industries.len()
    }

    pub fn row_count(&self) -> usize {
        self.industries.values().map(|r| r.edges.len()).sum()
    }

    /// Add a row, attributing a parse problem to the row's industry.
    pub fn push_row(&mut self, industry: &str, exporter: &str, importer: &str, value: &str) {
        let rows = self.industries.entry(IndustryId::new(industry)).or_default();
        match value.parse::<f64>() {
            Ok(v) => rows.edges.push(TradeEdge::new(exporter, importer, v)),
            Err(_) => rows.record_error(format!(
                "unparsable trade_value {:?} on {} -> {}",
                value, exporter, importer
            )),
        }
    }

    /// Charge a row that could not be read to its industry.
    pub fn push_malformed(&mut self, industry: &str, reason: impl Into<String>) {
        self.industries
            .entry(IndustryId::new(industry))
            .or_default()
            .record_error(reason);
    }
}

impl IndustryRows {
    /// Keep the first problem only.
    fn record_error(&mut self, reason: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(reason.into());
        }
    }
}

/// Read a trade table from CSV.
pub fn read_trade_table(path: &Path) -> Result<TradeTable> {
    if !path.exists() {
        return Err(IseError::not_found(path.display().to_string()));
    }
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_from(reader, &path.display().to_string())
}

/// Read a trade table from any CSV reader (used by tests and stdin).
pub fn read_trade_csv<R: std::io::Read>(source: R, table: &str) -> Result<TradeTable> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    read_from(reader, table)
}

fn read_from<R: std::io::Read>(mut reader: csv::Reader<R>, table: &str) -> Result<TradeTable> {
    let headers = reader.headers()?.clone();
    let mut idx = [0usize; 4];
    for (slot, column) in idx.iter_mut().zip(TRADE_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| IseError::missing_field(table, column))?;
    }

    let mut out = TradeTable::default();
    for (n, row) in reader.records().enumerate() {
        let row = row?;
        let Some(industry) = row.get(idx[0]) else {
            return Err(IseError::malformed(format!(
                "{}: row {} has no industry field",
                table,
                n + 1
            )));
        };
        match (row.get(idx[1]), row.get(idx[2]), row.get(idx[3])) {
            (Some(exporter), Some(importer), Some(value)) => {
                out.push_row(industry, exporter, importer, value)
            }
            _ => out.push_malformed(
                industry,
                format!(
                    "row {} has {} fields, expected {}",
                    n + 1,
                    row.len(),
                    headers.len()
                ),
            ),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_rows_by_industry() {
        let csv = "industry,exporter,importer,trade_value\n\
                   C26,CHN,ESP,100\n\
                   C26,DEU,ESP,50\n\
                   C27,CHN,FRA,10\n";
        let table = read_trade_csv(csv.as_bytes(), "inline").unwrap();
        assert_eq!(table.industry_count(), 2);
        assert_eq!(table.row_count(), 3);
        assert!(table.industries.values().all(|r| r.error.is_none()));
    }

    #[test]
    fn column_order_is_free() {
        let csv = "trade_value,importer,exporter,industry\n7.5,ESP,CHN,C26\n";
        let table = read_trade_csv(csv.as_bytes(), "inline").unwrap();
        let rows = &table.industries[&IndustryId::new("C26")];
        assert_eq!(rows.edges[0].exporter.as_str(), "CHN");
        assert_eq!(rows.edges[0].trade_value, 7.5);
    }

    #[test]
    fn missing_column_fails_before_rows() {
        let csv = "industry,exporter,value\nC26,CHN,1\n";
        let err = read_trade_csv(csv.as_bytes(), "trade_2022.csv").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("importer"), "{}", msg);
    }

    #[test]
    fn bad_value_is_charged_to_its_industry() {
        let csv = "industry,exporter,importer,trade_value\n\
                   C26,CHN,ESP,abc\n\
                   C27,CHN,FRA,10\n";
        let table = read_trade_csv(csv.as_bytes(), "inline").unwrap();
        assert!(table.industries[&IndustryId::new("C26")].error.is_some());
        assert!(table.industries[&IndustryId::new("C27")].error.is_none());
    }

    #[test]
    fn short_row_is_charged_to_its_industry() {
        let csv = "industry,exporter,importer,trade_value\n\
                   C26,A,B,100\n\
                   C26,C,B,50\n\
                   C27,A,B\n";
        let table = read_trade_csv(csv.as_bytes(), "inline").unwrap();
        let c26 = &table.industries[&IndustryId::new("C26")];
        assert!(c26.error.is_none());
        assert_eq!(c26.edges.len(), 2);
        let c27 = &table.industries[&IndustryId::new("C27")];
        assert!(c27.edges.is_empty());
        assert!(c27.error.as_deref().unwrap().contains("3 fields"));
    }

    #[test]
    fn row_without_industry_fails_the_table() {
        let csv = "trade_value,importer,exporter,industry\n10,B,A\n";
        let err = read_trade_csv(csv.as_bytes(), "inline").unwrap_err();
        assert!(err.to_string().contains("no industry field"), "{}", err);
    }
}
