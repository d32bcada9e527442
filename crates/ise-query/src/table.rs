//! Flat dependency table: one row per (year, industry, dependent, supplier).
//!
//! This is the shape dashboards query: engine records renamed to the
//! dependent/supplier vocabulary and stamped with their year.

use crate::column::{Column, KeyValue};
use crate::error::{QueryError, QueryResult};
use crate::filter::Filter;
use ise_core::types::{CountryCode, DependencyRecord, IndustryId, YearResults};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRow {
    pub year: i32,
    pub industry: IndustryId,
    pub dependent_country: CountryCode,
    pub supplier_country: CountryCode,
    pub dependency_value: f64,
    #[serde(rename = "direct_dependency")]
    pub direct: f64,
    #[serde(rename = "indirect_dependency")]
    pub indirect: f64,
    pub trade_value: f64,
    #[serde(rename = "longitud_optima")]
    pub chain_length: u32,
}

impl DependencyRow {
    pub fn from_record(year: i32, record: &DependencyRecord) -> Self {
        Self {
            year,
            industry: record.industry.clone(),
            dependent_country: record.importer.clone(),
            supplier_country: record.exporter.clone(),
            dependency_value: record.total,
            direct: record.direct,
            indirect: record.indirect,
            trade_value: record.trade_value,
            chain_length: record.chain_length,
        }
    }

    /// True when `country` appears in either role.
    pub fn involves(&self, country: &CountryCode) -> bool {
        &self.dependent_country == country || &self.supplier_country == country
    }
}

/// Aggregation applied to a numeric column within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agg {
    Mean,
    Sum,
    Count,
}

/// One output row of [`DependencyTable::group_by`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub key: Vec<KeyValue>,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyTable {
    rows: Vec<DependencyRow>,
}

impl DependencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<DependencyRow>) -> Self {
        Self { rows }
    }

    /// All records of one year.
    pub fn from_year(results: &YearResults) -> Self {
        let mut table = Self::new();
        table.push_year(results);
        table
    }

    /// Concatenate several years.
    pub fn from_years<'a, I>(years: I) -> Self
    where
        I: IntoIterator<Item = &'a YearResults>,
    {
        let mut table = Self::new();
        for results in years {
            table.push_year(results);
        }
        table
    }

    pub fn push_year(&mut self, results: &YearResults) {
        self.rows.extend(
            results
                .dependencies()
                .map(|record| DependencyRow::from_record(results.year, record)),
        );
    }

    pub fn rows(&self) -> &[DependencyRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<DependencyRow> {
        self.rows
    }

    /// Rows matching every criterion of `filter`.
    pub fn filter(&self, filter: &Filter) -> DependencyTable {
        Self::from_rows(self.rows.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    /// Aggregate `value` over groups keyed by `keys`, ordered by key.
    pub fn group_by(&self, keys: &[Column], value: Column, agg: Agg) -> QueryResult<Vec<GroupRow>> {
        for key in keys {
            key.ensure_key()?;
        }
        if agg != Agg::Count {
            value.ensure_numeric()?;
        }

        let mut groups: BTreeMap<Vec<KeyValue>, (f64, usize)> = BTreeMap::new();
        for row in &self.rows {
            let key: Vec<KeyValue> = keys.iter().filter_map(|k| k.key(row)).collect();
            let entry = groups.entry(key).or_default();
            entry.0 += value.number(row).unwrap_or(0.0);
            entry.1 += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(key, (sum, count))| GroupRow {
                key,
                value: match agg {
                    Agg::Sum => sum,
                    Agg::Count => count as f64,
                    Agg::Mean => sum / count as f64,
                },
            })
            .collect())
    }

    /// First `n` rows of each group after sorting by `sort`.
    ///
    /// Groups come out in key order. An empty `keys` slice means one group.
    pub fn top_n(&self, keys: &[Column], sort: Column, n: usize, descending: bool) -> QueryResult<DependencyTable> {
        for key in keys {
            key.ensure_key()?;
        }
        sort.ensure_numeric()?;

        let mut groups: BTreeMap<Vec<KeyValue>, Vec<&DependencyRow>> = BTreeMap::new();
        for row in &self.rows {
            let key: Vec<KeyValue> = keys.iter().filter_map(|k| k.key(row)).collect();
            groups.entry(key).or_default().push(row);
        }

        let mut out = Vec::new();
        for (_, mut rows) in groups {
            rows.sort_by(|a, b| {
                let (x, y) = (sort.number(a).unwrap_or(0.0), sort.number(b).unwrap_or(0.0));
                let ord = x.total_cmp(&y);
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
            out.extend(rows.into_iter().take(n).cloned());
        }
        Ok(Self::from_rows(out))
    }

    /// Distinct values of a key column, sorted.
    pub fn distinct(&self, column: Column) -> QueryResult<Vec<KeyValue>> {
        column.ensure_key()?;
        let values: BTreeSet<KeyValue> = self.rows.iter().filter_map(|r| column.key(r)).collect();
        Ok(values.into_iter().collect())
    }

    /// Rows sorted by a numeric column (stable).
    pub fn sorted_by(&self, column: Column, descending: bool) -> QueryResult<DependencyTable> {
        column.ensure_numeric()?;
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            let ord = column
                .number(a)
                .partial_cmp(&column.number(b))
                .unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
        Ok(Self::from_rows(rows))
    }

    /// Values of a numeric column in row order.
    pub fn numbers(&self, column: Column) -> QueryResult<Vec<f64>> {
        column.ensure_numeric()?;
        Ok(self.rows.iter().filter_map(|r| column.number(r)).collect())
    }

    pub(crate) fn require_rows(&self) -> QueryResult<()> {
        if self.rows.is_empty() {
            Err(QueryError::EmptyTable)
        } else {
            Ok(())
        }
    }
}

impl FromIterator<DependencyRow> for DependencyTable {
    fn from_iter<T: IntoIterator<Item = DependencyRow>>(iter: T) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, industry: &str, dep: &str, sup: &str, value: f64, trade: f64) -> DependencyRow {
        DependencyRow {
            year,
            industry: industry.into(),
            dependent_country: dep.into(),
            supplier_country: sup.into(),
            dependency_value: value,
            direct: value,
            indirect: 0.0,
            trade_value: trade,
            chain_length: 1,
        }
    }

    fn table() -> DependencyTable {
        DependencyTable::from_rows(vec![
            row(2021, "C26", "ESP", "CHN", 0.9, 100.0),
            row(2021, "C26", "ESP", "DEU", 0.1, 10.0),
            row(2021, "C27", "FRA", "CHN", 0.4, 40.0),
            row(2022, "C26", "ESP", "CHN", 0.7, 70.0),
            row(2022, "C27", "FRA", "DEU", 0.6, 60.0),
        ])
    }

    #[test]
    fn group_mean_sum_count() {
        let t = table();
        let mean = t
            .group_by(&[Column::DependentCountry], Column::DependencyValue, Agg::Mean)
            .unwrap();
        assert_eq!(mean.len(), 2);
        assert_eq!(mean[0].key, vec![KeyValue::Text("ESP".into())]);
        assert!((mean[0].value - (0.9 + 0.1 + 0.7) / 3.0).abs() < 1e-12);

        let sum = t
            .group_by(&[Column::Year], Column::TradeValue, Agg::Sum)
            .unwrap();
        assert_eq!(sum[0].key, vec![KeyValue::Int(2021)]);
        assert_eq!(sum[0].value, 150.0);

        let count = t
            .group_by(&[Column::Year, Column::Industry], Column::DependencyValue, Agg::Count)
            .unwrap();
        assert_eq!(count.len(), 4);
        assert_eq!(count[0].value, 2.0);
    }

    #[test]
    fn top_n_within_groups() {
        let top = table()
            .top_n(&[Column::Year], Column::DependencyValue, 1, true)
            .unwrap();
        let values: Vec<f64> = top.iter().map(|r| r.dependency_value).collect();
        assert_eq!(values, vec![0.9, 0.7]);

        let bottom = table().top_n(&[], Column::TradeValue, 2, false).unwrap();
        let trades: Vec<f64> = bottom.iter().map(|r| r.trade_value).collect();
        assert_eq!(trades, vec![10.0, 40.0]);
    }

    #[test]
    fn distinct_values_sorted() {
        let t = table();
        assert_eq!(
            t.distinct(Column::SupplierCountry).unwrap(),
            vec![KeyValue::Text("CHN".into()), KeyValue::Text("DEU".into())]
        );
        assert_eq!(
            t.distinct(Column::Year).unwrap(),
            vec![KeyValue::Int(2021), KeyValue::Int(2022)]
        );
    }

    #[test]
    fn wrong_column_kind_is_an_error() {
        let t = table();
        assert!(t.distinct(Column::DependencyValue).is_err());
        assert!(t.group_by(&[Column::TradeValue], Column::DependencyValue, Agg::Mean).is_err());
        assert!(t.group_by(&[Column::Year], Column::Industry, Agg::Sum).is_err());
        assert!(t.group_by(&[Column::Year], Column::Industry, Agg::Count).is_ok());
    }

    #[test]
    fn serialized_row_uses_dashboard_names() {
        let json = serde_json::to_value(&table().rows()[0]).unwrap();
        assert!(json.get("direct_dependency").is_some());
        assert!(json.get("longitud_optima").is_some());
        assert_eq!(json["dependent_country"], "ESP");
    }
}
