//! Dashboard statistics over a [`DependencyTable`].

use crate::error::QueryResult;
use crate::table::{DependencyRow, DependencyTable};
use ise_core::types::{CountryCode, IndustryId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Dependency level above which a record is counted as critical.
pub const CRITICAL_DEPENDENCY: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_records: usize,
    pub years: Vec<i32>,
    pub countries_dependent: usize,
    pub countries_supplier: usize,
    pub industries: usize,
    pub avg_dependency: f64,
    pub median_dependency: f64,
    /// Records strictly above [`CRITICAL_DEPENDENCY`].
    pub critical_dependencies: usize,
    pub max_dependency: f64,
    pub min_dependency: f64,
    pub avg_trade_value: f64,
    pub total_trade_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStatistics {
    pub country: CountryCode,
    pub dependencies_count: usize,
    pub supplies_count: usize,
    pub avg_dependency_as_dependent: f64,
    pub critical_dependencies: usize,
    /// Up to five suppliers with the highest dependency values.
    pub main_suppliers: Vec<CountryCode>,
    /// Up to five clients depending most on this country.
    pub main_clients: Vec<CountryCode>,
    pub industries_dependent: usize,
    pub industries_supplier: usize,
}

/// Per-year aggregate of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalRow {
    pub year: i32,
    pub dependency_value_mean: f64,
    pub dependency_value_median: f64,
    /// Sample standard deviation; 0 with fewer than two records.
    pub dependency_value_std: f64,
    pub dependency_value_count: usize,
    pub direct_dependency_mean: f64,
    pub indirect_dependency_mean: f64,
    pub trade_value_sum: f64,
    pub trade_value_mean: f64,
    pub longitud_optima_mean: f64,
}

/// Which side of a relation a country is aggregated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dependent,
    Supplier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryAggregate {
    pub country: CountryCode,
    pub avg_dependency: f64,
    pub max_dependency: f64,
    pub relations: usize,
    pub total_trade_value: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Counterparts of the `n` strongest rows.
fn top_counterparts<'a, I, F>(rows: I, n: usize, counterpart: F) -> Vec<CountryCode>
where
    I: IntoIterator<Item = &'a DependencyRow>,
    F: Fn(&DependencyRow) -> &CountryCode,
{
    let mut rows: Vec<&DependencyRow> = rows.into_iter().collect();
    rows.sort_by(|a, b| b.dependency_value.total_cmp(&a.dependency_value));
    rows.into_iter().map(|r| counterpart(r).clone()).take(n).collect()
}

/// Whole-table summary. Fails on an empty table.
pub fn summary_statistics(table: &DependencyTable) -> QueryResult<SummaryStatistics> {
    table.require_rows()?;
    let rows = table.rows();
    let values: Vec<f64> = rows.iter().map(|r| r.dependency_value).collect();
    let trades: Vec<f64> = rows.iter().map(|r| r.trade_value).collect();

    let years: BTreeSet<i32> = rows.iter().map(|r| r.year).collect();
    let dependents: BTreeSet<&CountryCode> = rows.iter().map(|r| &r.dependent_country).collect();
    let suppliers: BTreeSet<&CountryCode> = rows.iter().map(|r| &r.supplier_country).collect();
    let industries: BTreeSet<&IndustryId> = rows.iter().map(|r| &r.industry).collect();

    Ok(SummaryStatistics {
        total_records: rows.len(),
        years: years.into_iter().collect(),
        countries_dependent: dependents.len(),
        countries_supplier: suppliers.len(),
        industries: industries.len(),
        avg_dependency: mean(&values),
        median_dependency: median(&values),
        critical_dependencies: values.iter().filter(|v| **v > CRITICAL_DEPENDENCY).count(),
        max_dependency: values.iter().copied().fold(f64::MIN, f64::max),
        min_dependency: values.iter().copied().fold(f64::MAX, f64::min),
        avg_trade_value: mean(&trades),
        total_trade_value: trades.iter().sum(),
    })
}

/// Figures for one country in both roles.
pub fn country_statistics(table: &DependencyTable, country: &CountryCode) -> CountryStatistics {
    let as_dependent: Vec<&DependencyRow> =
        table.iter().filter(|r| &r.dependent_country == country).collect();
    let as_supplier: Vec<&DependencyRow> =
        table.iter().filter(|r| &r.supplier_country == country).collect();

    let dep_values: Vec<f64> = as_dependent.iter().map(|r| r.dependency_value).collect();
    let industries = |rows: &[&DependencyRow]| rows.iter().map(|r| &r.industry).collect::<BTreeSet<_>>().len();

    CountryStatistics {
        country: country.clone(),
        dependencies_count: as_dependent.len(),
        supplies_count: as_supplier.len(),
        avg_dependency_as_dependent: mean(&dep_values),
        critical_dependencies: dep_values.iter().filter(|v| **v > CRITICAL_DEPENDENCY).count(),
        main_suppliers: top_counterparts(as_dependent.iter().copied(), 5, |r| &r.supplier_country),
        main_clients: top_counterparts(as_supplier.iter().copied(), 5, |r| &r.dependent_country),
        industries_dependent: industries(as_dependent.as_slice()),
        industries_supplier: industries(as_supplier.as_slice()),
    }
}

/// Rows at or above `threshold`, strongest first, optionally truncated.
pub fn critical_dependencies(table: &DependencyTable, threshold: f64, top_n: Option<usize>) -> DependencyTable {
    let mut rows: Vec<DependencyRow> = table
        .iter()
        .filter(|r| r.dependency_value >= threshold)
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.dependency_value.total_cmp(&a.dependency_value));
    if let Some(n) = top_n {
        rows.truncate(n);
    }
    DependencyTable::from_rows(rows)
}

/// One row per year, ascending.
pub fn aggregate_temporal(table: &DependencyTable) -> Vec<TemporalRow> {
    let mut by_year: BTreeMap<i32, Vec<&DependencyRow>> = BTreeMap::new();
    for row in table.iter() {
        by_year.entry(row.year).or_default().push(row);
    }

    by_year
        .into_iter()
        .map(|(year, rows)| {
            let column = |f: fn(&DependencyRow) -> f64| rows.iter().map(|r| f(r)).collect::<Vec<f64>>();
            let values = column(|r| r.dependency_value);
            let trades = column(|r| r.trade_value);
            TemporalRow {
                year,
                dependency_value_mean: mean(&values),
                dependency_value_median: median(&values),
                dependency_value_std: sample_std(&values),
                dependency_value_count: values.len(),
                direct_dependency_mean: mean(&column(|r| r.direct)),
                indirect_dependency_mean: mean(&column(|r| r.indirect)),
                trade_value_sum: trades.iter().sum(),
                trade_value_mean: mean(&trades),
                longitud_optima_mean: mean(&column(|r| r.chain_length as f64)),
            }
        })
        .collect()
}

/// Per-country aggregate in one role, highest mean dependency first.
pub fn aggregate_by_country(table: &DependencyTable, role: Role) -> Vec<CountryAggregate> {
    let mut groups: BTreeMap<&CountryCode, Vec<&DependencyRow>> = BTreeMap::new();
    for row in table.iter() {
        let country = match role {
            Role::Dependent => &row.dependent_country,
            Role::Supplier => &row.supplier_country,
        };
        groups.entry(country).or_default().push(row);
    }

    let mut out: Vec<CountryAggregate> = groups
        .into_iter()
        .map(|(country, rows)| {
            let values: Vec<f64> = rows.iter().map(|r| r.dependency_value).collect();
            CountryAggregate {
                country: country.clone(),
                avg_dependency: mean(&values),
                max_dependency: values.iter().copied().fold(0.0, f64::max),
                relations: rows.len(),
                total_trade_value: rows.iter().map(|r| r.trade_value).sum(),
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.avg_dependency
            .total_cmp(&a.avg_dependency)
            .then_with(|| a.country.cmp(&b.country))
    });
    out
}
