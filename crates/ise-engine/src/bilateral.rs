//! Bilateral risk and top-dependency tables.

use crate::config::{BilateralConfig, DependenciesConfig};
use ise_core::types::{criticality, CountryCode, IndustryId, YearResults};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A significant exporter -> importer relation in one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilateralRisk {
    pub exporter: CountryCode,
    pub importer: CountryCode,
    pub industry: IndustryId,
    /// 0 below the critical threshold, else `1 - min(paths, 3) / 3`.
    #[serde(rename = "criticidad")]
    pub criticality: f64,
    pub dependency: f64,
}

/// One row of the per-country dependency treemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDependency {
    pub dependent_country: CountryCode,
    pub industry: IndustryId,
    pub dependency_value: f64,
}

/// Every relation whose total dependency exceeds `min_dependency`.
pub fn bilateral_risk(results: &YearResults, config: &BilateralConfig) -> Vec<BilateralRisk> {
    let mut rows = Vec::new();
    for (industry, result) in &results.industries {
        for dep in &result.dependencies {
            if dep.total <= config.min_dependency {
                continue;
            }
            let criticality = if dep.total >= config.critical_threshold {
                criticality(result.alternative_paths(&dep.exporter, &dep.importer))
            } else {
                0.0
            };
            rows.push(BilateralRisk {
                exporter: dep.exporter.clone(),
                importer: dep.importer.clone(),
                industry: industry.clone(),
                criticality,
                dependency: dep.total,
            });
        }
    }
    rows
}

/// Highest dependencies per dependent country across all industries.
///
/// Rows are sorted by value descending (ties by country, industry).
pub fn top_dependencies(results: &YearResults, config: &DependenciesConfig) -> Vec<TopDependency> {
    let mut rows: Vec<TopDependency> = results
        .dependencies()
        .map(|dep| TopDependency {
            dependent_country: dep.importer.clone(),
            industry: dep.industry.clone(),
            dependency_value: dep.total,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.dependency_value
            .total_cmp(&a.dependency_value)
            .then_with(|| a.dependent_country.cmp(&b.dependent_country))
            .then_with(|| a.industry.cmp(&b.industry))
    });

    let mut kept: BTreeMap<CountryCode, usize> = BTreeMap::new();
    rows.retain(|row| {
        let count = kept.entry(row.dependent_country.clone()).or_insert(0);
        *count += 1;
        *count <= config.top_n
    });
    rows
}
