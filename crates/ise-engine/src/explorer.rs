//! Industry explorer: ranked suppliers per (importer, industry).
//!
//! For each importer within an industry, suppliers are ranked by total
//! dependency and the top K are kept. Each kept supplier carries its
//! strongest critical path and the sector's concentration figures.
//! The result is indexed importer -> industry for constant-time lookup.

use crate::concentration::concentration;
use crate::config::ExplorerConfig;
use ise_core::types::{CountryCode, CriticalPath, DependencyRecord, EngineResult, IndustryId, YearResults};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ranked supplier of an importer within an industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerEntry {
    pub importer: CountryCode,
    pub exporter: CountryCode,
    pub industry: IndustryId,
    pub dep_total: f64,
    pub dep_direct: f64,
    pub dep_indirect: f64,
    /// Intermediaries of the strongest route; empty when none was recorded.
    pub top_intermediary: Vec<CountryCode>,
    pub path_strength: f64,
    pub hhi_sector: f64,
    pub eff_suppliers_sector: f64,
}

/// importer -> industry -> ranked suppliers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorerIndex {
    pub entries: BTreeMap<CountryCode, BTreeMap<IndustryId, Vec<ExplorerEntry>>>,
}

impl ExplorerIndex {
    /// Rebuild the index from flat rows already in rank order.
    pub fn from_rows<I: IntoIterator<Item = ExplorerEntry>>(rows: I) -> Self {
        let mut index = Self::default();
        for row in rows {
            index
                .entries
                .entry(row.importer.clone())
                .or_default()
                .entry(row.industry.clone())
                .or_default()
                .push(row);
        }
        index
    }

    /// Ranked suppliers for one importer in one industry.
    pub fn lookup(&self, importer: &CountryCode, industry: &IndustryId) -> Option<&[ExplorerEntry]> {
        self.entries
            .get(importer)?
            .get(industry)
            .map(|v| v.as_slice())
    }

    /// Industries in which `importer` has ranked suppliers.
    pub fn industries_of(&self, importer: &CountryCode) -> Vec<&IndustryId> {
        self.entries
            .get(importer)
            .map(|m| m.keys().collect())
            .unwrap_or_default()
    }

    /// Flat rows, importer then industry then rank order.
    pub fn rows(&self) -> Vec<&ExplorerEntry> {
        self.entries
            .values()
            .flat_map(|m| m.values())
            .flat_map(|v| v.iter())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.values().flat_map(|m| m.values()).map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the explorer index for every industry of the year.
pub fn build_explorer(results: &YearResults, config: &ExplorerConfig) -> ExplorerIndex {
    let mut index = ExplorerIndex::default();
    for (industry, result) in &results.industries {
        for (importer, entries) in explore_industry(result, config) {
            index
                .entries
                .entry(importer)
                .or_default()
                .insert(industry.clone(), entries);
        }
    }
    index
}

/// Ranked suppliers per importer for a single industry.
pub fn explore_industry(
    result: &EngineResult,
    config: &ExplorerConfig,
) -> BTreeMap<CountryCode, Vec<ExplorerEntry>> {
    let mut strongest: BTreeMap<(&CountryCode, &CountryCode), &CriticalPath> = BTreeMap::new();
    for path in &result.critical_paths {
        strongest
            .entry((&path.importer, &path.exporter))
            .and_modify(|best| {
                if path.strength > best.strength {
                    *best = path;
                }
            })
            .or_insert(path);
    }

    let mut by_importer: BTreeMap<&CountryCode, Vec<&DependencyRecord>> = BTreeMap::new();
    for dep in &result.dependencies {
        by_importer.entry(&dep.importer).or_default().push(dep);
    }

    let mut out = BTreeMap::new();
    for (importer, mut deps) in by_importer {
        let sector = concentration(deps.iter().map(|d| d.total));

        deps.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.exporter.cmp(&b.exporter)));
        let entries: Vec<ExplorerEntry> = deps
            .into_iter()
            .filter(|d| d.total >= config.min_dependency)
            .take(config.top_k)
            .map(|dep| {
                let best = strongest.get(&(importer, &dep.exporter));
                ExplorerEntry {
                    importer: importer.clone(),
                    exporter: dep.exporter.clone(),
                    industry: result.industry.clone(),
                    dep_total: dep.total,
                    dep_direct: dep.direct,
                    dep_indirect: dep.indirect,
                    top_intermediary: best.map(|p| p.intermediaries.clone()).unwrap_or_default(),
                    path_strength: best.map(|p| p.strength).unwrap_or(0.0),
                    hhi_sector: sector.hhi,
                    eff_suppliers_sector: sector.effective_suppliers,
                }
            })
            .collect();
        if !entries.is_empty() {
            out.insert(importer.clone(), entries);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decompose::DecompositionEngine;
    use ise_core::types::TradeEdge;

    fn c(code: &str) -> CountryCode {
        CountryCode::new(code)
    }

    fn sample() -> EngineResult {
        let edges = vec![
            TradeEdge::new("A", "B", 100.0),
            TradeEdge::new("C", "B", 50.0),
            TradeEdge::new("A", "C", 30.0),
            TradeEdge::new("D", "B", 10.0),
        ];
        DecompositionEngine::new(EngineConfig::default())
            .unwrap()
            .decompose_edges(&IndustryId::new("C26"), &edges)
            .unwrap()
    }

    #[test]
    fn ranks_suppliers_and_attaches_strongest_path() {
        let ranked = explore_industry(&sample(), &ExplorerConfig::default());
        let b = &ranked[&c("B")];

        assert_eq!(b[0].exporter, c("A"));
        assert!(b.windows(2).all(|w| w[0].dep_total >= w[1].dep_total));
        assert_eq!(b[0].top_intermediary, vec![c("C")]);
        assert!(b[0].path_strength > 0.0);

        let d = b.iter().find(|e| e.exporter == c("D")).unwrap();
        assert!(d.top_intermediary.is_empty());
        assert_eq!(d.path_strength, 0.0);

        assert!(b[0].hhi_sector > 0.0 && b[0].hhi_sector <= 1.0);
        assert!(b[0].eff_suppliers_sector >= 1.0);
    }

    #[test]
    fn top_k_truncates() {
        let config = ExplorerConfig {
            top_k: 1,
            min_dependency: 0.0,
        };
        let ranked = explore_industry(&sample(), &config);
        assert_eq!(ranked[&c("B")].len(), 1);
    }

    #[test]
    fn single_supplier_sector() {
        let ranked = explore_industry(&sample(), &ExplorerConfig::default());
        let cc = &ranked[&c("C")];
        assert_eq!(cc.len(), 1);
        assert_eq!(cc[0].hhi_sector, 1.0);
        assert_eq!(cc[0].eff_suppliers_sector, 1.0);
    }

    #[test]
    fn index_lookup() {
        let mut year = YearResults::new(2022);
        year.industries.insert(IndustryId::new("C26"), sample());
        year.industries
            .insert(IndustryId::new("C99"), EngineResult::empty(IndustryId::new("C99")));

        let index = build_explorer(&year, &ExplorerConfig::default());
        assert!(index.lookup(&c("B"), &IndustryId::new("C26")).is_some());
        assert!(index.lookup(&c("B"), &IndustryId::new("C99")).is_none());
        assert!(index.lookup(&c("ZZZ"), &IndustryId::new("C26")).is_none());
        assert_eq!(index.industries_of(&c("B")), vec![&IndustryId::new("C26")]);
        assert_eq!(index.rows().len(), index.len());

        let rebuilt = ExplorerIndex::from_rows(index.rows().into_iter().cloned());
        assert_eq!(rebuilt, index);
    }
}
