//! Multi-year evolution of country profiles and critical relations.

use ise_core::types::{CountryCode, CountryProfile, YearResults};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dependency level at which a relation counts toward the critical series.
pub const HIGH_DEPENDENCY: f64 = 0.7;

/// One country's figures in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub year: i32,
    pub vulnerability: f64,
    pub importance: f64,
    pub global_rank: u32,
}

/// Relations at or above [`HIGH_DEPENDENCY`] in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalCount {
    pub year: i32,
    pub count: usize,
}

/// Per-country time series plus the yearly critical count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evolution {
    pub countries: BTreeMap<CountryCode, Vec<EvolutionPoint>>,
    pub critical_counts: Vec<CriticalCount>,
}

impl Evolution {
    /// Add one year. Years may arrive in any order; series stay sorted.
    pub fn add_year(&mut self, results: &YearResults, profiles: &[CountryProfile]) {
        let year = results.year;
        for profile in profiles {
            let series = self.countries.entry(profile.country.clone()).or_default();
            series.retain(|p| p.year != year);
            series.push(EvolutionPoint {
                year,
                vulnerability: profile.vulnerability,
                importance: profile.importance,
                global_rank: profile.global_rank,
            });
            series.sort_by_key(|p| p.year);
        }

        let count = results
            .dependencies()
            .filter(|d| d.total >= HIGH_DEPENDENCY)
            .count();
        self.critical_counts.retain(|c| c.year != year);
        self.critical_counts.push(CriticalCount { year, count });
        self.critical_counts.sort_by_key(|c| c.year);
    }

    pub fn series(&self, country: &CountryCode) -> Option<&[EvolutionPoint]> {
        self.countries.get(country).map(|s| s.as_slice())
    }

    pub fn years(&self) -> Vec<i32> {
        self.critical_counts.iter().map(|c| c.year).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::build_profiles;
    use ise_core::types::{DependencyRecord, EngineResult, IndustryId};

    fn year(year: i32, totals: &[f64]) -> YearResults {
        let mut result = EngineResult::empty(IndustryId::new("C26"));
        for (i, total) in totals.iter().enumerate() {
            result.dependencies.push(DependencyRecord {
                exporter: CountryCode::new(format!("X{}", i)),
                importer: "ESP".into(),
                industry: IndustryId::new("C26"),
                direct: *total,
                indirect: 0.0,
                total: *total,
                trade_value: 10.0,
                chain_length: 1,
            });
        }
        let mut results = YearResults::new(year);
        results.industries.insert(IndustryId::new("C26"), result);
        results
    }

    #[test]
    fn series_sorted_and_counts_per_year() {
        let mut evolution = Evolution::default();
        for results in [year(2021, &[0.9, 0.1]), year(2019, &[0.7, 0.75, 0.2])] {
            let profiles = build_profiles(&results);
            evolution.add_year(&results, &profiles);
        }

        assert_eq!(evolution.years(), vec![2019, 2021]);
        assert_eq!(evolution.critical_counts[0].count, 2);
        assert_eq!(evolution.critical_counts[1].count, 1);

        let esp = evolution.series(&"ESP".into()).unwrap();
        assert_eq!(esp.iter().map(|p| p.year).collect::<Vec<_>>(), vec![2019, 2021]);
        assert!((esp[1].vulnerability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn re_adding_a_year_replaces_it() {
        let mut evolution = Evolution::default();
        let results = year(2020, &[0.8]);
        let profiles = build_profiles(&results);
        evolution.add_year(&results, &profiles);
        evolution.add_year(&results, &profiles);
        assert_eq!(evolution.critical_counts.len(), 1);
        assert_eq!(evolution.series(&"ESP".into()).unwrap().len(), 1);
    }
}
