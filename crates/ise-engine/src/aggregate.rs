//! Year aggregation: every derived table from one immutable result set.

use crate::bilateral::{bilateral_risk, top_dependencies, BilateralRisk, TopDependency};
use crate::config::AggregationConfig;
use crate::critical::detect_critical;
use crate::explorer::{build_explorer, ExplorerIndex};
use crate::hubs::score_hubs;
use crate::profiles::build_profiles;
use ise_core::types::{CountryProfile, CriticalLink, HubRecord, YearResults};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Derived tables of one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearTables {
    pub year: i32,
    pub hubs: Vec<HubRecord>,
    pub critical: Vec<CriticalLink>,
    pub profiles: Vec<CountryProfile>,
    pub dependencies: Vec<TopDependency>,
    pub bilateral: Vec<BilateralRisk>,
    pub explorer: ExplorerIndex,
}

/// Run all aggregators over `results`.
///
/// The passes only read `results` and run concurrently.
pub fn aggregate_year(results: &YearResults, config: &AggregationConfig) -> YearTables {
    let ((hubs, critical), ((profiles, dependencies), (bilateral, explorer))) = rayon::join(
        || {
            rayon::join(
                || score_hubs(results),
                || detect_critical(results, &config.critical),
            )
        },
        || {
            rayon::join(
                || {
                    rayon::join(
                        || build_profiles(results),
                        || top_dependencies(results, &config.dependencies),
                    )
                },
                || {
                    rayon::join(
                        || bilateral_risk(results, &config.bilateral),
                        || build_explorer(results, &config.explorer),
                    )
                },
            )
        },
    );

    debug!(
        year = results.year,
        hubs = hubs.len(),
        critical = critical.len(),
        profiles = profiles.len(),
        explorer = explorer.len(),
        "Aggregated year"
    );

    YearTables {
        year: results.year,
        hubs,
        critical,
        profiles,
        dependencies,
        bilateral,
        explorer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ise_core::types::{EngineResult, IndustryId};

    #[test]
    fn empty_industry_yields_empty_tables() {
        let mut year = YearResults::new(2019);
        year.industries
            .insert(IndustryId::new("C26"), EngineResult::empty(IndustryId::new("C26")));

        let tables = aggregate_year(&year, &AggregationConfig::default());
        assert_eq!(tables.year, 2019);
        assert!(tables.hubs.is_empty());
        assert!(tables.critical.is_empty());
        assert!(tables.profiles.is_empty());
        assert!(tables.dependencies.is_empty());
        assert!(tables.bilateral.is_empty());
        assert!(tables.explorer.is_empty());
    }
}
