//! Country profiles: vulnerability as importer, importance as exporter.
//!
//! All means are weighted by bilateral trade value. Effective suppliers
//! are computed per industry as `1 / HHI` and then averaged across the
//! importer's industries, weighted by that industry's import volume.

use crate::concentration::concentration;
use crate::hubs::min_ranks;
use ise_core::types::{CountryCode, CountryProfile, DependencyRecord, IndustryId, YearResults};
use std::collections::BTreeMap;

#[derive(Default)]
struct ImporterStats<'a> {
    weight: f64,
    weighted_total: f64,
    weighted_indirect: f64,
    /// Per industry: trade weight and dependency totals of each supplier.
    industries: BTreeMap<&'a IndustryId, (f64, Vec<f64>)>,
}

#[derive(Default)]
struct ExporterStats {
    weight: f64,
    weighted_total: f64,
}

/// Importer-side figures: (vulnerability, indirect_share, num_suppliers_effective).
fn importer_figures(stats: &ImporterStats<'_>) -> (f64, f64, f64) {
    if stats.weight <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let vulnerability = stats.weighted_total / stats.weight;
    let indirect = stats.weighted_indirect / stats.weight;
    let indirect_share = if vulnerability > 0.0 {
        indirect / vulnerability
    } else {
        0.0
    };

    let mut eff_sum = 0.0;
    let mut eff_weight = 0.0;
    for (weight, totals) in stats.industries.values() {
        let effective = concentration(totals.iter().copied()).effective_suppliers;
        eff_sum += effective * weight;
        eff_weight += weight;
    }
    let effective = if eff_weight > 0.0 { eff_sum / eff_weight } else { 0.0 };

    (vulnerability, indirect_share, effective)
}

/// Build one profile per country seen in either role during the year.
///
/// Sorted by vulnerability (rank 1 = most vulnerable), then country code.
pub fn build_profiles(results: &YearResults) -> Vec<CountryProfile> {
    build_profiles_from(results.year, results.dependencies())
}

/// Same as [`build_profiles`] over an arbitrary record set.
pub fn build_profiles_from<'a, I>(year: i32, records: I) -> Vec<CountryProfile>
where
    I: IntoIterator<Item = &'a DependencyRecord>,
{
    let mut importers: BTreeMap<&CountryCode, ImporterStats<'_>> = BTreeMap::new();
    let mut exporters: BTreeMap<&CountryCode, ExporterStats> = BTreeMap::new();

    for dep in records {
        let w = dep.trade_value;

        let imp = importers.entry(&dep.importer).or_default();
        imp.weight += w;
        imp.weighted_total += dep.total * w;
        imp.weighted_indirect += dep.indirect * w;
        let industry = imp.industries.entry(&dep.industry).or_default();
        industry.0 += w;
        industry.1.push(dep.total);

        let exp = exporters.entry(&dep.exporter).or_default();
        exp.weight += w;
        exp.weighted_total += dep.total * w;
    }

    let mut countries: Vec<&CountryCode> = importers.keys().chain(exporters.keys()).copied().collect();
    countries.sort();
    countries.dedup();

    let mut profiles: Vec<CountryProfile> = countries
        .into_iter()
        .map(|country| {
            let (vulnerability, indirect_share, num_suppliers_effective) = importers
                .get(country)
                .map(importer_figures)
                .unwrap_or((0.0, 0.0, 0.0));
            let importance = exporters
                .get(country)
                .filter(|e| e.weight > 0.0)
                .map(|e| e.weighted_total / e.weight)
                .unwrap_or(0.0);
            CountryProfile {
                country: country.clone(),
                year,
                vulnerability,
                importance,
                indirect_share,
                num_suppliers_effective,
                global_rank: 0,
            }
        })
        .collect();

    profiles.sort_by(|a, b| {
        b.vulnerability
            .total_cmp(&a.vulnerability)
            .then_with(|| a.country.cmp(&b.country))
    });
    let ranks = min_ranks(profiles.iter().map(|p| p.vulnerability));
    for (profile, rank) in profiles.iter_mut().zip(ranks) {
        profile.global_rank = rank;
    }
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(
        industry: &str,
        exporter: &str,
        importer: &str,
        direct: f64,
        indirect: f64,
        trade: f64,
    ) -> DependencyRecord {
        DependencyRecord {
            exporter: exporter.into(),
            importer: importer.into(),
            industry: industry.into(),
            direct,
            indirect,
            total: direct + indirect,
            trade_value: trade,
            chain_length: 1,
        }
    }

    fn find<'a>(profiles: &'a [CountryProfile], code: &str) -> &'a CountryProfile {
        profiles.iter().find(|p| p.country.as_str() == code).unwrap()
    }

    #[test]
    fn weighted_vulnerability_and_importance() {
        let records = vec![
            dep("C26", "CHN", "ESP", 0.6, 0.2, 300.0),
            dep("C26", "DEU", "ESP", 0.2, 0.0, 100.0),
        ];
        let profiles = build_profiles_from(2022, &records);

        let esp = find(&profiles, "ESP");
        // (0.8 * 300 + 0.2 * 100) / 400
        assert!((esp.vulnerability - 0.65).abs() < 1e-12);
        // indirect mean = 0.2 * 300 / 400 = 0.15
        assert!((esp.indirect_share - 0.15 / 0.65).abs() < 1e-12);
        assert_eq!(esp.importance, 0.0);
        assert_eq!(esp.global_rank, 1);

        let chn = find(&profiles, "CHN");
        assert!((chn.importance - 0.8).abs() < 1e-12);
        assert_eq!(chn.vulnerability, 0.0);
        assert_eq!(chn.num_suppliers_effective, 0.0);
    }

    #[test]
    fn effective_suppliers_two_equal() {
        let records = vec![
            dep("C26", "CHN", "ESP", 0.5, 0.0, 50.0),
            dep("C26", "DEU", "ESP", 0.5, 0.0, 50.0),
        ];
        let profiles = build_profiles_from(2022, &records);
        let esp = find(&profiles, "ESP");
        assert!((esp.num_suppliers_effective - 2.0).abs() < 1e-12);
    }

    #[test]
    fn effective_suppliers_weighted_across_industries() {
        let records = vec![
            // C26: single supplier -> 1 effective, weight 100
            dep("C26", "CHN", "ESP", 1.0, 0.0, 100.0),
            // C27: two equal -> 2 effective, weight 300
            dep("C27", "CHN", "ESP", 0.5, 0.0, 150.0),
            dep("C27", "DEU", "ESP", 0.5, 0.0, 150.0),
        ];
        let profiles = build_profiles_from(2022, &records);
        let esp = find(&profiles, "ESP");
        assert!((esp.num_suppliers_effective - (1.0 * 100.0 + 2.0 * 300.0) / 400.0).abs() < 1e-12);
    }

    #[test]
    fn zero_trade_weight_gives_zero() {
        let records = vec![dep("C26", "CHN", "ESP", 0.0, 0.4, 0.0)];
        let profiles = build_profiles_from(2022, &records);
        let esp = find(&profiles, "ESP");
        assert_eq!(esp.vulnerability, 0.0);
        assert_eq!(esp.indirect_share, 0.0);
        assert_eq!(esp.num_suppliers_effective, 0.0);
        assert!(esp.vulnerability.is_finite());
    }

    #[test]
    fn ranks_descend_by_vulnerability() {
        let records = vec![
            dep("C26", "CHN", "ESP", 0.9, 0.0, 10.0),
            dep("C26", "CHN", "FRA", 0.3, 0.0, 10.0),
            dep("C26", "CHN", "ITA", 0.3, 0.0, 10.0),
        ];
        let profiles = build_profiles_from(2022, &records);
        assert_eq!(find(&profiles, "ESP").global_rank, 1);
        assert_eq!(find(&profiles, "FRA").global_rank, 2);
        assert_eq!(find(&profiles, "ITA").global_rank, 2);
        assert_eq!(find(&profiles, "CHN").global_rank, 4);
    }

    #[test]
    fn empty_year_has_no_profiles() {
        assert!(build_profiles(&YearResults::new(2022)).is_empty());
    }
}
