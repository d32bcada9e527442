//! Critical relation detection.
//!
//! A relation is critical when the importer's total dependency on the
//! exporter reaches the threshold. Its criticality falls with the number
//! of alternative routes recorded by the engine for that pair.

use crate::config::CriticalConfig;
use ise_core::types::{criticality, CriticalLink, YearResults};

/// Every qualifying (exporter, importer, industry) relation of the year.
pub fn detect_critical(results: &YearResults, config: &CriticalConfig) -> Vec<CriticalLink> {
    let mut links = Vec::new();
    for (industry, result) in &results.industries {
        for dep in &result.dependencies {
            if dep.total < config.threshold {
                continue;
            }
            let alternative_paths = result.alternative_paths(&dep.exporter, &dep.importer);
            if config.strict && alternative_paths >= 3 {
                continue;
            }
            links.push(CriticalLink {
                year: results.year,
                industry: industry.clone(),
                exporter: dep.exporter.clone(),
                importer: dep.importer.clone(),
                total: dep.total,
                direct: dep.direct,
                indirect: dep.indirect,
                hidden_risk_factor: dep.hidden_risk_factor(),
                hidden_risk_abs: dep.total - dep.direct,
                alternative_paths,
                criticality: criticality(alternative_paths),
            });
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use ise_core::types::*;

    fn dep(exporter: &str, importer: &str, direct: f64, indirect: f64) -> DependencyRecord {
        DependencyRecord {
            exporter: exporter.into(),
            importer: importer.into(),
            industry: "C26".into(),
            direct,
            indirect,
            total: direct + indirect,
            trade_value: 1.0,
            chain_length: 1,
        }
    }

    fn route(exporter: &str, importer: &str, via: &str) -> CriticalPath {
        CriticalPath {
            exporter: exporter.into(),
            importer: importer.into(),
            intermediaries: vec![via.into()],
            strength: 0.1,
        }
    }

    fn fixture() -> YearResults {
        let mut result = EngineResult::empty("C26".into());
        result.dependencies = vec![
            dep("CHN", "ESP", 0.6, 0.2),  // 0.8, no routes
            dep("CHN", "FRA", 0.5, 0.25), // 0.75, three routes
            dep("DEU", "ESP", 0.5, 0.05), // 0.55, one route
            dep("USA", "ESP", 0.1, 0.0),
        ];
        result.critical_intermediaries.insert(
            pair_key(&"CHN".into(), &"FRA".into()),
            vec![
                route("CHN", "FRA", "BEL"),
                route("CHN", "FRA", "DEU"),
                route("CHN", "FRA", "ITA"),
            ],
        );
        result.critical_intermediaries.insert(
            pair_key(&"DEU".into(), &"ESP".into()),
            vec![route("DEU", "ESP", "FRA")],
        );
        let mut year = YearResults::new(2021);
        year.industries.insert("C26".into(), result);
        year
    }

    #[test]
    fn strict_mode_drops_redundant_relations() {
        let links = detect_critical(&fixture(), &CriticalConfig::strict());
        assert_eq!(links.len(), 1);
        let link = &links[0];
        assert_eq!(link.exporter.as_str(), "CHN");
        assert_eq!(link.importer.as_str(), "ESP");
        assert_eq!(link.alternative_paths, 0);
        assert_eq!(link.criticality, 1.0);
        assert_eq!(link.year, 2021);
        assert!((link.hidden_risk_abs - 0.2).abs() < 1e-12);
        assert!((link.hidden_risk_factor - 0.25).abs() < 1e-6);
    }

    #[test]
    fn broad_mode_keeps_all_above_threshold() {
        let links = detect_critical(&fixture(), &CriticalConfig::broad());
        assert_eq!(links.len(), 3);

        let fra = links.iter().find(|l| l.importer.as_str() == "FRA").unwrap();
        assert_eq!(fra.alternative_paths, 3);
        assert_eq!(fra.criticality, 0.0);

        let deu = links.iter().find(|l| l.exporter.as_str() == "DEU").unwrap();
        assert!((deu.criticality - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn every_link_meets_threshold() {
        let config = CriticalConfig::strict();
        for link in detect_critical(&fixture(), &config) {
            assert!(link.total >= config.threshold);
            assert!((0.0..=1.0).contains(&link.criticality));
        }
    }

    #[test]
    fn empty_industry_emits_nothing() {
        let mut year = YearResults::new(2021);
        year.industries
            .insert("C26".into(), EngineResult::empty("C26".into()));
        assert!(detect_critical(&year, &CriticalConfig::broad()).is_empty());
    }
}
