//! Shared types used across the engine, aggregators and query layer.
//!
//! Field names on the serialized records follow the engine output
//! contract consumed by the dashboard (`exportador`, `importador`,
//! `dependencia_total`, ...). In Rust they use plain English names.

use crate::error::{IseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tolerance used when checking the `total = direct + indirect` invariant.
pub const DEPENDENCY_TOLERANCE: f64 = 1e-9;

/// ISO-style country code (e.g. `ESP`, `CHN`).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(pub String);

impl CountryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Industry identifier as it appears in the trade tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustryId(pub String);

impl IndustryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndustryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IndustryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One directed trade flow inside an industry graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEdge {
    pub exporter: CountryCode,
    pub importer: CountryCode,
    pub trade_value: f64,
}

impl TradeEdge {
    pub fn new(exporter: impl Into<String>, importer: impl Into<String>, trade_value: f64) -> Self {
        Self {
            exporter: CountryCode::new(exporter),
            importer: CountryCode::new(importer),
            trade_value,
        }
    }
}

/// Dependency of one importer on one exporter within an industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    #[serde(rename = "exportador")]
    pub exporter: CountryCode,
    #[serde(rename = "importador")]
    pub importer: CountryCode,
    pub industry: IndustryId,
    #[serde(rename = "dependencia_directa")]
    pub direct: f64,
    #[serde(rename = "dependencia_indirecta")]
    pub indirect: f64,
    #[serde(rename = "dependencia_total")]
    pub total: f64,
    /// Bilateral trade value exporter -> importer (0 for indirect-only relations).
    pub trade_value: f64,
    /// Hop count of the path class contributing most to `total`.
    #[serde(rename = "longitud_optima")]
    pub chain_length: u32,
}

impl DependencyRecord {
    /// Check the record's numeric invariants.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("dependencia_directa", self.direct),
            ("dependencia_indirecta", self.indirect),
            ("dependencia_total", self.total),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 || value > 1.0 + DEPENDENCY_TOLERANCE {
                return Err(IseError::malformed(format!(
                    "{} = {} for {} -> {} in {}",
                    name, value, self.exporter, self.importer, self.industry
                )));
            }
        }
        if (self.direct + self.indirect - self.total).abs() > 1e-6 {
            return Err(IseError::malformed(format!(
                "dependencia_total != directa + indirecta for {} -> {} in {}",
                self.exporter, self.importer, self.industry
            )));
        }
        if !self.trade_value.is_finite() || self.trade_value < 0.0 {
            return Err(IseError::malformed(format!(
                "trade_value = {} for {} -> {}",
                self.trade_value, self.exporter, self.importer
            )));
        }
        Ok(())
    }

    /// Share of the total that flows through intermediaries.
    pub fn hidden_risk_factor(&self) -> f64 {
        self.indirect / (self.total + 1e-9)
    }
}

/// One multi-hop route by which dependency flows from exporter to importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPath {
    #[serde(rename = "exportador")]
    pub exporter: CountryCode,
    #[serde(rename = "importador")]
    pub importer: CountryCode,
    /// Intermediary countries in flow order (exporter side first).
    #[serde(rename = "intermediarios")]
    pub intermediaries: Vec<CountryCode>,
    /// Product of the hop shares along the route.
    #[serde(rename = "fuerza")]
    pub strength: f64,
}

impl CriticalPath {
    /// Number of trade hops in the route.
    pub fn hops(&self) -> usize {
        self.intermediaries.len() + 1
    }

    /// Intermediaries joined for display, e.g. `DEU → FRA`.
    pub fn route_label(&self) -> String {
        self.intermediaries
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Key of `critical_intermediaries`: `"exporter->importer"`.
pub fn pair_key(exporter: &CountryCode, importer: &CountryCode) -> String {
    format!("{}->{}", exporter, importer)
}

/// Decomposition output for one industry and one year.
///
/// Immutable once produced by the engine; aggregators only read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineResult {
    pub industry: IndustryId,
    pub dependencies: Vec<DependencyRecord>,
    pub critical_paths: Vec<CriticalPath>,
    /// Alternative routes per `"exporter->importer"` pair, strongest first.
    pub critical_intermediaries: BTreeMap<String, Vec<CriticalPath>>,
    pub intermediary_frequency: BTreeMap<CountryCode, u64>,
    pub intermediary_strength: BTreeMap<CountryCode, f64>,
}

impl EngineResult {
    /// Empty result for an industry without trade.
    pub fn empty(industry: IndustryId) -> Self {
        Self {
            industry,
            ..Self::default()
        }
    }

    /// The record for a pair, if the engine emitted one.
    pub fn dependency(
        &self,
        exporter: &CountryCode,
        importer: &CountryCode,
    ) -> Option<&DependencyRecord> {
        self.dependencies
            .iter()
            .find(|d| &d.exporter == exporter && &d.importer == importer)
    }

    /// Direct dependency of `importer` on `exporter` (0 when no record exists).
    pub fn direct_dependency(&self, exporter: &CountryCode, importer: &CountryCode) -> f64 {
        self.dependency(exporter, importer)
            .map(|d| d.direct)
            .unwrap_or(0.0)
    }

    /// Number of alternative routes recorded for a pair.
    pub fn alternative_paths(&self, exporter: &CountryCode, importer: &CountryCode) -> usize {
        self.critical_intermediaries
            .get(&pair_key(exporter, importer))
            .map(|paths| paths.len())
            .unwrap_or(0)
    }

    /// Total trade value flowing into `importer` across its records.
    pub fn import_volume(&self, importer: &CountryCode) -> f64 {
        self.dependencies
            .iter()
            .filter(|d| &d.importer == importer)
            .map(|d| d.trade_value)
            .sum()
    }

    /// Validate a result loaded from outside the engine.
    pub fn validate(&self) -> Result<()> {
        for dep in &self.dependencies {
            if dep.industry != self.industry {
                return Err(IseError::malformed(format!(
                    "record for industry {} inside result for {}",
                    dep.industry, self.industry
                )));
            }
            dep.validate()?;
        }
        for path in &self.critical_paths {
            if !path.strength.is_finite() || path.strength < 0.0 {
                return Err(IseError::malformed(format!(
                    "fuerza = {} on {} -> {}",
                    path.strength, path.exporter, path.importer
                )));
            }
        }
        for (key, paths) in &self.critical_intermediaries {
            if let Some(p) = paths.iter().find(|p| &pair_key(&p.exporter, &p.importer) != key) {
                return Err(IseError::malformed(format!(
                    "path {} -> {} filed under {}",
                    p.exporter, p.importer, key
                )));
            }
        }
        Ok(())
    }
}

/// An industry excluded from a year's aggregation, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedIndustry {
    pub industry: IndustryId,
    pub reason: String,
}

/// All engine results for one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearResults {
    pub year: i32,
    pub industries: BTreeMap<IndustryId, EngineResult>,
    #[serde(default)]
    pub skipped: Vec<SkippedIndustry>,
}

impl YearResults {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    /// Every dependency record of the year, in industry order.
    pub fn dependencies(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.industries.values().flat_map(|r| r.dependencies.iter())
    }

    pub fn validate(&self) -> Result<()> {
        for (industry, result) in &self.industries {
            if industry != &result.industry {
                return Err(IseError::malformed(format!(
                    "result for {} stored under {}",
                    result.industry, industry
                )));
            }
            result.validate()?;
        }
        Ok(())
    }
}

/// Global intermediary ranking entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubRecord {
    pub country: CountryCode,
    pub year: i32,
    pub frequency_total: u64,
    pub strength_total: f64,
    pub freq_norm: f64,
    pub strength_norm: f64,
    pub global_score: f64,
    pub global_rank: u32,
}

/// A high-dependency relation with little path redundancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalLink {
    pub year: i32,
    pub industry: IndustryId,
    #[serde(rename = "exportador")]
    pub exporter: CountryCode,
    #[serde(rename = "importador")]
    pub importer: CountryCode,
    #[serde(rename = "dependencia_total")]
    pub total: f64,
    #[serde(rename = "dependencia_directa")]
    pub direct: f64,
    #[serde(rename = "dependencia_indirecta")]
    pub indirect: f64,
    pub hidden_risk_factor: f64,
    pub hidden_risk_abs: f64,
    #[serde(rename = "caminos_alternativos")]
    pub alternative_paths: usize,
    #[serde(rename = "criticidad")]
    pub criticality: f64,
}

/// Per-country vulnerability and importance for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryProfile {
    pub country: CountryCode,
    pub year: i32,
    pub vulnerability: f64,
    pub importance: f64,
    pub indirect_share: f64,
    pub num_suppliers_effective: f64,
    pub global_rank: u32,
}

/// `1 - min(paths, 3) / 3`: 1 with no alternative route, 0 with three or more.
pub fn criticality(alternative_paths: usize) -> f64 {
    1.0 - (alternative_paths.min(3) as f64) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(direct: f64, indirect: f64) -> DependencyRecord {
        DependencyRecord {
            exporter: "CHN".into(),
            importer: "ESP".into(),
            industry: "C26".into(),
            direct,
            indirect,
            total: direct + indirect,
            trade_value: 10.0,
            chain_length: 1,
        }
    }

    #[test]
    fn empty_result_keeps_its_industry() {
        let result = EngineResult::empty(IndustryId::new("C26"));
        assert_eq!(result.industry.as_str(), "C26");
        assert!(result.dependencies.is_empty());
        assert!(result.critical_paths.is_empty());
        assert_eq!(IndustryId::default().as_str(), "");
    }

    #[test]
    fn criticality_bounds() {
        assert_eq!(criticality(0), 1.0);
        assert!((criticality(1) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(criticality(3), 0.0);
        assert_eq!(criticality(10), 0.0);
    }

    #[test]
    fn record_validation() {
        assert!(record(0.6, 0.3).validate().is_ok());
        assert!(record(-0.1, 0.3).validate().is_err());
        assert!(record(0.9, 0.5).validate().is_err());

        let mut broken = record(0.2, 0.2);
        broken.total = 0.9;
        assert!(broken.validate().is_err());
    }

    #[test]
    fn serialized_names_follow_output_contract() {
        let json = serde_json::to_value(record(0.5, 0.1)).unwrap();
        assert!(json.get("exportador").is_some());
        assert!(json.get("dependencia_total").is_some());
        assert!(json.get("longitud_optima").is_some());
        assert_eq!(json["importador"], "ESP");
    }

    #[test]
    fn alternative_paths_by_pair_key() {
        let mut result = EngineResult::empty("C26".into());
        let path = CriticalPath {
            exporter: "CHN".into(),
            importer: "ESP".into(),
            intermediaries: vec!["DEU".into()],
            strength: 0.2,
        };
        result
            .critical_intermediaries
            .insert(pair_key(&path.exporter, &path.importer), vec![path]);

        assert_eq!(result.alternative_paths(&"CHN".into(), &"ESP".into()), 1);
        assert_eq!(result.alternative_paths(&"USA".into(), &"ESP".into()), 0);
        assert!(result.validate().is_ok());
    }
}
