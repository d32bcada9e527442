//! Hub scoring: which countries act as intermediaries across industries.
//!
//! Frequency and strength are summed over every industry of the year,
//! each normalized by its year maximum, and combined as
//! `0.4 · freq_norm + 0.6 · strength_norm`.

use ise_core::types::{CountryCode, HubRecord, YearResults};
use std::collections::BTreeMap;

pub const FREQUENCY_WEIGHT: f64 = 0.4;
pub const STRENGTH_WEIGHT: f64 = 0.6;

/// Rank every intermediary of the year, highest score first.
pub fn score_hubs(results: &YearResults) -> Vec<HubRecord> {
    let mut totals: BTreeMap<&CountryCode, (u64, f64)> = BTreeMap::new();
    for result in results.industries.values() {
        for (country, freq) in &result.intermediary_frequency {
            totals.entry(country).or_default().0 += freq;
        }
        for (country, strength) in &result.intermediary_strength {
            totals.entry(country).or_default().1 += strength;
        }
    }
    if totals.is_empty() {
        return Vec::new();
    }

    let max_freq = totals.values().map(|t| t.0).max().unwrap_or(0);
    let max_strength = totals.values().map(|t| t.1).fold(0.0f64, f64::max);

    let mut hubs: Vec<HubRecord> = totals
        .into_iter()
        .map(|(country, (frequency_total, strength_total))| {
            let freq_norm = if max_freq > 0 {
                frequency_total as f64 / max_freq as f64
            } else {
                0.0
            };
            let strength_norm = if max_strength > 0.0 {
                strength_total / max_strength
            } else {
                0.0
            };
            HubRecord {
                country: country.clone(),
                year: results.year,
                frequency_total,
                strength_total,
                freq_norm,
                strength_norm,
                global_score: FREQUENCY_WEIGHT * freq_norm + STRENGTH_WEIGHT * strength_norm,
                global_rank: 0,
            }
        })
        .collect();

    hubs.sort_by(|a, b| {
        b.global_score
            .total_cmp(&a.global_score)
            .then_with(|| a.country.cmp(&b.country))
    });
    let ranks = min_ranks(hubs.iter().map(|h| h.global_score));
    for (hub, rank) in hubs.iter_mut().zip(ranks) {
        hub.global_rank = rank;
    }
    hubs
}

/// Competition ranks ("min" method) for scores already sorted descending:
/// equal scores share the lowest rank number of their run.
pub fn min_ranks<I>(sorted_desc: I) -> Vec<u32>
where
    I: IntoIterator<Item = f64>,
{
    let mut ranks = Vec::new();
    let mut previous: Option<f64> = None;
    let mut current = 0u32;
    for (i, score) in sorted_desc.into_iter().enumerate() {
        if previous != Some(score) {
            current = i as u32 + 1;
            previous = Some(score);
        }
        ranks.push(current);
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use ise_core::types::{EngineResult, IndustryId};

    fn industry(id: &str, freq: &[(&str, u64)], strength: &[(&str, f64)]) -> EngineResult {
        let mut result = EngineResult::empty(IndustryId::new(id));
        for (c, f) in freq {
            result.intermediary_frequency.insert((*c).into(), *f);
        }
        for (c, s) in strength {
            result.intermediary_strength.insert((*c).into(), *s);
        }
        result
    }

    fn year(results: Vec<EngineResult>) -> YearResults {
        let mut year = YearResults::new(2022);
        for r in results {
            year.industries.insert(r.industry.clone(), r);
        }
        year
    }

    #[test]
    fn sums_across_industries_and_normalizes() {
        let results = year(vec![
            industry("C26", &[("DEU", 4), ("NLD", 1)], &[("DEU", 0.8), ("NLD", 0.1)]),
            industry("C27", &[("DEU", 2), ("NLD", 3)], &[("DEU", 0.4), ("NLD", 0.5)]),
        ]);
        let hubs = score_hubs(&results);

        assert_eq!(hubs.len(), 2);
        let deu = &hubs[0];
        assert_eq!(deu.country.as_str(), "DEU");
        assert_eq!(deu.frequency_total, 6);
        assert!((deu.strength_total - 1.2).abs() < 1e-12);
        assert_eq!(deu.freq_norm, 1.0);
        assert_eq!(deu.strength_norm, 1.0);
        assert!((deu.global_score - 1.0).abs() < 1e-12);
        assert_eq!(deu.global_rank, 1);

        let nld = &hubs[1];
        assert!((nld.freq_norm - 4.0 / 6.0).abs() < 1e-12);
        assert!((nld.strength_norm - 0.5).abs() < 1e-12);
        assert!(nld.global_score >= 0.0 && nld.global_score <= 1.0);
        assert_eq!(nld.global_rank, 2);
        assert_eq!(nld.year, 2022);
    }

    #[test]
    fn ties_share_minimum_rank() {
        let results = year(vec![industry(
            "C26",
            &[("AAA", 2), ("BBB", 2), ("CCC", 1)],
            &[("AAA", 0.2), ("BBB", 0.2), ("CCC", 0.1)],
        )]);
        let hubs = score_hubs(&results);
        let ranks: Vec<u32> = hubs.iter().map(|h| h.global_rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn zero_activity_scores_zero() {
        let results = year(vec![industry("C26", &[("AAA", 0)], &[("AAA", 0.0)])]);
        let hubs = score_hubs(&results);
        assert_eq!(hubs[0].global_score, 0.0);
        assert_eq!(hubs[0].freq_norm, 0.0);
    }

    #[test]
    fn empty_year_has_no_hubs() {
        assert!(score_hubs(&YearResults::new(2020)).is_empty());
        let results = year(vec![EngineResult::empty(IndustryId::new("C26"))]);
        assert!(score_hubs(&results).is_empty());
    }

    #[test]
    fn min_rank_runs() {
        assert_eq!(min_ranks([0.9, 0.5, 0.5, 0.5, 0.1]), vec![1, 2, 2, 2, 5]);
        assert!(min_ranks(Vec::new()).is_empty());
    }
}
