//! Dependency decomposition engine.
//!
//! For one industry's trade graph, computes for every importer I and every
//! exporter E:
//!
//! 1. **Direct dependency**: E's share of I's inbound trade.
//! 2. **Indirect dependency**: the sum, over every simple chain
//!    E → X₁ → … → Xₖ → I of at most `max_depth` hops, of the product of
//!    the direct shares along the chain.
//! 3. **Critical paths**: multi-hop chains whose strength reaches
//!    `critical_path_threshold`, kept per pair as alternative routes.
//! 4. **Intermediary statistics**: how often and how strongly each country
//!    sits inside a critical path.
//!
//! Chains are explored backwards from the importer with a depth-first walk
//! over suppliers in country-code order. A chain never revisits a country,
//! so the chains ending at a given exporter are disjoint events of a
//! backward supplier walk and the total stays within [0, 1].
//! Propagation stops once a chain's strength drops below `min_path_strength`.

use crate::config::EngineConfig;
use ise_core::error::Result;
use ise_core::graph::{ShareTable, TradeGraph};
use ise_core::types::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Per-exporter accumulation for one importer.
struct PairAccumulator {
    /// Contribution by hop count (index 0 = direct).
    by_length: Vec<f64>,
    /// Multi-hop routes above the critical threshold: (intermediaries, strength).
    routes: Vec<(Vec<usize>, f64)>,
}

impl PairAccumulator {
    fn new(max_depth: usize) -> Self {
        Self {
            by_length: vec![0.0; max_depth],
            routes: Vec::new(),
        }
    }
}

/// Computes an [`EngineResult`] from one industry's trade graph.
#[derive(Debug, Clone, Default)]
pub struct DecompositionEngine {
    config: EngineConfig,
}

impl DecompositionEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the graph from raw flows and decompose it.
    ///
    /// Fails if any flow is malformed; the caller decides whether that
    /// skips the industry.
    pub fn decompose_edges(&self, industry: &IndustryId, edges: &[TradeEdge]) -> Result<EngineResult> {
        let graph = TradeGraph::from_edges(edges)?;
        Ok(self.decompose(industry, &graph))
    }

    /// Decompose one industry graph. Output is a pure function of the graph.
    pub fn decompose(&self, industry: &IndustryId, graph: &TradeGraph) -> EngineResult {
        if graph.is_empty() {
            return EngineResult::empty(industry.clone());
        }

        let shares = graph.direct_shares();
        let mut result = EngineResult::empty(industry.clone());

        for importer in 0..shares.len() {
            if shares.suppliers[importer].is_empty() {
                continue;
            }
            let pairs = self.propagate(&shares, importer);
            self.emit(&shares, graph, importer, pairs, &mut result);
        }

        for path in &result.critical_paths {
            for hop in &path.intermediaries {
                *result.intermediary_frequency.entry(hop.clone()).or_insert(0) += 1;
                *result.intermediary_strength.entry(hop.clone()).or_insert(0.0) += path.strength;
            }
        }

        debug!(
            industry = %industry,
            countries = graph.node_count(),
            flows = graph.edge_count(),
            dependencies = result.dependencies.len(),
            critical_paths = result.critical_paths.len(),
            "Decomposed industry"
        );
        result
    }

    /// Walk every simple supplier chain ending at `importer`.
    fn propagate(&self, shares: &ShareTable, importer: usize) -> BTreeMap<usize, PairAccumulator> {
        let mut pairs: BTreeMap<usize, PairAccumulator> = BTreeMap::new();
        let mut on_chain = vec![false; shares.len()];
        on_chain[importer] = true;
        // Chain from the importer backwards, importer excluded.
        let mut chain: Vec<usize> = Vec::with_capacity(self.config.max_depth);

        self.walk(shares, importer, 1.0, &mut chain, &mut on_chain, &mut pairs);
        pairs
    }

    fn walk(
        &self,
        shares: &ShareTable,
        node: usize,
        strength: f64,
        chain: &mut Vec<usize>,
        on_chain: &mut [bool],
        pairs: &mut BTreeMap<usize, PairAccumulator>,
    ) {
        let hops = chain.len() + 1;
        for &(supplier, share) in &shares.suppliers[node] {
            if on_chain[supplier] {
                continue;
            }
            let reach = strength * share;
            if hops > 1 && reach < self.config.min_path_strength {
                continue;
            }

            let acc = pairs
                .entry(supplier)
                .or_insert_with(|| PairAccumulator::new(self.config.max_depth));
            acc.by_length[hops - 1] += reach;
            if hops > 1 && reach >= self.config.critical_path_threshold {
                // Flow order: exporter side first.
                let intermediaries: Vec<usize> = chain.iter().rev().copied().collect();
                acc.routes.push((intermediaries, reach));
            }

            if hops < self.config.max_depth && reach >= self.config.min_path_strength {
                on_chain[supplier] = true;
                chain.push(supplier);
                self.walk(shares, supplier, reach, chain, on_chain, pairs);
                chain.pop();
                on_chain[supplier] = false;
            }
        }
    }

    fn emit(
        &self,
        shares: &ShareTable,
        graph: &TradeGraph,
        importer: usize,
        pairs: BTreeMap<usize, PairAccumulator>,
        result: &mut EngineResult,
    ) {
        let importer_code = &shares.countries[importer];

        for (exporter, mut acc) in pairs {
            let exporter_code = &shares.countries[exporter];
            let direct = acc.by_length[0];
            let propagated: f64 = acc.by_length[1..].iter().sum();
            let total = (direct + propagated).min(1.0);
            let indirect = (total - direct).max(0.0);

            if direct <= 0.0 && total < self.config.min_dependency {
                continue;
            }

            result.dependencies.push(DependencyRecord {
                exporter: exporter_code.clone(),
                importer: importer_code.clone(),
                industry: result.industry.clone(),
                direct,
                indirect,
                total: direct + indirect,
                trade_value: graph.trade_value(exporter_code, importer_code),
                chain_length: dominant_length(&acc.by_length),
            });

            if acc.routes.is_empty() {
                continue;
            }
            acc.routes.sort_by(|a, b| compare_routes(shares, a, b));
            acc.routes.truncate(self.config.max_paths_per_pair);

            let paths: Vec<CriticalPath> = acc
                .routes
                .into_iter()
                .map(|(via, strength)| CriticalPath {
                    exporter: exporter_code.clone(),
                    importer: importer_code.clone(),
                    intermediaries: via.into_iter().map(|i| shares.countries[i].clone()).collect(),
                    strength,
                })
                .collect();
            result.critical_paths.extend(paths.iter().cloned());
            result
                .critical_intermediaries
                .insert(pair_key(exporter_code, importer_code), paths);
        }
    }
}

/// Strongest first; ties broken by the intermediary codes in lexicographic order.
fn compare_routes(shares: &ShareTable, a: &(Vec<usize>, f64), b: &(Vec<usize>, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| {
        let codes_a = a.0.iter().map(|&i| &shares.countries[i]);
        let codes_b = b.0.iter().map(|&i| &shares.countries[i]);
        codes_a.cmp(codes_b)
    })
}

/// Hop count whose class carries the most dependency; shorter wins ties.
fn dominant_length(by_length: &[f64]) -> u32 {
    let mut best = 0;
    for (i, value) in by_length.iter().enumerate() {
        if *value > by_length[best] {
            best = i;
        }
    }
    best as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn c(code: &str) -> CountryCode {
        CountryCode::new(code)
    }

    fn run(edges: &[TradeEdge]) -> EngineResult {
        DecompositionEngine::default()
            .decompose_edges(&IndustryId::new("C26"), edges)
            .unwrap()
    }

    fn scenario() -> Vec<TradeEdge> {
        vec![
            TradeEdge::new("A", "B", 100.0),
            TradeEdge::new("C", "B", 50.0),
            TradeEdge::new("A", "C", 30.0),
        ]
    }

    #[test]
    fn three_country_propagation() {
        let result = run(&scenario());

        let ab = result.dependency(&c("A"), &c("B")).unwrap();
        assert!((ab.direct - 2.0 / 3.0).abs() < EPS, "direct = {}", ab.direct);
        // A -> C -> B: share(A,C) = 1.0 times share(C,B) = 1/3
        assert!((ab.indirect - 1.0 / 3.0).abs() < EPS, "indirect = {}", ab.indirect);
        assert!(ab.total > ab.direct);
        assert!(ab.total <= 1.0);
        assert_eq!(ab.chain_length, 1);
        assert_eq!(ab.trade_value, 100.0);

        let cb = result.dependency(&c("C"), &c("B")).unwrap();
        assert!((cb.direct - 1.0 / 3.0).abs() < EPS);
        assert_eq!(cb.indirect, 0.0);

        let ac = result.dependency(&c("A"), &c("C")).unwrap();
        assert!((ac.direct - 1.0).abs() < EPS);
    }

    #[test]
    fn critical_paths_and_intermediaries() {
        let result = run(&scenario());

        assert_eq!(result.critical_paths.len(), 1);
        let path = &result.critical_paths[0];
        assert_eq!(path.exporter, c("A"));
        assert_eq!(path.importer, c("B"));
        assert_eq!(path.intermediaries, vec![c("C")]);
        assert!((path.strength - 1.0 / 3.0).abs() < EPS);

        assert_eq!(result.alternative_paths(&c("A"), &c("B")), 1);
        assert_eq!(result.intermediary_frequency[&c("C")], 1);
        assert!((result.intermediary_strength[&c("C")] - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn direct_shares_sum_to_one_per_importer() {
        let edges = vec![
            TradeEdge::new("CHN", "ESP", 40.0),
            TradeEdge::new("DEU", "ESP", 35.0),
            TradeEdge::new("FRA", "ESP", 25.0),
            TradeEdge::new("CHN", "DEU", 60.0),
            TradeEdge::new("USA", "DEU", 40.0),
            TradeEdge::new("DEU", "FRA", 10.0),
        ];
        let result = run(&edges);

        let mut by_importer: BTreeMap<&CountryCode, f64> = BTreeMap::new();
        for dep in &result.dependencies {
            *by_importer.entry(&dep.importer).or_insert(0.0) += dep.direct;
        }
        for (importer, sum) in by_importer {
            assert!((sum - 1.0).abs() < 1e-9, "{} direct sum = {}", importer, sum);
        }
    }

    #[test]
    fn totals_stay_bounded_on_dense_graph() {
        let codes = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"];
        let mut edges = Vec::new();
        for (i, from) in codes.iter().enumerate() {
            for (j, to) in codes.iter().enumerate() {
                if i != j {
                    edges.push(TradeEdge::new(*from, *to, 1.0 + ((i * 7 + j * 3) % 5) as f64));
                }
            }
        }
        let result = run(&edges);

        assert!(!result.dependencies.is_empty());
        for dep in &result.dependencies {
            assert!(dep.direct >= 0.0 && dep.indirect >= 0.0);
            assert!(dep.total <= 1.0 + EPS, "total = {}", dep.total);
            assert!((dep.direct + dep.indirect - dep.total).abs() < EPS);
            dep.validate().unwrap();
        }
    }

    #[test]
    fn zero_inbound_importer_has_no_dependency() {
        let edges = vec![TradeEdge::new("A", "B", 0.0), TradeEdge::new("A", "C", 5.0)];
        let result = run(&edges);
        assert_eq!(result.direct_dependency(&c("A"), &c("B")), 0.0);
        assert!(result.dependency(&c("A"), &c("B")).is_none());
        assert_eq!(result.direct_dependency(&c("A"), &c("C")), 1.0);
    }

    #[test]
    fn empty_graph_yields_empty_result() {
        let result = run(&[]);
        assert!(result.dependencies.is_empty());
        assert!(result.critical_paths.is_empty());
        assert!(result.intermediary_frequency.is_empty());
    }

    #[test]
    fn depth_bound_limits_chains() {
        // A -> B -> C -> D -> E, a single chain of 4 hops from A to E
        let edges = vec![
            TradeEdge::new("A", "B", 1.0),
            TradeEdge::new("B", "C", 1.0),
            TradeEdge::new("C", "D", 1.0),
            TradeEdge::new("D", "E", 1.0),
        ];
        let shallow = DecompositionEngine::new(EngineConfig {
            max_depth: 2,
            ..EngineConfig::default()
        })
        .unwrap()
        .decompose_edges(&IndustryId::new("X"), &edges)
        .unwrap();
        assert!(shallow.dependency(&c("A"), &c("E")).is_none());
        assert!(shallow.dependency(&c("C"), &c("E")).is_some());

        let deep = run(&edges);
        let ae = deep.dependency(&c("A"), &c("E")).unwrap();
        assert_eq!(ae.direct, 0.0);
        assert!((ae.indirect - 1.0).abs() < EPS);
        assert_eq!(ae.chain_length, 4);
        assert_eq!(ae.trade_value, 0.0);
    }

    #[test]
    fn equal_routes_break_ties_lexicographically() {
        // Two routes of equal strength from A to D: via B and via C
        let edges = vec![
            TradeEdge::new("A", "C", 10.0),
            TradeEdge::new("A", "B", 10.0),
            TradeEdge::new("C", "D", 10.0),
            TradeEdge::new("B", "D", 10.0),
        ];
        let result = run(&edges);
        let routes = &result.critical_intermediaries[&pair_key(&c("A"), &c("D"))];
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].intermediaries, vec![c("B")]);
        assert_eq!(routes[1].intermediaries, vec![c("C")]);
    }

    #[test]
    fn max_paths_per_pair_truncates() {
        let mut edges = Vec::new();
        for hub in ["H1", "H2", "H3", "H4"] {
            edges.push(TradeEdge::new("SRC", hub, 1.0));
            edges.push(TradeEdge::new(hub, "DST", 1.0));
        }
        let engine = DecompositionEngine::new(EngineConfig {
            max_paths_per_pair: 2,
            ..EngineConfig::default()
        })
        .unwrap();
        let result = engine
            .decompose_edges(&IndustryId::new("X"), &edges)
            .unwrap();
        assert_eq!(result.alternative_paths(&c("SRC"), &c("DST")), 2);
    }

    #[test]
    fn decomposition_is_deterministic() {
        let edges = vec![
            TradeEdge::new("CHN", "ESP", 40.0),
            TradeEdge::new("DEU", "ESP", 35.0),
            TradeEdge::new("CHN", "DEU", 60.0),
            TradeEdge::new("USA", "DEU", 40.0),
            TradeEdge::new("USA", "CHN", 5.0),
            TradeEdge::new("DEU", "CHN", 5.0),
        ];
        let first = run(&edges);
        let second = run(&edges);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn malformed_graph_is_an_error() {
        let engine = DecompositionEngine::default();
        let err = engine.decompose_edges(&IndustryId::new("X"), &[TradeEdge::new("A", "B", -3.0)]);
        assert!(err.is_err());
    }

    #[test]
    fn dominant_length_prefers_shorter_on_tie() {
        assert_eq!(dominant_length(&[0.5, 0.5, 0.0]), 1);
        assert_eq!(dominant_length(&[0.1, 0.6, 0.3]), 2);
        assert_eq!(dominant_length(&[0.0, 0.0, 0.0]), 1);
    }
}
