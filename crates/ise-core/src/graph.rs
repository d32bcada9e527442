//! Trade graph: one directed weighted country graph per industry and year.
//!
//! Backed by petgraph's `DiGraph` with a `BTreeMap` index from country
//! code to node, so every traversal visits countries in code order.
//! Edges point from exporter to importer and carry the trade value.

use crate::error::{GraphError, Result};
use crate::types::{CountryCode, TradeEdge};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::BTreeMap;

/// Directed exporter -> importer trade graph for one industry.
#[derive(Debug, Clone, Default)]
pub struct TradeGraph {
    graph: DiGraph<CountryCode, f64>,
    /// Map from country code to petgraph's internal index.
    node_index: BTreeMap<CountryCode, NodeIndex>,
}

impl TradeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from trade flows.
    ///
    /// Self-loops are dropped and repeated flows between the same pair are
    /// summed. Negative or non-finite values reject the whole graph, as do
    /// sums that overflow to infinity.
    pub fn from_edges<'a, I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a TradeEdge>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_trade(&edge.exporter, &edge.importer, edge.trade_value)?;
        }
        Ok(graph)
    }

    fn ensure_node(&mut self, country: &CountryCode) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(country) {
            return idx;
        }
        let idx = self.graph.add_node(country.clone());
        self.node_index.insert(country.clone(), idx);
        idx
    }

    /// Add a trade flow, accumulating onto an existing edge.
    pub fn add_trade(
        &mut self,
        exporter: &CountryCode,
        importer: &CountryCode,
        value: f64,
    ) -> Result<()> {
        if exporter.as_str().is_empty() || importer.as_str().is_empty() {
            return Err(GraphError::EmptyCountry.into());
        }
        if !value.is_finite() || value < 0.0 {
            return Err(GraphError::InvalidTradeValue {
                exporter: exporter.to_string(),
                importer: importer.to_string(),
                value,
            }
            .into());
        }
        if exporter == importer {
            return Ok(());
        }

        // Accumulated flows and inbound totals must stay finite.
        let edge_total = self.trade_value(exporter, importer) + value;
        let inbound = self.inbound_total(importer) + value;
        if !edge_total.is_finite() || !inbound.is_finite() {
            return Err(GraphError::InvalidTradeValue {
                exporter: exporter.to_string(),
                importer: importer.to_string(),
                value: if edge_total.is_finite() { inbound } else { edge_total },
            }
            .into());
        }

        let from = self.ensure_node(exporter);
        let to = self.ensure_node(importer);
        if let Some(edge_idx) = self.graph.find_edge(from, to) {
            self.graph[edge_idx] = edge_total;
        } else {
            self.graph.add_edge(from, to, value);
        }
        Ok(())
    }

    /// All countries, sorted by code.
    pub fn countries(&self) -> Vec<&CountryCode> {
        self.node_index.keys().collect()
    }

    pub fn contains(&self, country: &CountryCode) -> bool {
        self.node_index.contains_key(country)
    }

    /// Trade value on the exporter -> importer edge (0 if absent).
    pub fn trade_value(&self, exporter: &CountryCode, importer: &CountryCode) -> f64 {
        let (Some(&from), Some(&to)) = (self.node_index.get(exporter), self.node_index.get(importer))
        else {
            return 0.0;
        };
        self.graph
            .find_edge(from, to)
            .map(|e| self.graph[e])
            .unwrap_or(0.0)
    }

    /// Suppliers of `importer` with their trade values, sorted by code.
    pub fn suppliers(&self, importer: &CountryCode) -> Vec<(&CountryCode, f64)> {
        let Some(&idx) = self.node_index.get(importer) else {
            return Vec::new();
        };
        let mut out: Vec<(&CountryCode, f64)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| (&self.graph[edge.source()], *edge.weight()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Sum of all inbound trade to `importer`.
    pub fn inbound_total(&self, importer: &CountryCode) -> f64 {
        self.suppliers(importer).iter().map(|(_, v)| v).sum()
    }

    /// Direct dependency shares: for each importer, each supplier's share
    /// of its inbound trade. Importers with zero inbound trade get no entries.
    pub fn direct_shares(&self) -> ShareTable {
        let countries: Vec<CountryCode> = self.node_index.keys().cloned().collect();
        let position: BTreeMap<&CountryCode, usize> =
            countries.iter().enumerate().map(|(i, c)| (c, i)).collect();

        let mut suppliers = vec![Vec::new(); countries.len()];
        for (i, importer) in countries.iter().enumerate() {
            let inbound = self.suppliers(importer);
            let total: f64 = inbound.iter().map(|(_, v)| v).sum();
            if total <= 0.0 {
                continue;
            }
            suppliers[i] = inbound
                .into_iter()
                .filter(|(_, v)| *v > 0.0)
                .map(|(c, v)| (position[c], v / total))
                .collect();
        }

        ShareTable {
            countries,
            suppliers,
        }
    }

    /// Number of countries.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct exporter -> importer flows.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }
}

/// Dense-indexed view of direct shares used by path propagation.
///
/// `suppliers[i]` lists `(exporter index, share)` for importer `countries[i]`,
/// ordered by exporter code.
#[derive(Debug, Clone)]
pub struct ShareTable {
    pub countries: Vec<CountryCode>,
    pub suppliers: Vec<Vec<(usize, f64)>>,
}

impl ShareTable {
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Direct share of `exporter` in `importer`'s inbound trade.
    pub fn share(&self, exporter: usize, importer: usize) -> f64 {
        self.suppliers[importer]
            .iter()
            .find(|(e, _)| *e == exporter)
            .map(|(_, s)| *s)
            .unwrap_or(0.0)
    }
}
