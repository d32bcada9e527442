//! Row filters.
//!
//! Every criterion is optional; an empty [`Filter`] matches everything.
//! Set criteria are combined with AND.

use crate::table::DependencyRow;
use ise_core::types::{CountryCode, IndustryId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub year: Option<i32>,
    /// Matches the dependent or the supplier side.
    pub country: Option<CountryCode>,
    pub dependent: Option<CountryCode>,
    pub supplier: Option<CountryCode>,
    pub industry: Option<IndustryId>,
    pub min_dependency: Option<f64>,
    pub max_dependency: Option<f64>,
    pub chain_length: Option<u32>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(CountryCode::new(country));
        self
    }

    pub fn dependent(mut self, country: impl Into<String>) -> Self {
        self.dependent = Some(CountryCode::new(country));
        self
    }

    pub fn supplier(mut self, country: impl Into<String>) -> Self {
        self.supplier = Some(CountryCode::new(country));
        self
    }

    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(IndustryId::new(industry));
        self
    }

    /// Inclusive lower bound on `dependency_value`.
    pub fn min_dependency(mut self, value: f64) -> Self {
        self.min_dependency = Some(value);
        self
    }

    /// Inclusive upper bound on `dependency_value`.
    pub fn max_dependency(mut self, value: f64) -> Self {
        self.max_dependency = Some(value);
        self
    }

    pub fn chain_length(mut self, hops: u32) -> Self {
        self.chain_length = Some(hops);
        self
    }

    pub fn matches(&self, row: &DependencyRow) -> bool {
        self.year.map_or(true, |y| row.year == y)
            && self.country.as_ref().map_or(true, |c| row.involves(c))
            && self.dependent.as_ref().map_or(true, |c| &row.dependent_country == c)
            && self.supplier.as_ref().map_or(true, |c| &row.supplier_country == c)
            && self.industry.as_ref().map_or(true, |i| &row.industry == i)
            && self.min_dependency.map_or(true, |m| row.dependency_value >= m)
            && self.max_dependency.map_or(true, |m| row.dependency_value <= m)
            && self.chain_length.map_or(true, |n| row.chain_length == n)
    }
}
