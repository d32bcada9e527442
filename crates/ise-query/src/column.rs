//! Column addressing for grouped queries.

use crate::error::{QueryError, QueryResult};
use crate::table::DependencyRow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A column of [`DependencyRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Year,
    Industry,
    DependentCountry,
    SupplierCountry,
    ChainLength,
    DependencyValue,
    Direct,
    Indirect,
    TradeValue,
}

/// A grouping key value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Int(v) => write!(f, "{}", v),
            KeyValue::Text(s) => f.write_str(s),
        }
    }
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Year,
        Column::Industry,
        Column::DependentCountry,
        Column::SupplierCountry,
        Column::ChainLength,
        Column::DependencyValue,
        Column::Direct,
        Column::Indirect,
        Column::TradeValue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Year => "year",
            Column::Industry => "industry",
            Column::DependentCountry => "dependent_country",
            Column::SupplierCountry => "supplier_country",
            Column::ChainLength => "longitud_optima",
            Column::DependencyValue => "dependency_value",
            Column::Direct => "direct_dependency",
            Column::Indirect => "indirect_dependency",
            Column::TradeValue => "trade_value",
        }
    }

    /// Columns usable as a grouping key.
    pub fn is_key(self) -> bool {
        matches!(
            self,
            Column::Year
                | Column::Industry
                | Column::DependentCountry
                | Column::SupplierCountry
                | Column::ChainLength
        )
    }

    /// Columns that can be summed or averaged.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Column::Industry | Column::DependentCountry | Column::SupplierCountry
        )
    }

    pub(crate) fn ensure_key(self) -> QueryResult<()> {
        if self.is_key() {
            Ok(())
        } else {
            Err(QueryError::NotAKey(self.name().to_string()))
        }
    }

    pub(crate) fn ensure_numeric(self) -> QueryResult<()> {
        if self.is_numeric() {
            Ok(())
        } else {
            Err(QueryError::NotNumeric(self.name().to_string()))
        }
    }

    pub fn key(self, row: &DependencyRow) -> Option<KeyValue> {
        match self {
            Column::Year => Some(KeyValue::Int(row.year as i64)),
            Column::Industry => Some(KeyValue::Text(row.industry.to_string())),
            Column::DependentCountry => Some(KeyValue::Text(row.dependent_country.to_string())),
            Column::SupplierCountry => Some(KeyValue::Text(row.supplier_country.to_string())),
            Column::ChainLength => Some(KeyValue::Int(row.chain_length as i64)),
            _ => None,
        }
    }

    pub fn number(self, row: &DependencyRow) -> Option<f64> {
        match self {
            Column::Year => Some(row.year as f64),
            Column::ChainLength => Some(row.chain_length as f64),
            Column::DependencyValue => Some(row.dependency_value),
            Column::Direct => Some(row.direct),
            Column::Indirect => Some(row.indirect),
            Column::TradeValue => Some(row.trade_value),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = QueryError;

    /// Accepts the serialized column names plus a few short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column = match s.trim().to_lowercase().as_str() {
            "year" => Column::Year,
            "industry" => Column::Industry,
            "dependent_country" | "dependent" | "importer" => Column::DependentCountry,
            "supplier_country" | "supplier" | "exporter" => Column::SupplierCountry,
            "longitud_optima" | "chain_length" => Column::ChainLength,
            "dependency_value" | "dependency" => Column::DependencyValue,
            "direct_dependency" | "direct" => Column::Direct,
            "indirect_dependency" | "indirect" => Column::Indirect,
            "trade_value" | "trade" => Column::TradeValue,
            other => return Err(QueryError::UnknownColumn(other.to_string())),
        };
        Ok(column)
    }
}
