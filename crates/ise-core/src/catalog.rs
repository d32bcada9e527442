//! Industry catalog: static industry id -> display name lookup.
//!
//! Loaded once per process and passed explicitly to whatever needs
//! display names. Never mutated after construction.

use crate::error::{IseError, Result};
use crate::types::IndustryId;
use std::collections::BTreeMap;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 2] = ["industry_id", "industry_name"];

/// Read-only industry id -> name table.
#[derive(Debug, Clone, Default)]
pub struct IndustryCatalog {
    names: BTreeMap<IndustryId, String>,
}

impl IndustryCatalog {
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(k, v)| (IndustryId::new(k), v.into()))
                .collect(),
        }
    }

    /// Load `industry_id,industry_name` rows from a CSV file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IseError::not_found(path.display().to_string()));
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let table = path.display().to_string();
        let headers = reader.headers()?.clone();
        let mut idx = [0usize; 2];
        for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| IseError::missing_field(&table, column))?;
        }

        let mut names = BTreeMap::new();
        for row in reader.records() {
            let row = row?;
            let id = row.get(idx[0]).unwrap_or_default();
            let name = row.get(idx[1]).unwrap_or_default();
            if id.is_empty() {
                return Err(IseError::malformed(format!("empty industry_id in {}", table)));
            }
            names.insert(IndustryId::new(id), name.to_string());
        }
        Ok(Self { names })
    }

    pub fn name(&self, id: &IndustryId) -> Option<&str> {
        self.names.get(id).map(|s| s.as_str())
    }

    /// Display name, falling back to the raw id.
    pub fn display_name<'a>(&'a self, id: &'a IndustryId) -> &'a str {
        self.name(id).unwrap_or(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndustryId, &str)> {
        self.names.iter().map(|(k, v)| (k, v.as_str()))
    }
}
