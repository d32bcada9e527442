//! Supplier concentration (Herfindahl-Hirschman index).

use serde::{Deserialize, Serialize};

/// HHI over renormalized supplier shares, and its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    /// In (0, 1]; 1 means a single supplier.
    pub hhi: f64,
    /// `1 / hhi`, at least 1.
    pub effective_suppliers: f64,
}

impl Concentration {
    /// Maximal concentration, used when there are no positive dependencies.
    pub const SINGLE: Concentration = Concentration {
        hhi: 1.0,
        effective_suppliers: 1.0,
    };
}

/// Concentration of a set of dependency values.
///
/// Only positive values count; they are renormalized to sum to 1 before
/// squaring. No positive value yields [`Concentration::SINGLE`].
pub fn concentration<I>(values: I) -> Concentration
where
    I: IntoIterator<Item = f64>,
{
    let positive: Vec<f64> = values.into_iter().filter(|v| *v > 0.0).collect();
    let total: f64 = positive.iter().sum();
    if positive.is_empty() || total <= 0.0 {
        return Concentration::SINGLE;
    }

    let hhi: f64 = positive.iter().map(|v| (v / total).powi(2)).sum();
    if hhi <= 0.0 {
        return Concentration::SINGLE;
    }
    Concentration {
        hhi,
        effective_suppliers: 1.0 / hhi,
    }
}
