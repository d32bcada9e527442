//! Error types for index computation.
//!
//! Provides structured error handling instead of panics. Every failure
//! that depends on input data surfaces as an [`IseError`].

use thiserror::Error;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IseError>;

/// Errors that can occur while loading, decomposing or aggregating trade data.
#[derive(Debug, Clone, Error)]
pub enum IseError {
    /// Input table errors.
    #[error("Input error: {0}")]
    Input(#[from] InputError),
    /// Trade graph errors.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// A requested year has no usable source artifact.
    #[error("Year {0} not processed: {1}")]
    YearNotProcessed(i32, String),
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for IseError {
    fn from(e: std::io::Error) -> Self {
        IseError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for IseError {
    fn from(e: serde_json::Error) -> Self {
        IseError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for IseError {
    fn from(e: csv::Error) -> Self {
        IseError::Input(InputError::Malformed(e.to_string()))
    }
}

/// Input table errors.
#[derive(Debug, Clone, Error)]
pub enum InputError {
    /// Source file not found.
    #[error("File not found: {0}")]
    NotFound(String),
    /// A required column is absent from the header.
    #[error("Missing required field: {field} in {table}")]
    MissingField { table: String, field: String },
    /// A row could not be parsed.
    #[error("Malformed row: {0}")]
    Malformed(String),
}

/// Trade graph errors.
#[derive(Debug, Clone, Error)]
pub enum GraphError {
    /// Trade value is negative, NaN or infinite.
    #[error("Invalid trade value {value} on {exporter} -> {importer}")]
    InvalidTradeValue {
        exporter: String,
        importer: String,
        value: f64,
    },
    /// Country code is empty.
    #[error("Empty country code")]
    EmptyCountry,
    /// Graph has no edges.
    #[error("Graph is empty")]
    EmptyGraph,
}

/// Configuration errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

// Convenience constructors
impl IseError {
    pub fn missing_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        IseError::Input(InputError::MissingField {
            table: table.into(),
            field: field.into(),
        })
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        IseError::Input(InputError::NotFound(path.into()))
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        IseError::Input(InputError::Malformed(msg.into()))
    }

    pub fn year_not_processed(year: i32, reason: impl Into<String>) -> Self {
        IseError::YearNotProcessed(year, reason.into())
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        IseError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        IseError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }
}

/// Check that `value` lies in `[min, max]`.
pub fn ensure_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(IseError::out_of_range(field, min, max, value))
    }
}
