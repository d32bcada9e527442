//! Query errors.

use thiserror::Error;

pub type QueryResult<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Column {0} cannot be used as a grouping key")]
    NotAKey(String),
    #[error("Column {0} is not numeric")]
    NotNumeric(String),
    #[error("No rows to summarize")]
    EmptyTable,
}
