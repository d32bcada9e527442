//! ISE Query Prelude: convenient imports for common usage.

pub use crate::column::{Column, KeyValue};
pub use crate::error::{QueryError, QueryResult};
pub use crate::filter::Filter;
pub use crate::table::{Agg, DependencyRow, DependencyTable, GroupRow};
pub use crate::stats::{
    aggregate_by_country, aggregate_temporal, country_statistics,
    critical_dependencies, summary_statistics,
    CountryAggregate, CountryStatistics, Role, SummaryStatistics, TemporalRow,
};
