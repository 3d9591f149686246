//! Core module: query construction, validation and result shaping

pub mod builder;
pub mod error;
pub mod filter;
pub mod outcome;
pub mod query;
pub mod record;
pub mod service;
pub mod store;
pub mod summary;

pub use builder::{InvalidRange, InvalidRangeReason, QueryBuilder, QuerySpec};
pub use error::{ConfigError, QueryError, StorageError};
pub use filter::{Constraint, FilterField, FilterValue, SalesFilter};
pub use outcome::{QueryOutcome, SalesPage, SummaryOutcome};
pub use query::{
    PageWindow, PaginationMeta, SalesQueryOptions, SalesQueryParams, SortField, SortOrder,
    SortSpec,
};
pub use record::SaleRecord;
pub use service::SalesQueryService;
pub use store::SalesStore;
pub use summary::SalesSummary;
