//! # Sales Explorer
//!
//! Query construction and execution over a collection of retail sales records.
//!
//! ## Features
//!
//! - **Validated Queries**: Raw filter/sort/page options become a structured query or an
//!   invalid-range outcome, never a panic
//! - **Backend-Neutral Filters**: One [`SalesFilter`](core::filter::SalesFilter) evaluated
//!   in memory or translated to a MongoDB document
//! - **Concurrent Find + Count**: Both operations run together under a shared deadline
//! - **Stable Pagination**: Metadata is consistent even for empty or out-of-range pages
//! - **HTTP Surface**: Axum handlers mapping outcomes to 200/400/503/500
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sales_explorer::prelude::*;
//!
//! let store = InMemorySalesStore::from_json_file("data/sales.json")?;
//! let service = SalesQueryService::new(Arc::new(store));
//!
//! let options = SalesQueryOptions {
//!     regions: vec!["North".into(), "South".into()],
//!     sort_by: Some("customerName".into()),
//!     sort_order: Some("asc".into()),
//!     ..Default::default()
//! };
//!
//! match service.query(&options).await? {
//!     QueryOutcome::Page(page) => println!("{} of {}", page.items.len(), page.meta.total_items),
//!     QueryOutcome::InvalidRange(range) => println!("{}", range.message()),
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        builder::{InvalidRange, InvalidRangeReason, QueryBuilder, QuerySpec},
        error::{ConfigError, QueryError, StorageError},
        filter::{Constraint, FilterField, FilterValue, SalesFilter},
        outcome::{QueryOutcome, SalesPage, SummaryOutcome},
        query::{
            PageWindow, PaginationMeta, SalesQueryOptions, SalesQueryParams, SortField,
            SortOrder, SortSpec,
        },
        record::SaleRecord,
        service::{DEFAULT_QUERY_TIMEOUT, SalesQueryService},
        store::SalesStore,
        summary::SalesSummary,
    };

    // === Storage ===
    pub use crate::storage::InMemorySalesStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoSalesStore;

    // === Config ===
    pub use crate::config::{AppConfig, QueryConfig, ServerConfig, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, build_sales_routes};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
