//! Server module: the HTTP boundary over the sales query service
//!
//! Thin request dispatch only. Parameter parsing lives in
//! [`SalesQueryParams`](crate::core::query::SalesQueryParams) and every
//! decision about the query lives in the core.

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_sales_routes;
