//! Router builder for the sales routes

use super::handlers::{AppState, health, list_sales, root, sales_summary};
use axum::{Router, routing::get};

/// Build the sales routes
///
/// - GET / - Service banner
/// - GET /health, GET /api/health - Liveness
/// - GET /api/sales - Filtered, sorted, paginated records
/// - GET /api/sales/summary - Totals over all filtered records
pub fn build_sales_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/sales", get(list_sales))
        .route("/api/sales/summary", get(sales_summary))
        .with_state(state)
}
