//! HTTP handlers for the sales endpoints
//!
//! Status mapping:
//! - a page → `200`, body passed through verbatim
//! - an invalid range → `400`, same body plus `error`
//! - a store failure → `503` with a suggestion
//! - anything else → `500`

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::core::outcome::{QueryOutcome, SummaryOutcome};
use crate::core::query::SalesQueryParams;
use crate::core::service::SalesQueryService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SalesQueryService>,
    /// Deployment environment reported by health checks
    pub environment: Arc<str>,
}

/// Invalid-range body: the zeroed outcome plus an `error` field
#[derive(Serialize)]
struct InvalidRangeResponse<'a, T: Serialize> {
    #[serde(flatten)]
    outcome: &'a T,
    error: &'a str,
}

fn invalid_range_response<T: Serialize>(outcome: &T, message: Option<&str>) -> Response {
    let body = InvalidRangeResponse {
        outcome,
        error: message.unwrap_or("Invalid filter range detected"),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// GET /api/sales
pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<SalesQueryParams>,
) -> Response {
    let options = params.into_options();

    match state.service.query(&options).await {
        Ok(outcome @ QueryOutcome::Page(_)) => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(outcome @ QueryOutcome::InvalidRange(_)) => {
            invalid_range_response(&outcome, outcome.message())
        }
        Err(e) => e.into_response(),
    }
}

/// GET /api/sales/summary
pub async fn sales_summary(
    State(state): State<AppState>,
    Query(params): Query<SalesQueryParams>,
) -> Response {
    let options = params.into_options();

    match state.service.summarize(&options).await {
        Ok(outcome @ SummaryOutcome::Summary(_)) => {
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Ok(outcome @ SummaryOutcome::InvalidRange(_)) => {
            invalid_range_response(&outcome, outcome.message())
        }
        Err(e) => e.into_response(),
    }
}

/// GET /health and /api/health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": &*state.environment,
    }))
}

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Sales Explorer API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
