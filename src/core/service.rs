//! Sales query service
//!
//! The one entry point the boundary layer calls. Each call is stateless:
//! options are validated into a [`QuerySpec`], then the page fetch and the
//! total count run concurrently against the shared store under one deadline.

use crate::core::builder::QueryBuilder;
use crate::core::error::{QueryError, StorageError};
use crate::core::outcome::{QueryOutcome, SalesPage, SummaryOutcome};
use crate::core::query::SalesQueryOptions;
use crate::core::store::SalesStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Deadline applied to every store operation unless configured otherwise
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Validates raw options and runs them against a [`SalesStore`]
#[derive(Clone)]
pub struct SalesQueryService {
    store: Arc<dyn SalesStore>,
    timeout: Duration,
}

impl SalesQueryService {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the per-operation deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn store(&self) -> &Arc<dyn SalesStore> {
        &self.store
    }

    /// Run a paginated query
    ///
    /// Malformed input yields `Ok(QueryOutcome::InvalidRange)` without
    /// touching the store. `Err` means the store failed or timed out; there
    /// is no partial result.
    pub async fn query(&self, options: &SalesQueryOptions) -> Result<QueryOutcome, QueryError> {
        let spec = match QueryBuilder::build(options) {
            Ok(spec) => spec,
            Err(invalid) => {
                tracing::warn!(reason = %invalid.reason, "Rejected sales query");
                return Ok(QueryOutcome::InvalidRange(invalid));
            }
        };

        let (items, total_items) = tokio::try_join!(
            self.bounded(
                "find",
                self.store
                    .find(&spec.filter, spec.sort, spec.window, self.timeout)
            ),
            self.bounded("count", self.store.count(&spec.filter, self.timeout)),
        )
        .inspect_err(|e| {
            tracing::error!(backend = self.store.backend(), error = %e, "Sales query failed");
        })?;

        let page = SalesPage::new(items, spec.window, total_items);
        if let Some(message) = &page.message {
            tracing::warn!("{}", message);
        }

        Ok(QueryOutcome::Page(page))
    }

    /// Aggregate totals over every record matching the filters
    ///
    /// Pagination and sort options are ignored; validation is the same as
    /// for [`query`](Self::query).
    pub async fn summarize(
        &self,
        options: &SalesQueryOptions,
    ) -> Result<SummaryOutcome, QueryError> {
        let spec = match QueryBuilder::build(options) {
            Ok(spec) => spec,
            Err(invalid) => {
                tracing::warn!(reason = %invalid.reason, "Rejected sales summary");
                return Ok(SummaryOutcome::InvalidRange(invalid));
            }
        };

        let summary = self
            .bounded("summarize", self.store.summarize(&spec.filter, self.timeout))
            .await
            .inspect_err(|e| {
                tracing::error!(backend = self.store.backend(), error = %e, "Sales summary failed");
            })?;

        Ok(SummaryOutcome::Summary(summary))
    }

    /// Bound a store operation by the service deadline
    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout {
                operation,
                after: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::SaleRecord;
    use crate::storage::InMemorySalesStore;

    fn service_with(records: Vec<SaleRecord>) -> SalesQueryService {
        SalesQueryService::new(Arc::new(InMemorySalesStore::with_records(records)))
    }

    fn named(name: &str, quantity: u32) -> SaleRecord {
        SaleRecord {
            customer_name: Some(name.to_string()),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_query_returns_page() {
        let service = service_with(vec![named("A", 1), named("B", 2), named("C", 3)]);
        let page = service
            .query(&SalesQueryOptions {
                page_size: Some(2),
                sort_by: Some("quantity".to_string()),
                sort_order: Some("asc".to_string()),
                ..Default::default()
            })
            .await
            .unwrap()
            .expect_page();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].customer_name.as_deref(), Some("A"));
        assert_eq!(page.meta.total_items, 3);
        assert_eq!(page.meta.total_pages, 2);
    }

    #[tokio::test]
    async fn test_invalid_range_skips_store() {
        let store = InMemorySalesStore::with_records(vec![named("A", 1)])
            .with_latency(Duration::from_secs(60));
        let service = SalesQueryService::new(Arc::new(store)).with_timeout(Duration::from_millis(10));

        let outcome = service
            .query(&SalesQueryOptions {
                age_min: Some(40),
                age_max: Some(30),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(outcome.is_invalid_range());
        assert!(outcome.items().is_empty());
        assert_eq!(outcome.meta().total_items, 0);
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let store = InMemorySalesStore::with_records(vec![named("A", 1)])
            .with_latency(Duration::from_millis(200));
        let service = SalesQueryService::new(Arc::new(store)).with_timeout(Duration::from_millis(20));

        let err = service.query(&SalesQueryOptions::default()).await.unwrap_err();
        assert!(matches!(
            err,
            QueryError::Storage(StorageError::Timeout { .. })
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_summarize_covers_all_matches() {
        let service = service_with(vec![named("A", 1), named("B", 2), named("C", 3)]);
        let outcome = service
            .summarize(&SalesQueryOptions {
                page_size: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        match outcome {
            SummaryOutcome::Summary(summary) => {
                assert_eq!(summary.total_records, 3);
                assert_eq!(summary.total_quantity, 6);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }
}
