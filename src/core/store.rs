//! Record store trait

use crate::core::error::StorageError;
use crate::core::filter::SalesFilter;
use crate::core::query::{PageWindow, SortSpec};
use crate::core::record::SaleRecord;
use crate::core::summary::SalesSummary;
use async_trait::async_trait;
use std::time::Duration;

/// Read-only access to a sales record store
///
/// Implementations translate [`SalesFilter`] into their native query form.
/// `timeout` is forwarded so stores with server-side deadlines can enforce
/// it; callers bound every call with the same deadline on their side too.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Fetch one window of matching records, sorted by a single field
    async fn find(
        &self,
        filter: &SalesFilter,
        sort: SortSpec,
        window: PageWindow,
        timeout: Duration,
    ) -> Result<Vec<SaleRecord>, StorageError>;

    /// Count all matching records
    async fn count(&self, filter: &SalesFilter, timeout: Duration) -> Result<u64, StorageError>;

    /// Aggregate totals over all matching records
    async fn summarize(
        &self,
        filter: &SalesFilter,
        timeout: Duration,
    ) -> Result<SalesSummary, StorageError>;

    /// Short backend name for logs and errors
    fn backend(&self) -> &'static str;
}
