//! In-memory implementation of SalesStore for testing and development

use crate::core::error::{ConfigError, StorageError};
use crate::core::filter::SalesFilter;
use crate::core::query::{PageWindow, SortField, SortOrder, SortSpec};
use crate::core::record::SaleRecord;
use crate::core::store::SalesStore;
use crate::core::summary::SalesSummary;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::time::Duration;

/// In-memory sales store
///
/// Evaluates filters with [`SalesFilter::matches`] and sorts with the same
/// semantics as a document store: missing values sort first ascending, and
/// ties keep insertion order. Uses RwLock for thread-safe access.
#[derive(Clone, Debug, Default)]
pub struct InMemorySalesStore {
    records: Arc<RwLock<Vec<SaleRecord>>>,
    latency: Option<Duration>,
}

impl InMemorySalesStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records
    pub fn with_records(records: Vec<SaleRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            latency: None,
        }
    }

    /// Load records from a JSON array file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path_display.clone(),
            source,
        })?;
        let records: Vec<SaleRecord> =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path_display.clone(),
                message: e.to_string(),
            })?;

        tracing::info!(path = %path_display, records = records.len(), "Loaded seed records");
        Ok(Self::with_records(records))
    }

    /// Delay every operation, to exercise deadlines
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Append records
    pub fn insert_many(
        &self,
        records: impl IntoIterator<Item = SaleRecord>,
    ) -> Result<(), StorageError> {
        let mut guard = self.records.write().map_err(|e| StorageError::Query {
            backend: self.backend().to_string(),
            message: format!("Failed to acquire write lock: {}", e),
        })?;
        guard.extend(records);
        Ok(())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<SaleRecord>>, StorageError> {
        self.records.read().map_err(|e| StorageError::Query {
            backend: self.backend().to_string(),
            message: format!("Failed to acquire read lock: {}", e),
        })
    }
}

/// Compare two records on one sort field, ascending
fn compare_by(field: SortField, a: &SaleRecord, b: &SaleRecord) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::CustomerName => a.customer_name.cmp(&b.customer_name),
        SortField::Age => a.age.cmp(&b.age),
        SortField::TotalAmount => match (a.total_amount, b.total_amount) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (x, y) => x.is_some().cmp(&y.is_some()),
        },
    }
}

#[async_trait]
impl SalesStore for InMemorySalesStore {
    async fn find(
        &self,
        filter: &SalesFilter,
        sort: SortSpec,
        window: PageWindow,
        _timeout: Duration,
    ) -> Result<Vec<SaleRecord>, StorageError> {
        self.simulate_latency().await;
        let records = self.read()?;

        let mut matching: Vec<&SaleRecord> = records.iter().filter(|r| filter.matches(r)).collect();
        matching.sort_by(|a, b| {
            let ordering = compare_by(sort.field, a, b);
            match sort.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        Ok(matching
            .into_iter()
            .skip(usize::try_from(window.skip()).unwrap_or(usize::MAX))
            .take(window.limit() as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &SalesFilter, _timeout: Duration) -> Result<u64, StorageError> {
        self.simulate_latency().await;
        let records = self.read()?;
        Ok(records.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn summarize(
        &self,
        filter: &SalesFilter,
        _timeout: Duration,
    ) -> Result<SalesSummary, StorageError> {
        self.simulate_latency().await;
        let records = self.read()?;
        Ok(records.iter().filter(|r| filter.matches(r)).collect())
    }

    fn backend(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{Constraint, FilterField};
    use std::io::Write;

    fn record(name: &str, amount: Option<f64>) -> SaleRecord {
        SaleRecord {
            customer_name: Some(name.to_string()),
            total_amount: amount,
            ..Default::default()
        }
    }

    fn names(records: &[SaleRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.customer_name.as_deref().unwrap_or(""))
            .collect()
    }

    #[tokio::test]
    async fn test_find_sorts_and_windows() {
        let store = InMemorySalesStore::with_records(vec![
            record("b", Some(20.0)),
            record("a", Some(30.0)),
            record("c", Some(10.0)),
        ]);
        let sort = SortSpec {
            field: SortField::TotalAmount,
            order: SortOrder::Descending,
        };

        let first = store
            .find(
                &SalesFilter::new(),
                sort,
                PageWindow::from_raw(Some(1), Some(2)),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(names(&first), vec!["a", "b"]);

        let second = store
            .find(
                &SalesFilter::new(),
                sort,
                PageWindow::from_raw(Some(2), Some(2)),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(names(&second), vec!["c"]);
    }

    #[tokio::test]
    async fn test_missing_values_sort_first_ascending() {
        let store = InMemorySalesStore::with_records(vec![
            record("with", Some(5.0)),
            record("without", None),
        ]);
        let sort = SortSpec {
            field: SortField::TotalAmount,
            order: SortOrder::Ascending,
        };

        let found = store
            .find(
                &SalesFilter::new(),
                sort,
                PageWindow::default(),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["without", "with"]);
    }

    #[tokio::test]
    async fn test_count_applies_filter() {
        let store = InMemorySalesStore::with_records(vec![record("Ann", None), record("Bob", None)]);
        let filter = SalesFilter::new().with(Constraint::Contains {
            fields: vec![FilterField::CustomerName, FilterField::PhoneNumber],
            needle: "ann".to_string(),
        });

        assert_eq!(store.count(&filter, Duration::from_secs(1)).await.unwrap(), 1);
        assert_eq!(
            store
                .count(&SalesFilter::new(), Duration::from_secs(1))
                .await
                .unwrap(),
            2
        );
    }

    #[test]
    fn test_insert_many() {
        let store = InMemorySalesStore::new();
        assert!(store.is_empty());
        store.insert_many(vec![record("a", None), record("b", None)]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"customerName": "Jane Smith", "date": "2023-02-20T00:00:00Z", "tags": ["organic"]}}]"#
        )
        .unwrap();

        let store = InMemorySalesStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_json_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = InMemorySalesStore::from_json_file(file.path()).err().unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
