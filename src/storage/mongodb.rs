//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoSalesStore`, a [`SalesStore`] over a single collection of
//! sales documents (by default `salerecords` in database `test`).
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Query translation
//!
//! | Constraint | MongoDB |
//! |---|---|
//! | `Equals` | `{ field: value }` |
//! | `In` | `{ field: { $in: [...] } }` (arrays match on intersection) |
//! | `Range` | `{ field: { $gte, $lte } }` |
//! | `Contains` | `{ $or: [{ field: { $regex, $options: "i" } }, ...] }` |
//!
//! Several constraints are combined under `$and`. Search text is escaped
//! before it becomes a pattern. Every operation carries `maxTimeMS`.

use crate::core::error::StorageError;
use crate::core::filter::{Constraint, FilterValue, SalesFilter};
use crate::core::query::{PageWindow, SortField, SortOrder, SortSpec};
use crate::core::record::SaleRecord;
use crate::core::store::SalesStore;
use crate::core::summary::SalesSummary;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::ErrorKind;
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

const BACKEND: &str = "mongodb";

/// Server error code for an exceeded `maxTimeMS`
const MAX_TIME_MS_EXPIRED: i32 = 50;

/// Record fields deserialized as integers
const INTEGER_FIELDS: [&str; 2] = ["age", "quantity"];

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn value_to_bson(value: &FilterValue) -> Bson {
    match value {
        FilterValue::Text(s) => Bson::String(s.clone()),
        FilterValue::Integer(i) => Bson::Int64(*i),
        FilterValue::Timestamp(ts) => {
            Bson::DateTime(mongodb::bson::DateTime::from_millis(ts.timestamp_millis()))
        }
    }
}

fn constraint_to_document(constraint: &Constraint) -> Document {
    match constraint {
        Constraint::Equals { field, value } => {
            let name = field.field_name();
            doc! { name: value_to_bson(value) }
        }
        Constraint::In { field, values } => {
            let name = field.field_name();
            let values: Vec<Bson> = values.iter().map(value_to_bson).collect();
            doc! { name: { "$in": values } }
        }
        Constraint::Range { field, min, max } => {
            let name = field.field_name();
            let mut bounds = Document::new();
            if let Some(min) = min {
                bounds.insert("$gte", value_to_bson(min));
            }
            if let Some(max) = max {
                bounds.insert("$lte", value_to_bson(max));
            }
            doc! { name: bounds }
        }
        Constraint::Contains { fields, needle } => {
            let pattern = regex::escape(needle);
            let branches: Vec<Document> = fields
                .iter()
                .map(|f| {
                    let name = f.field_name();
                    doc! { name: { "$regex": pattern.as_str(), "$options": "i" } }
                })
                .collect();
            doc! { "$or": branches }
        }
    }
}

/// Translate a filter into a MongoDB query document
pub fn filter_to_document(filter: &SalesFilter) -> Document {
    match filter.constraints() {
        [] => Document::new(),
        [single] => constraint_to_document(single),
        many => {
            let clauses: Vec<Document> = many.iter().map(constraint_to_document).collect();
            doc! { "$and": clauses }
        }
    }
}

/// Translate a sort spec into a MongoDB sort document
pub fn sort_to_document(sort: SortSpec) -> Document {
    let name = sort.field.field_name();
    let direction = match sort.order {
        SortOrder::Ascending => 1,
        SortOrder::Descending => -1,
    };
    doc! { name: direction }
}

/// Convert a stored document into a `SaleRecord`
///
/// `_id` becomes `id` (ObjectIds as hex), BSON dates become RFC 3339
/// strings and whole doubles in integer fields become integers before the
/// document goes through serde.
fn document_to_record(mut doc: Document) -> Result<SaleRecord, StorageError> {
    if let Some(id) = doc.remove("_id") {
        let id = match id {
            Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
            other => other,
        };
        doc.insert("id", id);
    }

    for (key, value) in doc.iter_mut() {
        match value {
            Bson::DateTime(dt) => {
                let rfc3339 = chrono::DateTime::from_timestamp_millis(dt.timestamp_millis())
                    .map(|d| d.to_rfc3339())
                    .ok_or_else(|| StorageError::Decode {
                        message: format!("date out of range: {}", dt.timestamp_millis()),
                    })?;
                *value = Bson::String(rfc3339);
            }
            Bson::Double(d) if INTEGER_FIELDS.contains(&key.as_str()) && d.fract() == 0.0 => {
                *value = Bson::Int64(*d as i64);
            }
            _ => {}
        }
    }

    let json = Bson::Document(doc).into_relaxed_extjson();
    serde_json::from_value(json).map_err(|e| StorageError::Decode {
        message: e.to_string(),
    })
}

fn number(doc: &Document, key: &str) -> f64 {
    match doc.get(key) {
        Some(Bson::Int32(i)) => *i as f64,
        Some(Bson::Int64(i)) => *i as f64,
        Some(Bson::Double(d)) => *d,
        _ => 0.0,
    }
}

fn map_error(
    operation: &'static str,
    timeout: Duration,
    err: mongodb::error::Error,
) -> StorageError {
    match *err.kind {
        ErrorKind::Command(ref command) if command.code == MAX_TIME_MS_EXPIRED => {
            StorageError::Timeout {
                operation,
                after: timeout,
            }
        }
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. } => StorageError::Connection {
            backend: BACKEND.to_string(),
            message: err.to_string(),
        },
        _ => StorageError::Query {
            backend: BACKEND.to_string(),
            message: format!("{} failed: {}", operation, err),
        },
    }
}

// ---------------------------------------------------------------------------
// MongoSalesStore
// ---------------------------------------------------------------------------

/// Sales store backed by a MongoDB collection.
///
/// The handle wraps the driver's connection pool; clone it freely and share
/// it across requests.
///
/// # Example
///
/// ```rust,ignore
/// let store = MongoSalesStore::connect("mongodb://localhost:27017", "test", "salerecords").await?;
/// store.ensure_indexes().await?;
/// let service = SalesQueryService::new(Arc::new(store));
/// ```
#[derive(Clone, Debug)]
pub struct MongoSalesStore {
    database: Database,
    collection_name: String,
}

impl MongoSalesStore {
    /// Create a store over an existing database handle
    pub fn new(database: Database, collection_name: impl Into<String>) -> Self {
        Self {
            database,
            collection_name: collection_name.into(),
        }
    }

    /// Connect, ping, and log how many records the collection holds
    pub async fn connect(
        uri: &str,
        database: &str,
        collection_name: &str,
    ) -> Result<Self, StorageError> {
        let connection_error = |e: mongodb::error::Error| StorageError::Connection {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        };

        let client = Client::with_uri_str(uri).await.map_err(connection_error)?;
        let database = client.database(database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_error)?;

        let store = Self::new(database, collection_name);
        let records = store
            .collection()
            .estimated_document_count()
            .await
            .map_err(connection_error)?;

        tracing::info!(
            database = store.database.name(),
            collection = %store.collection_name,
            records,
            "MongoDB connected"
        );

        Ok(store)
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(&self.collection_name)
    }

    /// Create indexes for every sort field and filter dimension.
    ///
    /// Idempotent, safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<(), StorageError> {
        let sort_fields = [
            SortField::Date,
            SortField::Quantity,
            SortField::CustomerName,
            SortField::TotalAmount,
            SortField::Age,
        ];
        let filter_fields = [
            "customerRegion",
            "gender",
            "productCategory",
            "tags",
            "paymentMethod",
            "phoneNumber",
        ];

        let indexes: Vec<IndexModel> = sort_fields
            .iter()
            .map(|f| f.field_name())
            .chain(filter_fields)
            .map(|name| IndexModel::builder().keys(doc! { name: 1 }).build())
            .collect();

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| StorageError::Query {
                backend: BACKEND.to_string(),
                message: format!("Failed to create indexes on {}: {}", self.collection_name, e),
            })?;

        tracing::info!(collection = %self.collection_name, "Sales indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl SalesStore for MongoSalesStore {
    async fn find(
        &self,
        filter: &SalesFilter,
        sort: SortSpec,
        window: PageWindow,
        timeout: Duration,
    ) -> Result<Vec<SaleRecord>, StorageError> {
        let query = filter_to_document(filter);
        tracing::debug!(filter = %query, "MongoDB find");

        let cursor = self
            .collection()
            .find(query)
            .sort(sort_to_document(sort))
            .skip(window.skip())
            .limit(window.limit() as i64)
            .max_time(timeout)
            .await
            .map_err(|e| map_error("find", timeout, e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| map_error("find", timeout, e))?;

        docs.into_iter().map(document_to_record).collect()
    }

    async fn count(&self, filter: &SalesFilter, timeout: Duration) -> Result<u64, StorageError> {
        self.collection()
            .count_documents(filter_to_document(filter))
            .max_time(timeout)
            .await
            .map_err(|e| map_error("count", timeout, e))
    }

    async fn summarize(
        &self,
        filter: &SalesFilter,
        timeout: Duration,
    ) -> Result<SalesSummary, StorageError> {
        let pipeline = vec![
            doc! { "$match": filter_to_document(filter) },
            doc! { "$group": {
                "_id": Bson::Null,
                "totalRecords": { "$sum": 1 },
                "totalQuantity": { "$sum": { "$ifNull": ["$quantity", 0] } },
                "totalAmount": { "$sum": { "$ifNull": ["$totalAmount", 0] } },
                "totalFinalAmount": { "$sum": { "$ifNull": ["$finalAmount", 0] } },
                "totalDiscount": { "$sum": { "$max": [
                    0,
                    { "$subtract": [
                        { "$ifNull": ["$totalAmount", 0] },
                        { "$ifNull": ["$finalAmount", 0] }
                    ] }
                ] } },
            } },
        ];

        let mut cursor = self
            .collection()
            .aggregate(pipeline)
            .max_time(timeout)
            .await
            .map_err(|e| map_error("summarize", timeout, e))?;

        let Some(totals) = cursor
            .try_next()
            .await
            .map_err(|e| map_error("summarize", timeout, e))?
        else {
            return Ok(SalesSummary::default());
        };

        Ok(SalesSummary {
            total_records: number(&totals, "totalRecords") as u64,
            total_quantity: number(&totals, "totalQuantity") as u64,
            total_amount: number(&totals, "totalAmount"),
            total_final_amount: number(&totals, "totalFinalAmount"),
            total_discount: number(&totals, "totalDiscount"),
        })
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}
