//! Sales transaction record as stored in the record store
//!
//! Records are read-only from the point of view of this crate. Every
//! attribute is optional because bulk imports leave blank columns unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sales transaction
///
/// Field names follow the stored document layout (camelCase), so a record
/// serializes to the same shape it was read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleRecord {
    /// Store-assigned identifier (ObjectId hex for MongoDB)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // Customer
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub customer_region: Option<String>,
    pub customer_type: Option<String>,

    // Product
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub product_category: Option<String>,
    pub tags: Vec<String>,

    // Transaction
    pub quantity: Option<u32>,
    pub price_per_unit: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub total_amount: Option<f64>,
    pub final_amount: Option<f64>,

    // Operational
    pub date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub order_status: Option<String>,
    pub delivery_type: Option<String>,
    pub store_id: Option<String>,
    pub store_location: Option<String>,
    pub salesperson_id: Option<String>,
    pub employee_name: Option<String>,
}

impl SaleRecord {
    /// Discount granted on this sale, `max(0, totalAmount - finalAmount)`
    ///
    /// Missing amounts count as zero. `finalAmount <= totalAmount` is expected
    /// but not enforced, hence the floor.
    pub fn discount_amount(&self) -> f64 {
        let total = self.total_amount.unwrap_or(0.0);
        let final_amount = self.final_amount.unwrap_or(0.0);
        (total - final_amount).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discount_amount() {
        let record = SaleRecord {
            total_amount: Some(1000.0),
            final_amount: Some(850.0),
            ..Default::default()
        };
        assert_eq!(record.discount_amount(), 150.0);
    }

    #[test]
    fn test_discount_amount_never_negative() {
        let record = SaleRecord {
            total_amount: Some(100.0),
            final_amount: Some(120.0),
            ..Default::default()
        };
        assert_eq!(record.discount_amount(), 0.0);

        assert_eq!(SaleRecord::default().discount_amount(), 0.0);
    }

    #[test]
    fn test_deserialize_camel_case_with_missing_fields() {
        let record: SaleRecord = serde_json::from_value(json!({
            "customerName": "Jane Smith",
            "customerRegion": "South",
            "age": 30,
            "tags": ["organic", "skincare"],
            "date": "2023-02-20T00:00:00Z"
        }))
        .expect("record should deserialize");

        assert_eq!(record.customer_name.as_deref(), Some("Jane Smith"));
        assert_eq!(record.customer_region.as_deref(), Some("South"));
        assert_eq!(record.age, Some(30));
        assert_eq!(record.tags, vec!["organic", "skincare"]);
        assert!(record.date.is_some());
        assert!(record.payment_method.is_none());
    }

    #[test]
    fn test_serialize_omits_missing_id() {
        let value = serde_json::to_value(SaleRecord::default()).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("customerName").is_some());
    }
}
