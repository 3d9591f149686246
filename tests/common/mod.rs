//! Shared fixture for the integration tests
//!
//! Eight sales spread across every filter dimension. Amounts are
//! `quantity * 100` gross with a 10% discount.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use sales_explorer::core::query::SalesQueryOptions;
use sales_explorer::core::record::SaleRecord;
use sales_explorer::core::service::SalesQueryService;
use sales_explorer::storage::InMemorySalesStore;
use std::sync::Arc;

/// Midnight UTC of the given day
pub fn day(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, date)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap()
}

#[allow(clippy::too_many_arguments)]
fn sale(
    name: &str,
    phone: &str,
    gender: &str,
    age: u32,
    region: &str,
    category: &str,
    tags: &[&str],
    payment: &str,
    date: DateTime<Utc>,
    quantity: u32,
) -> SaleRecord {
    let total = quantity as f64 * 100.0;
    SaleRecord {
        customer_name: Some(name.to_string()),
        phone_number: Some(phone.to_string()),
        gender: Some(gender.to_string()),
        age: Some(age),
        customer_region: Some(region.to_string()),
        product_category: Some(category.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        payment_method: Some(payment.to_string()),
        date: Some(date),
        quantity: Some(quantity),
        price_per_unit: Some(100.0),
        total_amount: Some(total),
        final_amount: Some(total * 0.9),
        ..Default::default()
    }
}

pub fn fixture_records() -> Vec<SaleRecord> {
    vec![
        sale("John Doe", "1234567890", "Male", 25, "North", "Electronics", &["premium", "warranty"], "Credit Card", day(2023, 1, 15), 2),
        sale("Jane Smith", "9876543210", "Female", 30, "South", "Beauty", &["organic", "skincare"], "UPI", day(2023, 2, 20), 5),
        sale("Bob Johnson", "5555555555", "Male", 45, "East", "Electronics", &["warranty", "discount"], "Debit Card", day(2023, 3, 10), 1),
        sale("Alice Brown", "1111222233", "Female", 28, "West", "Fashion", &["premium", "trending"], "UPI", day(2023, 4, 5), 3),
        sale("Charlie Wilson", "9999888877", "Male", 35, "North", "Beauty", &["organic"], "Credit Card", day(2023, 5, 12), 4),
        sale("Diana Prince", "7777666655", "Female", 40, "South", "Fashion", &["trending", "sale"], "Cash", day(2023, 6, 18), 2),
        sale("Eve Adams", "3333444455", "Female", 22, "East", "Electronics", &["premium"], "UPI", day(2023, 7, 25), 6),
        sale("Frank Miller", "6666777788", "Male", 50, "West", "Beauty", &["skincare", "organic"], "Debit Card", day(2023, 8, 30), 1),
    ]
}

pub fn fixture_store() -> InMemorySalesStore {
    InMemorySalesStore::with_records(fixture_records())
}

pub fn fixture_service() -> SalesQueryService {
    SalesQueryService::new(Arc::new(fixture_store()))
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Options returning every match on one page
pub fn all_pages() -> SalesQueryOptions {
    SalesQueryOptions {
        page_size: Some(100),
        ..Default::default()
    }
}

pub fn names(records: &[SaleRecord]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.customer_name.as_deref())
        .collect()
}
