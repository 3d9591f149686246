//! Aggregate totals over a filtered record set
//!
//! Totals always cover every record matching the filter, never just the
//! current page.

use crate::core::record::SaleRecord;
use serde::Serialize;

/// Totals over all records matching a filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_records: u64,
    /// Sum of `quantity`
    pub total_quantity: u64,
    /// Sum of `totalAmount` (gross)
    pub total_amount: f64,
    /// Sum of `finalAmount` (net)
    pub total_final_amount: f64,
    /// Sum of `max(0, totalAmount - finalAmount)`
    pub total_discount: f64,
}

impl SalesSummary {
    /// Fold one record into the totals
    pub fn add(&mut self, record: &SaleRecord) {
        self.total_records += 1;
        self.total_quantity += record.quantity.unwrap_or(0) as u64;
        self.total_amount += record.total_amount.unwrap_or(0.0);
        self.total_final_amount += record.final_amount.unwrap_or(0.0);
        self.total_discount += record.discount_amount();
    }
}

impl<'a> FromIterator<&'a SaleRecord> for SalesSummary {
    fn from_iter<I: IntoIterator<Item = &'a SaleRecord>>(iter: I) -> Self {
        let mut summary = SalesSummary::default();
        for record in iter {
            summary.add(record);
        }
        summary
    }
}
