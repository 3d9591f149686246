//! Structured filter predicate over sales records
//!
//! A [`SalesFilter`] is a conjunction of [`Constraint`]s. Stores translate it
//! into their native query language; [`SalesFilter::matches`] evaluates it
//! in-process with the same semantics.

use crate::core::record::SaleRecord;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Filterable record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    CustomerName,
    PhoneNumber,
    CustomerRegion,
    Gender,
    Age,
    ProductCategory,
    Tags,
    PaymentMethod,
    Date,
}

impl FilterField {
    /// Stored field name
    pub fn field_name(&self) -> &'static str {
        match self {
            FilterField::CustomerName => "customerName",
            FilterField::PhoneNumber => "phoneNumber",
            FilterField::CustomerRegion => "customerRegion",
            FilterField::Gender => "gender",
            FilterField::Age => "age",
            FilterField::ProductCategory => "productCategory",
            FilterField::Tags => "tags",
            FilterField::PaymentMethod => "paymentMethod",
            FilterField::Date => "date",
        }
    }

    /// Values a record holds for this field
    ///
    /// Scalar fields yield zero or one value; `tags` yields the whole set.
    fn values_of(&self, record: &SaleRecord) -> Vec<FilterValue> {
        let text = |v: &Option<String>| -> Vec<FilterValue> {
            v.iter().cloned().map(FilterValue::Text).collect()
        };
        match self {
            FilterField::CustomerName => text(&record.customer_name),
            FilterField::PhoneNumber => text(&record.phone_number),
            FilterField::CustomerRegion => text(&record.customer_region),
            FilterField::Gender => text(&record.gender),
            FilterField::ProductCategory => text(&record.product_category),
            FilterField::PaymentMethod => text(&record.payment_method),
            FilterField::Tags => record.tags.iter().cloned().map(FilterValue::Text).collect(),
            FilterField::Age => record
                .age
                .map(|a| FilterValue::Integer(a as i64))
                .into_iter()
                .collect(),
            FilterField::Date => record.date.map(FilterValue::Timestamp).into_iter().collect(),
        }
    }
}

/// A typed filter operand
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

impl FilterValue {
    /// Order two values of the same kind; values of different kinds never compare
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        match (self, other) {
            (FilterValue::Text(a), FilterValue::Text(b)) => Some(a.cmp(b)),
            (FilterValue::Integer(a), FilterValue::Integer(b)) => Some(a.cmp(b)),
            (FilterValue::Timestamp(a), FilterValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        FilterValue::Timestamp(value)
    }
}

/// A single field constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Field equals a value
    Equals { field: FilterField, value: FilterValue },

    /// Field is one of a set of values (match-any; for `tags`, set intersection)
    In {
        field: FilterField,
        values: Vec<FilterValue>,
    },

    /// Field lies within inclusive bounds, each bound optional
    Range {
        field: FilterField,
        min: Option<FilterValue>,
        max: Option<FilterValue>,
    },

    /// Case-insensitive substring match on any of the given fields
    Contains {
        fields: Vec<FilterField>,
        needle: String,
    },
}

impl Constraint {
    /// Evaluate this constraint against a record
    pub fn matches(&self, record: &SaleRecord) -> bool {
        match self {
            Constraint::Equals { field, value } => {
                field.values_of(record).iter().any(|v| v == value)
            }
            Constraint::In { field, values } => field
                .values_of(record)
                .iter()
                .any(|v| values.contains(v)),
            Constraint::Range { field, min, max } => {
                field.values_of(record).iter().any(|v| {
                    let above = min.as_ref().is_none_or(|m| {
                        matches!(v.compare(m), Some(Ordering::Greater | Ordering::Equal))
                    });
                    let below = max.as_ref().is_none_or(|m| {
                        matches!(v.compare(m), Some(Ordering::Less | Ordering::Equal))
                    });
                    above && below
                })
            }
            Constraint::Contains { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|field| {
                    field.values_of(record).iter().any(|v| match v {
                        FilterValue::Text(s) => s.to_lowercase().contains(&needle),
                        _ => false,
                    })
                })
            }
        }
    }
}

/// Conjunction of constraints; an empty filter matches every record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesFilter {
    constraints: Vec<Constraint>,
}

impl SalesFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint
    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.push(constraint);
        self
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Whether a record satisfies every constraint
    pub fn matches(&self, record: &SaleRecord) -> bool {
        self.constraints.iter().all(|c| c.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> SaleRecord {
        SaleRecord {
            customer_name: Some("Jane Smith".to_string()),
            phone_number: Some("9876543210".to_string()),
            customer_region: Some("South".to_string()),
            age: Some(30),
            tags: vec!["organic".to_string(), "skincare".to_string()],
            date: Some(Utc.with_ymd_and_hms(2023, 2, 20, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(SalesFilter::new().matches(&record()));
        assert!(SalesFilter::new().matches(&SaleRecord::default()));
    }

    #[test]
    fn test_equals() {
        let filter = SalesFilter::new().with(Constraint::Equals {
            field: FilterField::CustomerRegion,
            value: "South".into(),
        });
        assert!(filter.matches(&record()));

        let filter = SalesFilter::new().with(Constraint::Equals {
            field: FilterField::CustomerRegion,
            value: "south".into(),
        });
        assert!(!filter.matches(&record()));
    }

    #[test]
    fn test_in_is_match_any() {
        let filter = SalesFilter::new().with(Constraint::In {
            field: FilterField::CustomerRegion,
            values: vec!["North".into(), "South".into()],
        });
        assert!(filter.matches(&record()));
    }

    #[test]
    fn test_in_on_tags_intersects() {
        let filter = SalesFilter::new().with(Constraint::In {
            field: FilterField::Tags,
            values: vec!["skincare".into(), "premium".into()],
        });
        assert!(filter.matches(&record()));

        let filter = SalesFilter::new().with(Constraint::In {
            field: FilterField::Tags,
            values: vec!["premium".into()],
        });
        assert!(!filter.matches(&record()));
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let at_bounds = SalesFilter::new().with(Constraint::Range {
            field: FilterField::Age,
            min: Some(30.into()),
            max: Some(30.into()),
        });
        assert!(at_bounds.matches(&record()));

        let only_max = SalesFilter::new().with(Constraint::Range {
            field: FilterField::Age,
            min: None,
            max: Some(29.into()),
        });
        assert!(!only_max.matches(&record()));
    }

    #[test]
    fn test_range_skips_missing_values() {
        let filter = SalesFilter::new().with(Constraint::Range {
            field: FilterField::Age,
            min: Some(0.into()),
            max: None,
        });
        assert!(!filter.matches(&SaleRecord::default()));
    }

    #[test]
    fn test_range_on_dates() {
        let from = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2023, 2, 20, 0, 0, 0).unwrap();
        let filter = SalesFilter::new().with(Constraint::Range {
            field: FilterField::Date,
            min: Some(from.into()),
            max: Some(to.into()),
        });
        assert!(filter.matches(&record()));
    }

    #[test]
    fn test_contains_is_case_insensitive_or() {
        let by_name = SalesFilter::new().with(Constraint::Contains {
            fields: vec![FilterField::CustomerName, FilterField::PhoneNumber],
            needle: "SMITH".to_string(),
        });
        assert!(by_name.matches(&record()));

        let by_phone = SalesFilter::new().with(Constraint::Contains {
            fields: vec![FilterField::CustomerName, FilterField::PhoneNumber],
            needle: "6543".to_string(),
        });
        assert!(by_phone.matches(&record()));
    }

    #[test]
    fn test_constraints_conjoin() {
        let filter = SalesFilter::new()
            .with(Constraint::In {
                field: FilterField::CustomerRegion,
                values: vec!["South".into()],
            })
            .with(Constraint::In {
                field: FilterField::Tags,
                values: vec!["premium".into()],
            });
        assert!(!filter.matches(&record()));
    }

    #[test]
    fn test_mixed_kinds_never_compare() {
        let text = FilterValue::from("30");
        let number = FilterValue::from(30);
        assert_eq!(text.compare(&number), None);
    }
}
