//! Turns raw query options into a bounded [`QuerySpec`]
//!
//! Sanitization never fails. Logically unsatisfiable input (an inverted age
//! or date range, an unparsable date) is rejected with an [`InvalidRange`]
//! before anything reaches the store.

use crate::core::filter::{Constraint, FilterField, FilterValue, SalesFilter};
use crate::core::query::{
    PageWindow, SalesQueryOptions, SortSpec, sanitize_search, sanitize_values,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// A validated, bounded query
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub filter: SalesFilter,
    pub sort: SortSpec,
    pub window: PageWindow,
}

/// Why a request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRangeReason {
    /// `ageMin > ageMax`
    AgeRange,
    /// `dateFrom` is not a calendar date
    StartDateFormat,
    /// `dateTo` is not a calendar date
    EndDateFormat,
    /// `dateFrom > dateTo`
    DateRange,
}

impl InvalidRangeReason {
    /// Human-readable message returned to the client
    pub fn message(&self) -> &'static str {
        match self {
            InvalidRangeReason::AgeRange => {
                "Invalid age range: minimum age cannot be greater than maximum age"
            }
            InvalidRangeReason::StartDateFormat => "Invalid start date format",
            InvalidRangeReason::EndDateFormat => "Invalid end date format",
            InvalidRangeReason::DateRange => {
                "Invalid date range: start date cannot be after end date"
            }
        }
    }
}

impl fmt::Display for InvalidRangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A rejected request, with the window it asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRange {
    pub reason: InvalidRangeReason,
    pub window: PageWindow,
}

impl InvalidRange {
    pub fn message(&self) -> &'static str {
        self.reason.message()
    }
}

/// Builds query specifications from raw options
pub struct QueryBuilder;

impl QueryBuilder {
    /// Sanitize, bound and validate raw options
    ///
    /// Checks run in a fixed order: age range, then start date format, end
    /// date format, and finally date ordering. The first failure wins.
    pub fn build(options: &SalesQueryOptions) -> Result<QuerySpec, InvalidRange> {
        let window = PageWindow::from_raw(options.page, options.page_size);
        let reject = |reason| InvalidRange { reason, window };

        let age_min = options.age_min.map(|a| a.max(0));
        let age_max = options.age_max.map(|a| a.max(0));
        if let (Some(min), Some(max)) = (age_min, age_max)
            && min > max
        {
            return Err(reject(InvalidRangeReason::AgeRange));
        }

        let mut filter = SalesFilter::new();

        if let Some(search) = sanitize_search(options.search.as_deref()) {
            filter.push(Constraint::Contains {
                fields: vec![FilterField::CustomerName, FilterField::PhoneNumber],
                needle: search,
            });
        }

        push_any_of(&mut filter, FilterField::CustomerRegion, &options.regions);
        push_any_of(&mut filter, FilterField::Gender, &options.genders);

        if age_min.is_some() || age_max.is_some() {
            filter.push(Constraint::Range {
                field: FilterField::Age,
                min: age_min.map(FilterValue::from),
                max: age_max.map(FilterValue::from),
            });
        }

        push_any_of(
            &mut filter,
            FilterField::ProductCategory,
            &options.product_categories,
        );
        push_any_of(&mut filter, FilterField::Tags, &options.tags);
        push_any_of(
            &mut filter,
            FilterField::PaymentMethod,
            &options.payment_methods,
        );

        let date_from = match present(options.date_from.as_deref()) {
            Some(raw) => {
                Some(parse_date(raw).ok_or_else(|| reject(InvalidRangeReason::StartDateFormat))?)
            }
            None => None,
        };
        let date_to = match present(options.date_to.as_deref()) {
            Some(raw) => {
                Some(parse_date(raw).ok_or_else(|| reject(InvalidRangeReason::EndDateFormat))?)
            }
            None => None,
        };
        if let (Some(from), Some(to)) = (date_from, date_to)
            && from > to
        {
            return Err(reject(InvalidRangeReason::DateRange));
        }
        if date_from.is_some() || date_to.is_some() {
            filter.push(Constraint::Range {
                field: FilterField::Date,
                min: date_from.map(FilterValue::from),
                max: date_to.map(FilterValue::from),
            });
        }

        let sort = SortSpec::from_params(options.sort_by.as_deref(), options.sort_order.as_deref());

        tracing::debug!(
            constraints = filter.constraints().len(),
            sort_field = sort.field.field_name(),
            page = window.page(),
            page_size = window.page_size(),
            "Built sales query"
        );

        Ok(QuerySpec {
            filter,
            sort,
            window,
        })
    }
}

fn push_any_of(filter: &mut SalesFilter, field: FilterField, raw: &[String]) {
    let values = sanitize_values(raw);
    if !values.is_empty() {
        filter.push(Constraint::In {
            field,
            values: values.into_iter().map(FilterValue::from).collect(),
        });
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a date bound
///
/// Accepts `YYYY-MM-DD` (UTC midnight), RFC 3339, and a zone-less
/// `YYYY-MM-DDTHH:MM:SS` read as UTC. Impossible calendar dates are rejected.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}
