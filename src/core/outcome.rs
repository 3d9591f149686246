//! Query results
//!
//! Both the happy path and the validation path are ordinary return values.
//! [`QueryOutcome`] serializes to one flat JSON object either way:
//!
//! ```text
//! { items, page, pageSize, totalItems, totalPages, hasNextPage, hasPrevPage, message? }
//! { items: [], page, pageSize, totalItems: 0, totalPages: 0, hasNextPage: false,
//!   hasPrevPage: false, invalidRange: true, message }
//! ```

use crate::core::builder::InvalidRange;
use crate::core::query::{PageWindow, PaginationMeta};
use crate::core::record::SaleRecord;
use crate::core::summary::SalesSummary;
use serde::{Serialize, Serializer};

/// One page of matching records
#[derive(Debug, Clone, PartialEq)]
pub struct SalesPage {
    pub items: Vec<SaleRecord>,
    pub meta: PaginationMeta,
    /// Set when the requested page lies past the last page
    pub message: Option<String>,
}

impl SalesPage {
    /// Combine a fetched window with the total count
    ///
    /// A page past the last page is a normal boundary: items are empty and
    /// the counts stay accurate.
    pub fn new(items: Vec<SaleRecord>, window: PageWindow, total_items: u64) -> Self {
        let meta = PaginationMeta::new(window, total_items);

        if meta.is_beyond_last_page() {
            return Self {
                items: Vec::new(),
                meta: PaginationMeta {
                    has_next_page: false,
                    has_prev_page: true,
                    ..meta
                },
                message: Some(format!(
                    "Requested page {} exceeds total pages {}",
                    meta.page, meta.total_pages
                )),
            };
        }

        Self {
            items,
            meta,
            message: None,
        }
    }
}

/// Result of a query call
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Page(SalesPage),
    InvalidRange(InvalidRange),
}

impl QueryOutcome {
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, QueryOutcome::InvalidRange(_))
    }

    pub fn items(&self) -> &[SaleRecord] {
        match self {
            QueryOutcome::Page(page) => &page.items,
            QueryOutcome::InvalidRange(_) => &[],
        }
    }

    pub fn meta(&self) -> PaginationMeta {
        match self {
            QueryOutcome::Page(page) => page.meta,
            QueryOutcome::InvalidRange(invalid) => PaginationMeta::empty(invalid.window),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            QueryOutcome::Page(page) => page.message.as_deref(),
            QueryOutcome::InvalidRange(invalid) => Some(invalid.message()),
        }
    }

    /// Unwrap a page, panicking on an invalid range
    #[cfg(test)]
    pub fn expect_page(self) -> SalesPage {
        match self {
            QueryOutcome::Page(page) => page,
            QueryOutcome::InvalidRange(invalid) => panic!("unexpected invalid range: {invalid:?}"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeBody<'a> {
    items: &'a [SaleRecord],
    #[serde(flatten)]
    meta: PaginationMeta,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    invalid_range: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl Serialize for QueryOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeBody {
            items: self.items(),
            meta: self.meta(),
            invalid_range: self.is_invalid_range(),
            message: self.message(),
        }
        .serialize(serializer)
    }
}

/// Result of a summary call
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Summary(SalesSummary),
    InvalidRange(InvalidRange),
}

impl SummaryOutcome {
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, SummaryOutcome::InvalidRange(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SummaryOutcome::Summary(_) => None,
            SummaryOutcome::InvalidRange(invalid) => Some(invalid.message()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryBody<'a> {
    #[serde(flatten)]
    summary: SalesSummary,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    invalid_range: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl Serialize for SummaryOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let summary = match self {
            SummaryOutcome::Summary(summary) => *summary,
            SummaryOutcome::InvalidRange(_) => SalesSummary::default(),
        };
        SummaryBody {
            summary,
            invalid_range: self.is_invalid_range(),
            message: self.message(),
        }
        .serialize(serializer)
    }
}
