//! Query parameters, sanitization and pagination utilities

use serde::{Deserialize, Deserializer, Serialize};

/// Largest page size honored
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when none (or zero) is supplied
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Values honored per multi-select filter dimension
pub const MAX_FILTER_VALUES: usize = 50;

/// Characters of search text honored
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Raw query options, as supplied by a caller
///
/// Nothing here is trusted: values are sanitized and bounded by
/// [`QueryBuilder`](crate::core::builder::QueryBuilder). Deserializes from
/// a JSON object with camelCase keys; `null` entries inside lists are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesQueryOptions {
    /// Free text matched against customer name and phone number
    pub search: Option<String>,

    #[serde(deserialize_with = "lenient_list")]
    pub regions: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub genders: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub product_categories: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub payment_methods: Vec<String>,

    pub age_min: Option<i64>,
    pub age_max: Option<i64>,

    /// Inclusive lower date bound (`YYYY-MM-DD` or RFC 3339)
    pub date_from: Option<String>,
    /// Inclusive upper date bound (`YYYY-MM-DD` or RFC 3339)
    pub date_to: Option<String>,

    /// One of `date`, `quantity`, `customerName`, `totalAmount`, `age`
    pub sort_by: Option<String>,
    /// `asc`, anything else is descending
    pub sort_order: Option<String>,

    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

/// Query-string parameters for the sales listing endpoint
///
/// Every value arrives as a string. Lists are comma separated.
///
/// # Example
/// ```text
/// GET /api/sales?regions=North,South&tags=organic&sortBy=customerName&sortOrder=asc&page=2&pageSize=20
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesQueryParams {
    pub search: Option<String>,
    pub regions: Option<String>,
    pub genders: Option<String>,
    pub product_categories: Option<String>,
    pub tags: Option<String>,
    pub payment_methods: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl SalesQueryParams {
    /// Convert string parameters into raw query options
    ///
    /// Lists are split on commas with blank entries dropped. Integers that
    /// fail to parse are treated as absent.
    pub fn into_options(self) -> SalesQueryOptions {
        SalesQueryOptions {
            search: self.search,
            regions: split_list(self.regions.as_deref()),
            genders: split_list(self.genders.as_deref()),
            product_categories: split_list(self.product_categories.as_deref()),
            tags: split_list(self.tags.as_deref()),
            payment_methods: split_list(self.payment_methods.as_deref()),
            age_min: parse_int(self.age_min.as_deref()),
            age_max: parse_int(self.age_max.as_deref()),
            date_from: self.date_from,
            date_to: self.date_to,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            page: parse_int(self.page.as_deref()),
            page_size: parse_int(self.page_size.as_deref()),
        }
    }
}

fn split_list(param: Option<&str>) -> Vec<String> {
    param
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_int(param: Option<&str>) -> Option<i64> {
    param.and_then(|s| s.trim().parse().ok())
}

/// Keep the first [`MAX_FILTER_VALUES`] non-blank values of a multi-select list
pub fn sanitize_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .take(MAX_FILTER_VALUES)
        .map(str::to_string)
        .collect()
}

/// Trim search text and cut it to [`MAX_SEARCH_LENGTH`] characters
///
/// Returns `None` when nothing is left to search for.
pub fn sanitize_search(search: Option<&str>) -> Option<String> {
    let trimmed: String = search?.trim().chars().take(MAX_SEARCH_LENGTH).collect();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Sortable fields
///
/// This is a closed allow-list. Client-supplied names are resolved through
/// [`SortField::from_param`] and never reach the store verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Quantity,
    CustomerName,
    TotalAmount,
    Age,
}

impl SortField {
    /// Resolve a client-supplied sort name, falling back to [`SortField::Date`]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("quantity") => SortField::Quantity,
            Some("customerName") => SortField::CustomerName,
            Some("totalAmount") => SortField::TotalAmount,
            Some("age") => SortField::Age,
            _ => SortField::Date,
        }
    }

    /// Stored field name
    pub fn field_name(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Quantity => "quantity",
            SortField::CustomerName => "customerName",
            SortField::TotalAmount => "totalAmount",
            SortField::Age => "age",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// `asc` is ascending, everything else (including absent) descending
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("asc") => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }
}

/// Sort key and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            field: SortField::from_param(sort_by),
            order: SortOrder::from_param(sort_order),
        }
    }
}

/// Validated page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    page_size: u32,
}

impl PageWindow {
    /// Bound raw pagination input
    ///
    /// `page` defaults to 1 and is floored at 1. `pageSize` defaults to
    /// [`DEFAULT_PAGE_SIZE`] (zero counts as unset) and is clamped to
    /// `[1, MAX_PAGE_SIZE]`.
    pub fn from_raw(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.filter(|p| *p != 0).unwrap_or(1).clamp(1, u32::MAX as i64) as u32;
        let page_size = page_size
            .filter(|s| *s != 0)
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as u32;

        Self { page, page_size }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Records to skip before the window starts
    pub fn skip(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Maximum records in the window
    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::from_raw(None, None)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: u32,

    /// Number of items per page
    pub page_size: u32,

    /// Total number of items (after filters)
    pub total_items: u64,

    /// Total number of pages
    pub total_pages: u64,

    /// Whether there is a next page
    pub has_next_page: bool,

    /// Whether there is a previous page
    pub has_prev_page: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from a window and a total count
    pub fn new(window: PageWindow, total_items: u64) -> Self {
        let page_size = window.page_size().max(1);
        let total_pages = total_items.div_ceil(page_size as u64);

        Self {
            page: window.page(),
            page_size,
            total_items,
            total_pages,
            has_next_page: (window.page() as u64) < total_pages,
            has_prev_page: window.page() > 1,
        }
    }

    /// Metadata for a request that was rejected before reaching the store
    pub fn empty(window: PageWindow) -> Self {
        Self {
            page: window.page(),
            page_size: window.page_size(),
            total_items: 0,
            total_pages: 0,
            has_next_page: false,
            has_prev_page: false,
        }
    }

    /// Whether the requested page lies past the last page
    pub fn is_beyond_last_page(&self) -> bool {
        self.total_pages > 0 && self.page as u64 > self.total_pages
    }
}
