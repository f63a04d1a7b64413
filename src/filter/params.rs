use serde::Serialize;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::types::{SortDirection, SortSpec};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Raw list query string. Every value stays a string so that malformed
/// numbers fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub category_id: Option<String>,
    pub category_group: Option<String>,
    /// `_sort`
    pub sort: Option<String>,
    /// `sortField`
    pub sort_field: Option<String>,
    /// `_order`
    pub order: Option<String>,
    /// `sortOrder`
    pub sort_order: Option<String>,
    /// `_start`
    pub start: Option<String>,
    /// `_limit`
    pub limit: Option<String>,
}

impl ListQuery {
    /// Fold raw query pairs; the first occurrence of a repeated key wins
    /// and unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "page_size" => &mut query.page_size,
                "category_id" => &mut query.category_id,
                "category_group" => &mut query.category_group,
                "_sort" => &mut query.sort,
                "sortField" => &mut query.sort_field,
                "_order" => &mut query.order,
                "sortOrder" => &mut query.sort_order,
                "_start" => &mut query.start,
                "_limit" => &mut query.limit,
                _ => continue,
            };
            first_wins(slot, value);
        }
        query
    }
}

/// Keep the first value seen for a query key
pub fn first_wins(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// Normalized pagination, filter and sort request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationParams {
    pub page: u64,
    pub page_size: u64,
    pub category_id: Option<String>,
    pub category_group: Option<String>,
    #[serde(rename = "sortField")]
    pub sort_field: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: SortDirection,
    #[serde(rename = "_start")]
    pub start: u64,
    #[serde(rename = "_limit")]
    pub limit: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            category_id: None,
            category_group: None,
            sort_field: None,
            sort_order: SortDirection::Asc,
            start: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn from_query(query: &ListQuery) -> Self {
        let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let page_size = parse_positive(query.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE);

        let sort_field = first_present(&query.sort, &query.sort_field).map(str::to_string);
        let sort_order = first_present(&query.order, &query.sort_order)
            .map(SortDirection::from_param)
            .unwrap_or_default();

        // Explicit offset parameters win over page arithmetic when valid
        let start = parse_non_negative(query.start.as_deref())
            .unwrap_or_else(|| (page - 1).saturating_mul(page_size));
        let limit = parse_positive(query.limit.as_deref()).unwrap_or(page_size);

        Self {
            page,
            page_size,
            category_id: non_empty(&query.category_id),
            category_group: non_empty(&query.category_group),
            sort_field,
            sort_order,
            start,
            limit,
        }
    }

    pub fn sort_spec(&self) -> Result<Option<SortSpec>, FilterError> {
        FilterOrder::validate_and_parse(self.sort_field.as_deref(), self.sort_order)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as u64)
}

fn parse_non_negative(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 0)
        .map(|n| n as u64)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn first_present<'a>(primary: &'a Option<String>, fallback: &'a Option<String>) -> Option<&'a str> {
    primary
        .as_deref()
        .filter(|v| !v.is_empty())
        .or_else(|| fallback.as_deref().filter(|v| !v.is_empty()))
}
