//! Pagination and sorting parameters for blog listings.

use std::fmt;

use blog_shared::FieldViolation;
use blog_shared::dto::ListBlogsQuery;

use crate::error::DomainError;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Columns a blog listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    /// Accepts both the camelCase and snake_case spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "updatedAt" | "updated_at" => Some(Self::UpdatedAt),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A validated, zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

impl PageRequest {
    /// Build a request from raw query parameters, rejecting unknown sort
    /// fields, unknown directions, out-of-range sizes and pages whose offset
    /// does not fit a signed 64-bit SQL `OFFSET`.
    pub fn from_query(query: &ListBlogsQuery) -> Result<Self, DomainError> {
        let mut violations = Vec::new();
        let defaults = Self::default();

        let size = query.size.unwrap_or(defaults.size);
        let size_ok = (1..=MAX_PAGE_SIZE).contains(&size);
        if !size_ok {
            violations.push(FieldViolation::new(
                "size",
                format!("Page size must be between 1 & {MAX_PAGE_SIZE}"),
            ));
        }

        let page = query.page.unwrap_or(defaults.page);
        if size_ok && !Self::offset_fits(page, size) {
            violations.push(FieldViolation::new("page", "Page number is too large"));
        }

        let sort = match query.sort.as_deref() {
            None | Some("") => defaults.sort,
            Some(raw) => SortField::parse(raw).unwrap_or_else(|| {
                violations.push(FieldViolation::new(
                    "sort",
                    format!("Unknown sort field `{raw}`"),
                ));
                defaults.sort
            }),
        };

        let direction = match query.direction.as_deref() {
            None | Some("") => defaults.direction,
            Some(raw) => SortDirection::parse(raw).unwrap_or_else(|| {
                violations.push(FieldViolation::new(
                    "direction",
                    "Sort direction must be `asc` or `desc`",
                ));
                defaults.direction
            }),
        };

        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }

        Ok(Self {
            page,
            size,
            sort,
            direction,
        })
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Whether `page * size` is addressable by the store.
    pub fn offset_fits(page: u64, size: u64) -> bool {
        page.checked_mul(size).is_some_and(|offset| offset <= i64::MAX as u64)
    }

    /// Whether this is the final page of `total_pages`. Pages past the end count as last.
    pub fn is_last(&self, total_pages: u64) -> bool {
        self.page.saturating_add(1) >= total_pages
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.page,
            self.size,
            self.sort.as_str(),
            self.direction.as_str()
        )
    }
}

/// A slice of results with the total count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self, size: u64) -> u64 {
        self.total_items.div_ceil(size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_query(page: u64, size: Option<u64>) -> ListBlogsQuery {
        ListBlogsQuery {
            page: Some(page),
            size,
            ..ListBlogsQuery::default()
        }
    }

    fn query(sort: Option<&str>, direction: Option<&str>, size: Option<u64>) -> ListBlogsQuery {
        ListBlogsQuery {
            page: None,
            size,
            sort: sort.map(str::to_string),
            direction: direction.map(str::to_string),
        }
    }

    #[test]
    fn defaults_when_nothing_given() {
        let request = PageRequest::from_query(&ListBlogsQuery::default()).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn accepts_both_spellings() {
        let request = PageRequest::from_query(&query(Some("updatedAt"), Some("ASC"), None)).unwrap();
        assert_eq!(request.sort, SortField::UpdatedAt);
        assert_eq!(request.direction, SortDirection::Asc);

        let request = PageRequest::from_query(&query(Some("created_at"), None, None)).unwrap();
        assert_eq!(request.sort, SortField::CreatedAt);
    }

    #[test]
    fn rejects_unknown_sort_and_direction_together() {
        let err = PageRequest::from_query(&query(Some("password"), Some("up"), None)).unwrap_err();
        match err {
            DomainError::Validation(violations) => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["sort", "direction"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_size() {
        assert!(PageRequest::from_query(&query(None, None, Some(0))).is_err());
        assert!(PageRequest::from_query(&query(None, None, Some(MAX_PAGE_SIZE + 1))).is_err());
        assert!(PageRequest::from_query(&query(None, None, Some(MAX_PAGE_SIZE))).is_ok());
    }

    #[test]
    fn rejects_pages_beyond_addressable_offset() {
        let err = PageRequest::from_query(&page_query(u64::MAX, None)).unwrap_err();
        match err {
            DomainError::Validation(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "page");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let largest = i64::MAX as u64 / MAX_PAGE_SIZE;
        assert!(PageRequest::from_query(&page_query(largest, Some(MAX_PAGE_SIZE))).is_ok());
        assert!(PageRequest::from_query(&page_query(largest + 1, Some(MAX_PAGE_SIZE))).is_err());
    }

    #[test]
    fn last_page_never_overflows() {
        let request = PageRequest {
            page: u64::MAX,
            ..PageRequest::default()
        };
        assert!(request.is_last(0));
        assert!(request.is_last(u64::MAX));

        let first = PageRequest::default();
        assert!(!first.is_last(2));
        assert!(first.is_last(1));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<()> = Page {
            items: vec![],
            total_items: 21,
        };
        assert_eq!(page.total_pages(10), 3);
        assert_eq!(Page::<()> { items: vec![], total_items: 0 }.total_pages(10), 0);
    }
}
