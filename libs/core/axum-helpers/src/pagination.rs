//! Shared pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

fn default_size() -> u64 {
    20
}

/// Query parameters for paged listings: page number (0-based), page size and
/// an optional sort order of the form `field` or `field,desc`.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PageParams {
    /// 0-based page number
    #[serde(default)]
    pub page: u64,
    /// Page size
    #[serde(default = "default_size")]
    pub size: u64,
    /// Sort order, e.g. `name` or `price,desc`
    pub sort: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_size(),
            sort: None,
        }
    }
}

/// Direction of a sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl PageParams {
    /// Parse the `sort` parameter into a field name and direction.
    ///
    /// Returns `None` when no sort was requested. The direction defaults to
    /// ascending; anything other than `desc` (case-insensitive) is ascending.
    pub fn sort_spec(&self) -> Option<(&str, SortDirection)> {
        let raw = self.sort.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        match raw.split_once(',') {
            Some((field, dir)) => {
                let direction = if dir.trim().eq_ignore_ascii_case("desc") {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                Some((field.trim(), direction))
            }
            None => Some((raw, SortDirection::Asc)),
        }
    }

    /// Row offset of this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page: u64, size: u64, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size)
        };

        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }

    /// Map the page content while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(sort: Option<&str>) -> PageParams {
        PageParams {
            page: 0,
            size: 20,
            sort: sort.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_sort_spec_none() {
        assert_eq!(params(None).sort_spec(), None);
        assert_eq!(params(Some("")).sort_spec(), None);
    }

    #[test]
    fn test_sort_spec_field_only_is_ascending() {
        assert_eq!(
            params(Some("name")).sort_spec(),
            Some(("name", SortDirection::Asc))
        );
    }

    #[test]
    fn test_sort_spec_with_direction() {
        assert_eq!(
            params(Some("price,desc")).sort_spec(),
            Some(("price", SortDirection::Desc))
        );
        assert_eq!(
            params(Some("price, DESC")).sort_spec(),
            Some(("price", SortDirection::Desc))
        );
        assert_eq!(
            params(Some("price,asc")).sort_spec(),
            Some(("price", SortDirection::Asc))
        );
    }

    #[test]
    fn test_offset() {
        let p = PageParams {
            page: 3,
            size: 12,
            sort: None,
        };
        assert_eq!(p.offset(), 36);
    }

    #[test]
    fn test_page_metadata() {
        let page = Page::new(vec![1, 2, 3], 0, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 7);

        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20, 30]);
        assert_eq!(mapped.total_pages, 3);
    }

    #[test]
    fn test_empty_page_zero_size() {
        let page: Page<i32> = Page::new(vec![], 0, 0, 0);
        assert_eq!(page.total_pages, 0);
    }
}
