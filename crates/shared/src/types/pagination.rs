//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Maximum allowed page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Returns the page number, clamped to at least 1.
    #[must_use]
    pub const fn page(&self) -> u32 {
        if self.page == 0 { 1 } else { self.page }
    }

    /// Returns the page size, clamped to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.per_page())
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page())
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total_count: u64,
    /// Total number of pages. Zero when there are no matching rows.
    pub total_pages: u64,
}

impl PageMeta {
    /// Computes metadata for a page request and a total row count.
    #[must_use]
    pub fn new(request: &PageRequest, total_count: u64) -> Self {
        let per_page = request.per_page();
        Self {
            page: request.page(),
            per_page,
            total_count,
            total_pages: total_count.div_ceil(u64::from(per_page)),
        }
    }
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub const fn new(data: Vec<T>, pagination: PageMeta) -> Self {
        Self { data, pagination }
    }

    /// Maps the page items to another type, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 10);
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest {
            page: 1,
            per_page: 20,
        };
        assert_eq!(request.offset(), 0);

        let request = PageRequest {
            page: 2,
            per_page: 10,
        };
        assert_eq!(request.offset(), 10);
    }

    #[test]
    fn test_page_zero_treated_as_first_page() {
        let request = PageRequest {
            page: 0,
            per_page: 10,
        };
        assert_eq!(request.page(), 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_per_page_clamped() {
        let request = PageRequest {
            page: 1,
            per_page: 500,
        };
        assert_eq!(request.per_page(), MAX_PER_PAGE);

        let request = PageRequest {
            page: 1,
            per_page: 0,
        };
        assert_eq!(request.per_page(), 1);
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let meta = PageMeta::new(&PageRequest::default(), 0);
        assert_eq!(meta.total_count, 0);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_total_pages_25_rows_per_10() {
        let request = PageRequest {
            page: 2,
            per_page: 10,
        };
        let meta = PageMeta::new(&request, 25);
        assert_eq!(meta.total_count, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(request.offset(), 10);
    }

    proptest! {
        /// total_pages == ceil(total_count / per_page) for all valid inputs.
        #[test]
        fn prop_total_pages_is_ceil(
            page in 1u32..1000,
            per_page in 1u32..=MAX_PER_PAGE,
            total in 0u64..1_000_000,
        ) {
            let request = PageRequest { page, per_page };
            let meta = PageMeta::new(&request, total);

            let expected = total.div_ceil(u64::from(per_page));
            prop_assert_eq!(meta.total_pages, expected);
            prop_assert!(meta.total_pages * u64::from(per_page) >= total);
        }

        /// Slicing a row set with the request's OFFSET/LIMIT yields exactly
        /// min(per_page, max(0, total - offset)) rows, starting at the offset.
        #[test]
        fn prop_page_window(
            page in 1u32..100,
            per_page in 1u32..=MAX_PER_PAGE,
            total in 0u64..10_000,
        ) {
            let request = PageRequest { page, per_page };

            // Simulate what the database does with OFFSET/LIMIT over
            // `total` ordered rows.
            let rows: Vec<u64> = (0..total).collect();
            let window: Vec<u64> = rows
                .iter()
                .copied()
                .skip(usize::try_from(request.offset()).unwrap())
                .take(usize::try_from(request.limit()).unwrap())
                .collect();

            let expected_len = total
                .saturating_sub(request.offset())
                .min(request.limit());

            prop_assert_eq!(u64::try_from(window.len()).unwrap(), expected_len);
            if let Some(&first) = window.first() {
                prop_assert_eq!(first, request.offset());
            } else {
                prop_assert!(request.offset() >= total);
            }
        }
    }
}
