//! Page-number pagination.
//!
//! [`Pagination`] holds the configured policy (default and maximum page size)
//! and turns raw `page` / `page_size` query values into a [`PageRequest`].
//! Listing operations answer with a [`Page`].

use crate::{EngineError, ResultEngine};

pub const DEFAULT_PAGE_SIZE: u64 = 25;
pub const MAX_PAGE_SIZE: u64 = 100;

const INVALID_PAGE: &str = "Invalid page.";

/// Page size policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Build a policy, rejecting sizes that cannot produce a page.
    pub fn new(default_page_size: u64, max_page_size: u64) -> ResultEngine<Self> {
        if default_page_size == 0 || max_page_size < default_page_size {
            return Err(EngineError::InvalidPage(format!(
                "invalid pagination settings: default {default_page_size}, max {max_page_size}"
            )));
        }
        Ok(Self {
            default_page_size,
            max_page_size,
        })
    }

    /// Resolve raw query values.
    ///
    /// - missing `page` means the first page; anything that is not a positive
    ///   integer is an [`EngineError::InvalidPage`].
    /// - `page_size` above the maximum is clamped; missing, zero or
    ///   non-numeric values fall back to the default.
    pub fn request(
        &self,
        page: Option<&str>,
        page_size: Option<&str>,
    ) -> ResultEngine<PageRequest> {
        let page = match page.map(str::trim).filter(|p| !p.is_empty()) {
            None => 1,
            Some(raw) => match raw.parse::<u64>() {
                Ok(page) if page >= 1 => page,
                _ => return Err(EngineError::InvalidPage(INVALID_PAGE.to_string())),
            },
        };

        let page_size = page_size
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|size| *size > 0)
            .map(|size| size.min(self.max_page_size))
            .unwrap_or(self.default_page_size);

        Ok(PageRequest { page, page_size })
    }
}

/// A resolved, 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Zero-based page index, as expected by sea-orm's paginator.
    pub(crate) fn index(&self) -> u64 {
        self.page - 1
    }

    /// Check the request against the number of pages the query yields.
    ///
    /// The first page always exists, even for an empty result.
    pub(crate) fn ensure_within(&self, num_pages: u64) -> ResultEngine<()> {
        if self.page == 1 || self.page <= num_pages {
            Ok(())
        } else {
            Err(EngineError::InvalidPage(INVALID_PAGE.to_string()))
        }
    }
}

/// One page of results.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of rows matching the query.
    pub count: u64,
    pub page: u64,
    pub num_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            page: self.page,
            num_pages: self.num_pages,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            count: self.count,
            page: self.page,
            num_pages: self.num_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let req = Pagination::default().request(None, None).unwrap();
        assert_eq!(
            req,
            PageRequest {
                page: 1,
                page_size: DEFAULT_PAGE_SIZE
            }
        );
    }

    #[test]
    fn page_size_is_clamped_to_max() {
        let pagination = Pagination::new(10, 50).unwrap();
        let req = pagination.request(Some("2"), Some("500")).unwrap();
        assert_eq!(req.page, 2);
        assert_eq!(req.page_size, 50);
    }

    #[test]
    fn bad_page_size_falls_back_to_default() {
        let pagination = Pagination::new(10, 50).unwrap();
        assert_eq!(pagination.request(None, Some("0")).unwrap().page_size, 10);
        assert_eq!(pagination.request(None, Some("abc")).unwrap().page_size, 10);
        assert_eq!(pagination.request(None, Some("-3")).unwrap().page_size, 10);
    }

    #[test]
    fn bad_page_is_invalid() {
        let pagination = Pagination::default();
        for raw in ["0", "-1", "abc", "1.5"] {
            assert_eq!(
                pagination.request(Some(raw), None),
                Err(EngineError::InvalidPage("Invalid page.".to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn first_page_always_exists() {
        let req = PageRequest {
            page: 1,
            page_size: 10,
        };
        assert!(req.ensure_within(0).is_ok());

        let req = PageRequest {
            page: 2,
            page_size: 10,
        };
        assert!(req.ensure_within(1).is_err());
        assert!(req.ensure_within(2).is_ok());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(Pagination::new(0, 10).is_err());
        assert!(Pagination::new(20, 10).is_err());
        assert!(Pagination::new(1, 1).is_ok());
    }
}
