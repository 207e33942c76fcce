use super::error::DomainError;

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 10;
pub(crate) const MAX_PAGE_SIZE: u32 = 100;

/// Page-size policy applied to every list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageLimits {
    default_page_size: u32,
    max_page_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    pub(crate) fn new(default_page_size: u32, max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    /// Resolves client-supplied paging. Oversized pages are capped rather than
    /// rejected and a zero page size falls back to the default; page numbers
    /// start at 1.
    pub(crate) fn resolve(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Pagination, DomainError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(DomainError::Validation {
                field: "page",
                message: "must be >= 1",
            });
        }

        let page_size = match page_size {
            None | Some(0) => self.default_page_size,
            Some(size) => size.min(self.max_page_size),
        };

        Ok(Pagination { page, page_size })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

impl Pagination {
    pub(crate) fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * self.limit()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total: i64,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }

    pub(crate) fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DomainError, PageLimits, Pagination};

    #[test]
    fn resolve_applies_defaults() {
        let pagination = PageLimits::default()
            .resolve(None, None)
            .expect("defaults must resolve");
        assert_eq!(
            pagination,
            Pagination {
                page: 1,
                page_size: 10
            }
        );
    }

    #[test]
    fn resolve_caps_page_size_at_maximum() {
        let pagination = PageLimits::default()
            .resolve(Some(2), Some(500))
            .expect("oversized page must be capped");
        assert_eq!(pagination.page_size, 100);
        assert_eq!(pagination.offset(), 100);
    }

    #[test]
    fn resolve_treats_zero_page_size_as_default() {
        let pagination = PageLimits::new(25, 50)
            .resolve(None, Some(0))
            .expect("zero page size must fall back");
        assert_eq!(pagination.page_size, 25);
    }

    #[test]
    fn resolve_rejects_page_zero() {
        let err = PageLimits::default()
            .resolve(Some(0), None)
            .expect_err("page 0 must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "page", .. }));
    }

    #[test]
    fn new_keeps_default_within_maximum() {
        let pagination = PageLimits::new(500, 20)
            .resolve(None, None)
            .expect("defaults must resolve");
        assert_eq!(pagination.page_size, 20);
    }
}
