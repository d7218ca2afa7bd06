use serde::{Deserialize, Serialize};

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Number of rows to skip. Page 0 is treated as page 1.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Whether this page lies outside `1..=num_pages` for `total` rows.
    /// Repositories check this before fetching so huge page numbers never
    /// reach offset arithmetic.
    pub fn is_beyond(&self, total: u64) -> bool {
        self.page == 0 || self.page > page_count(total, self.per_page)
    }
}

/// Number of pages `total` rows fill. An empty result still has one page.
fn page_count(total: u64, per_page: u64) -> u64 {
    if total == 0 || per_page == 0 {
        1
    } else {
        total.div_ceil(per_page)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// Total number of pages. An empty result still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        page_count(self.total, self.per_page)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether the requested page lies outside `1..=num_pages`.
    pub fn is_out_of_range(&self) -> bool {
        PageRequest::new(self.page, self.per_page).is_beyond(self.total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_a_single_page() {
        let page: Page<u8> = Page::new(vec![], 0, PageRequest::new(1, 6));
        assert_eq!(page.num_pages(), 1);
        assert!(!page.is_out_of_range());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn page_bounds() {
        let page: Page<u8> = Page::new(vec![], 13, PageRequest::new(3, 6));
        assert_eq!(page.num_pages(), 3);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let beyond: Page<u8> = Page::new(vec![], 13, PageRequest::new(4, 6));
        assert!(beyond.is_out_of_range());
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(1, 6).offset(), 0);
        assert_eq!(PageRequest::new(3, 6).offset(), 12);
    }

    #[test]
    fn huge_page_numbers_saturate_and_fall_outside() {
        let request = PageRequest::new(u64::MAX, 6);
        assert_eq!(request.offset(), u64::MAX);
        assert!(request.is_beyond(13));
        assert!(!PageRequest::new(3, 6).is_beyond(13));
        assert!(!PageRequest::new(1, 6).is_beyond(0));
    }
}
