use serde::{Deserialize, Serialize};

/// Hard limit on addressable pages imposed by the catalog provider
pub const PROVIDER_PAGE_CAP: u32 = 500;

/// One batch of a paginated listing.
///
/// `page_number` is always within `1..=total_pages` and `total_pages` is never
/// zero. Use [`Page::new`] to get those guarantees from raw provider numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Build a page, clamping `total_pages` to `1..=PROVIDER_PAGE_CAP` and
    /// `page_number` into the resulting range.
    pub fn new(items: Vec<T>, page_number: u32, total_pages: u32) -> Self {
        let total_pages = clamp_total_pages(total_pages);
        Self {
            items,
            page_number: clamp_page(page_number, total_pages),
            total_pages,
        }
    }

    /// The single empty page used after a failed load
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_number: 1,
            total_pages: 1,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }
}

pub fn clamp_total_pages(provider_total: u32) -> u32 {
    provider_total.clamp(1, PROVIDER_PAGE_CAP)
}

pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}
