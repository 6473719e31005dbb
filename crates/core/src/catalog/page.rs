use serde::{Deserialize, Serialize};

use crate::domain::club::ClubModel;

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [25, 50, 75, 100];
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const PAGE_WINDOW_WIDTH: usize = 5;

/// Page-number buttons around the current page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub pages: Vec<usize>,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
}

impl PageWindow {
    /// A window of up to five pages centered on `current`, clamped to
    /// `1..=total_pages`.
    pub fn around(current: usize, total_pages: usize) -> Self {
        if total_pages == 0 {
            return Self::default();
        }
        let current = current.clamp(1, total_pages);
        let half = PAGE_WINDOW_WIDTH / 2;

        let mut start = current.saturating_sub(half).max(1);
        let end = (start + PAGE_WINDOW_WIDTH - 1).min(total_pages);
        if end == total_pages {
            start = (end + 1).saturating_sub(PAGE_WINDOW_WIDTH).max(1);
        }

        Self {
            pages: (start..=end).collect(),
            leading_ellipsis: start > 1,
            trailing_ellipsis: end < total_pages,
        }
    }
}

/// One page of query results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<ClubModel>,
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    pub window: PageWindow,
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Slices `items` for the 1-based `page`. Pages outside `1..=total_pages`
/// are empty.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    let page_size = page_size.max(1);
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn page_of(matched: &[&ClubModel], page_size: usize, page: usize) -> CatalogPage {
    let page_size = page_size.max(1);
    let total_pages = total_pages(matched.len(), page_size);
    CatalogPage {
        items: paginate(matched, page_size, page).iter().map(|model| (*model).clone()).collect(),
        total_items: matched.len(),
        total_pages,
        page,
        page_size,
        window: PageWindow::around(page, total_pages),
    }
}
