use serde::{Deserialize, Serialize};

use crate::catalog::page::DEFAULT_PAGE_SIZE;
use crate::catalog::{query_catalog, CatalogPage, CatalogSnapshot, FilterCriteria, SortKey};
use crate::preferences::LoftGapTargets;

/// Browse view-state owned by the presentation layer. Any change to what is
/// being listed sends the shopper back to page one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrowseState {
    criteria: FilterCriteria,
    sort: SortKey,
    page: usize,
    page_size: usize,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl BrowseState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            sort: SortKey::Default,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.page = 1;
    }

    pub fn update_criteria(&mut self, update: impl FnOnce(&mut FilterCriteria)) {
        update(&mut self.criteria);
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Filters the catalog to variants near the gaps between `lofts`. An
    /// empty gap list clears the loft filter.
    pub fn apply_loft_preferences(&mut self, lofts: &[f64]) {
        let targets = LoftGapTargets::from_lofts(lofts);
        self.update_criteria(|criteria| {
            criteria.loft_gap_targets = (!targets.is_empty()).then_some(targets);
        });
    }

    pub fn clear_loft_preferences(&mut self) {
        self.update_criteria(|criteria| criteria.loft_gap_targets = None);
    }

    pub fn query(&self, snapshot: &CatalogSnapshot) -> CatalogPage {
        query_catalog(snapshot, &self.criteria, self.sort, self.page, self.page_size)
    }
}
