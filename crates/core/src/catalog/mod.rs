pub mod filter;
pub mod page;
pub mod snapshot;
pub mod source;

pub use filter::{filter_catalog, FilterCriteria, SortKey};
pub use page::{CatalogPage, PageWindow};
pub use snapshot::{CatalogIssue, CatalogIssueKind, CatalogSnapshot};
pub use source::{CatalogError, CatalogSession, CatalogSource, CatalogState, FetchTicket};

/// Filters, sorts and paginates a snapshot in one call.
pub fn query_catalog(
    snapshot: &CatalogSnapshot,
    criteria: &FilterCriteria,
    sort: SortKey,
    page: usize,
    page_size: usize,
) -> CatalogPage {
    let matched = filter_catalog(snapshot.models(), criteria, sort);
    page::page_of(&matched, page_size, page)
}

#[cfg(test)]
mod tests {
    use super::{query_catalog, CatalogSnapshot, FilterCriteria, SortKey};
    use crate::test_support::{club, variant};

    #[test]
    fn query_reports_totals_across_pages() {
        let models = (1..=7)
            .map(|id| {
                let putter = variant(id, None, 100 + id);
                club("Putter", None, None, "Odyssey", &format!("Putter {id}"), vec![putter])
            })
            .collect();
        let snapshot = CatalogSnapshot::ingest(models);

        let page =
            query_catalog(&snapshot, &FilterCriteria::default(), SortKey::PriceDesc, 2, 3);

        assert_eq!(page.total_items, 7);
        assert_eq!(page.total_pages, 3);
        let names = page.items.iter().map(|model| model.model.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Putter 4", "Putter 3", "Putter 2"]);
        assert_eq!(page.window.pages, vec![1, 2, 3]);
    }
}
