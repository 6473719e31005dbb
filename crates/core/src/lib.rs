pub mod bag;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod gaps;
pub mod loft;
pub mod preferences;
pub mod session;

#[cfg(test)]
mod test_support;

pub use bag::{Bag, BagAddError, BagRejection, CheckoutLine, CheckoutSummary, MAX_BAG_SIZE};
pub use catalog::{
    filter_catalog, query_catalog, CatalogError, CatalogIssue, CatalogPage, CatalogSession,
    CatalogSnapshot, CatalogSource, CatalogState, FilterCriteria, PageWindow, SortKey,
};
pub use domain::bag_entry::BagEntry;
pub use domain::club::{CatalogDocument, ClubModel, ClubModelId, ClubType, HandicapperLevel};
pub use domain::description::{DescriptionFacts, Handedness};
pub use domain::variant::{RetailerPrice, Variant, VariantId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use gaps::{analyze_bag, GapReport, LoftGap, MatchTier, Recommendation};
pub use loft::parse_loft;
pub use preferences::{LoftGapTargets, PreferenceStore};
pub use session::BrowseState;
