//! Bag gap analysis: canonical ordering, loft-gap detection and catalog
//! recommendations for each gap.

pub mod detect;
pub mod ordering;
pub mod recommend;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::snapshot::CatalogSnapshot;
use crate::domain::bag_entry::BagEntry;

pub use detect::{find_gaps, LoftGap, GAP_THRESHOLD_DEGREES};
pub use ordering::canonical_order;
pub use recommend::{eligible_types, recommend_for_gap, MatchTier, Recommendation};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub sorted_bag: Vec<BagEntry>,
    pub gaps: Vec<LoftGap>,
    pub recommendations: Vec<Recommendation>,
}

/// Gaps between adjacent entries of an already sorted bag. Pairs touching a
/// full iron set are never analysed.
pub fn bag_gaps(sorted_bag: &[BagEntry]) -> Vec<LoftGap> {
    let lofts = sorted_bag.iter().map(BagEntry::loft_degrees).collect::<Vec<_>>();
    find_gaps(&lofts, GAP_THRESHOLD_DEGREES)
        .into_iter()
        .filter(|gap| {
            !sorted_bag[gap.index].is_full_set() && !sorted_bag[gap.index + 1].is_full_set()
        })
        .collect()
}

pub fn analyze_bag(entries: &[BagEntry], snapshot: &CatalogSnapshot) -> GapReport {
    let sorted_bag = canonical_order(entries);
    let gaps = bag_gaps(&sorted_bag);
    let recommendations = gaps
        .iter()
        .map(|gap| recommend_for_gap(snapshot, &sorted_bag, gap))
        .collect::<Vec<_>>();

    debug!(
        event_name = "gaps.report.computed",
        bag_size = sorted_bag.len(),
        gaps = gaps.len(),
        filled = recommendations.iter().filter(|r| r.candidate.is_some()).count(),
        "gap report computed"
    );

    GapReport { sorted_bag, gaps, recommendations }
}
