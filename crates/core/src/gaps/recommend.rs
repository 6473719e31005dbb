use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::snapshot::CatalogSnapshot;
use crate::domain::bag_entry::BagEntry;
use crate::domain::club::ClubType;
use crate::gaps::detect::LoftGap;

pub const CLOSE_TOLERANCE_DEGREES: f64 = 2.0;
pub const WIDENED_TOLERANCE_DEGREES: f64 = 7.0;

/// Which tolerance band produced a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Close,
    Widened,
}

impl MatchTier {
    pub const ALL: [MatchTier; 2] = [MatchTier::Close, MatchTier::Widened];

    pub fn tolerance(self) -> f64 {
        match self {
            Self::Close => CLOSE_TOLERANCE_DEGREES,
            Self::Widened => WIDENED_TOLERANCE_DEGREES,
        }
    }
}

/// The best catalog variant for one gap, or none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub gap_index: usize,
    pub target_loft: f64,
    pub candidate: Option<BagEntry>,
    pub tier: Option<MatchTier>,
}

impl Recommendation {
    fn empty(gap: &LoftGap) -> Self {
        Self {
            gap_index: gap.index,
            target_loft: gap.recommended_loft,
            candidate: None,
            tier: None,
        }
    }
}

/// Club types allowed to fill a gap between `lower` and `upper`. Pairs not
/// in the table get no candidates.
pub fn eligible_types(lower: Option<ClubType>, upper: Option<ClubType>) -> &'static [ClubType] {
    use ClubType::{Driver, FairwayWood, Hybrid, IronSet, Putter, Wedge};

    match (lower, upper) {
        (Some(Driver), Some(FairwayWood)) => &[FairwayWood, Hybrid],
        (Some(FairwayWood), Some(Hybrid)) => &[FairwayWood, Hybrid],
        (Some(Hybrid), Some(IronSet)) => &[Hybrid, IronSet],
        (Some(IronSet), Some(Wedge)) => &[IronSet, Wedge],
        (Some(Wedge), Some(Putter)) => &[Wedge],
        _ => &[],
    }
}

/// Searches the catalog for the variant closest to `gap.recommended_loft`,
/// first within the close band and then within the widened band.
///
/// `sorted_bag` must be the canonical bag order the gap was detected in.
/// Candidates whose loft equals a loft already in the bag are skipped, and
/// ties on distance keep catalog order.
pub fn recommend_for_gap(
    snapshot: &CatalogSnapshot,
    sorted_bag: &[BagEntry],
    gap: &LoftGap,
) -> Recommendation {
    let lower = sorted_bag.get(gap.index).and_then(BagEntry::kind);
    let upper = sorted_bag.get(gap.index + 1).and_then(BagEntry::kind);
    let eligible = eligible_types(lower, upper);
    if eligible.is_empty() {
        debug!(
            event_name = "gaps.recommend.no_adjacency",
            gap_index = gap.index,
            "no eligible club types for gap"
        );
        return Recommendation::empty(gap);
    }

    let bag_lofts = sorted_bag
        .iter()
        .map(BagEntry::loft_degrees)
        .filter(|loft| loft.is_finite())
        .collect::<Vec<_>>();

    let target = gap.recommended_loft;
    let candidates = snapshot
        .variants()
        .filter(|(model, _)| model.kind().is_some_and(|kind| eligible.contains(&kind)))
        .map(|(model, variant)| (model, variant, variant.loft_degrees()))
        .filter(|(_, _, loft)| loft.is_finite() && !bag_lofts.contains(loft))
        .collect::<Vec<_>>();

    for tier in MatchTier::ALL {
        let best = candidates
            .iter()
            .filter(|(_, _, loft)| (loft - target).abs() <= tier.tolerance())
            .min_by(|a, b| (a.2 - target).abs().total_cmp(&(b.2 - target).abs()));

        if let Some((model, variant, _)) = best {
            if sorted_bag.iter().any(|entry| entry.id() == variant.id) {
                return Recommendation::empty(gap);
            }
            return Recommendation {
                gap_index: gap.index,
                target_loft: target,
                candidate: Some(BagEntry::join(model, variant)),
                tier: Some(tier),
            };
        }
    }

    Recommendation::empty(gap)
}
