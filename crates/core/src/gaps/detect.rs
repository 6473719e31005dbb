use serde::{Deserialize, Serialize};

/// Adjacent lofts further apart than this leave a gap worth filling.
pub const GAP_THRESHOLD_DEGREES: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoftGap {
    /// Position of the lower-lofted side of the pair in the analysed sequence.
    pub index: usize,
    pub lower_loft: f64,
    pub upper_loft: f64,
    pub gap_degrees: f64,
    pub recommended_loft: f64,
}

/// Walks adjacent pairs of `lofts` in the given order and records every pair
/// whose difference exceeds `threshold`. Pairs with a non-finite side are
/// skipped. The recommended loft is the midpoint of the pair.
pub fn find_gaps(lofts: &[f64], threshold: f64) -> Vec<LoftGap> {
    lofts
        .windows(2)
        .enumerate()
        .filter_map(|(index, pair)| {
            let (lower, upper) = (pair[0], pair[1]);
            if !lower.is_finite() || !upper.is_finite() {
                return None;
            }
            let gap = upper - lower;
            (gap > threshold).then(|| LoftGap {
                index,
                lower_loft: lower,
                upper_loft: upper,
                gap_degrees: gap,
                recommended_loft: lower + gap / 2.0,
            })
        })
        .collect()
}
