//! User-entered lofts of the clubs a golfer already owns, and the loft
//! targets derived from them for catalog filtering.

pub mod store;

use serde::{Deserialize, Serialize};

use crate::gaps::detect::{find_gaps, GAP_THRESHOLD_DEGREES};
use crate::loft::parse_loft;

pub use store::{
    InMemoryPreferenceStore, JsonFilePreferenceStore, PreferenceError, PreferenceStore,
    CURRENT_CLUB_LOFTS_KEY,
};

pub const MAX_LOFT_DEGREES: f64 = 70.0;
pub const MAX_PREFERRED_LOFTS: usize = 14;
pub const TARGET_TOLERANCE_DEGREES: f64 = 2.0;

/// Keeps lofts in `(0, 70]`, up to fourteen of them, in input order.
pub fn sanitize_lofts(lofts: &[f64]) -> Vec<f64> {
    lofts
        .iter()
        .copied()
        .filter(|loft| loft.is_finite() && *loft > 0.0 && *loft <= MAX_LOFT_DEGREES)
        .take(MAX_PREFERRED_LOFTS)
        .collect()
}

/// Parses free-text loft entries ("52", "10.5°"), dropping anything invalid.
pub fn parse_loft_inputs<S: AsRef<str>>(inputs: &[S]) -> Vec<f64> {
    let parsed = inputs.iter().map(|input| parse_loft(Some(input.as_ref()))).collect::<Vec<_>>();
    sanitize_lofts(&parsed)
}

/// Midpoints of every gap wider than five degrees between the sorted lofts.
pub fn recommended_lofts(lofts: &[f64]) -> Vec<f64> {
    let mut sorted = sanitize_lofts(lofts);
    sorted.sort_by(f64::total_cmp);
    find_gaps(&sorted, GAP_THRESHOLD_DEGREES).into_iter().map(|gap| gap.recommended_loft).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoftGapTargets {
    pub targets: Vec<f64>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    TARGET_TOLERANCE_DEGREES
}

impl LoftGapTargets {
    pub fn new(targets: Vec<f64>) -> Self {
        Self { targets, tolerance: TARGET_TOLERANCE_DEGREES }
    }

    pub fn from_lofts(lofts: &[f64]) -> Self {
        Self::new(recommended_lofts(lofts))
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, loft: f64) -> bool {
        loft.is_finite()
            && self.targets.iter().any(|target| (loft - target).abs() <= self.tolerance)
    }
}
