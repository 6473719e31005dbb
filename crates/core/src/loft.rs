//! Loft parsing for the free-text `loft` fields carried by catalog variants.
//!
//! Catalog lofts look like `"10.5°"`, `"19 degrees"`, `"7degree"` or `"N/A"`.
//! Anything that does not start with a number parses as `f64::INFINITY`, which
//! sorts last and is excluded from gap analysis.

use std::sync::OnceLock;

use regex::Regex;

const LOFT_SUFFIXES: [&str; 4] = ["°", " degrees", "degrees", "degree"];

fn leading_number() -> &'static Regex {
    static LEADING_NUMBER: OnceLock<Regex> = OnceLock::new();
    LEADING_NUMBER.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)").expect("leading number pattern is valid")
    })
}

/// Parses a catalog loft string into degrees.
pub fn parse_loft(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return f64::INFINITY;
    };

    let mut cleaned = raw.trim();
    for suffix in LOFT_SUFFIXES {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.trim_end();
        }
    }

    leading_number()
        .find(cleaned)
        .and_then(|token| token.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(f64::INFINITY)
}

/// Returns the loft only when it parsed to a finite value.
pub fn finite_loft(raw: Option<&str>) -> Option<f64> {
    let value = parse_loft(raw);
    value.is_finite().then_some(value)
}
