//! Catalog filtering and sorting.
//!
//! All active predicates are ANDed; absent (or blank) criteria always match.
//! Price, sort order and the Hybrid/Fairway loft sub-filters look at a model's
//! first variant only.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::club::{ClubModel, ClubType};
use crate::domain::description::Handedness;
use crate::domain::variant::Variant;
use crate::errors::DomainError;
use crate::loft::parse_loft;
use crate::preferences::LoftGapTargets;

pub const ALL_CATEGORIES: &str = "All";
pub const UTILITY_IRON: &str = "Utility Iron";
pub const INDIVIDUAL_IRONS: &str = "Individual";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_item: Option<String>,
    #[serde(default)]
    pub sub_sub_item: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub handedness: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub handicapper_level: Option<String>,
    #[serde(default)]
    pub price_min: Option<Decimal>,
    #[serde(default)]
    pub price_max: Option<Decimal>,
    #[serde(default)]
    pub loft_gap_targets: Option<LoftGapTargets>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "brand")]
    Brand,
    #[serde(rename = "loft")]
    Loft,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Brand => "brand",
            Self::Loft => "loft",
        }
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Self::Default),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "brand" => Ok(Self::Brand),
            "loft" => Ok(Self::Loft),
            other => Err(DomainError::InvariantViolation(format!(
                "unsupported sort key `{other}` (expected default|price-asc|price-desc|brand|loft)"
            ))),
        }
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn eq_ignore_case(value: Option<&str>, expected: &str) -> bool {
    value.unwrap_or_default().to_lowercase() == expected.to_lowercase()
}

impl FilterCriteria {
    fn category(&self) -> Option<&str> {
        active(&self.category).filter(|category| *category != ALL_CATEGORIES)
    }

    pub fn is_empty(&self) -> bool {
        self.category().is_none()
            && active(&self.sub_item).is_none()
            && active(&self.sub_sub_item).is_none()
            && active(&self.search).is_none()
            && active(&self.handedness).is_none()
            && active(&self.brand).is_none()
            && active(&self.handicapper_level).is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.loft_gap_targets.as_ref().map_or(true, LoftGapTargets::is_empty)
    }

    /// Evaluates every active predicate against a model with at least one variant.
    pub fn matches(&self, model: &ClubModel, first: &Variant) -> bool {
        self.matches_category(model)
            && self.matches_sub_item(model, first)
            && self.matches_sub_sub_item(model)
            && self.matches_search(model)
            && self.matches_handedness(model)
            && active(&self.brand).map_or(true, |brand| model.brand == brand)
            && active(&self.handicapper_level)
                .map_or(true, |level| model.handicapper_level == level)
            && self.matches_price(first)
            && self.matches_loft_gap_targets(model)
    }

    fn matches_category(&self, model: &ClubModel) -> bool {
        self.category().map_or(true, |category| model.club_type == category)
    }

    fn matches_sub_item(&self, model: &ClubModel, first: &Variant) -> bool {
        let Some(sub_item) = active(&self.sub_item) else {
            return true;
        };
        let specific_type = model.specific_type.as_deref();

        match self.category().and_then(ClubType::from_label) {
            Some(ClubType::Hybrid) => {
                if sub_item == UTILITY_IRON {
                    return specific_type == Some(UTILITY_IRON);
                }
                let target = parse_loft(Some(sub_item));
                target.is_finite() && first.loft_degrees() == target
            }
            Some(ClubType::FairwayWood) => {
                first.loft.as_deref() == Some(sub_item) || eq_ignore_case(specific_type, sub_item)
            }
            Some(ClubType::Wedge) => specific_type == Some(sub_item),
            Some(ClubType::IronSet) => match active(&self.sub_sub_item) {
                Some(sub_sub_item) => {
                    model.subtype.as_deref() == Some(INDIVIDUAL_IRONS)
                        && eq_ignore_case(specific_type, sub_sub_item)
                }
                None => model.subtype.as_deref() == Some(sub_item),
            },
            _ => eq_ignore_case(specific_type, sub_item),
        }
    }

    fn matches_sub_sub_item(&self, model: &ClubModel) -> bool {
        let Some(sub_sub_item) = active(&self.sub_sub_item) else {
            return true;
        };
        if self.category() == Some(ClubType::IronSet.as_str()) {
            return true;
        }
        eq_ignore_case(model.specific_type.as_deref(), sub_sub_item)
    }

    fn matches_search(&self, model: &ClubModel) -> bool {
        let Some(query) = active(&self.search) else {
            return true;
        };
        let query = query.to_lowercase();
        [&model.brand, &model.model, &model.club_type]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    fn matches_handedness(&self, model: &ClubModel) -> bool {
        let Some(requested) = active(&self.handedness) else {
            return true;
        };
        let Some(requested) = Handedness::from_label(requested) else {
            return false;
        };
        model.variants.iter().any(|variant| variant.facts.handedness == Some(requested))
    }

    fn matches_price(&self, first: &Variant) -> bool {
        let min = self.price_min.unwrap_or(Decimal::ZERO);
        first.price >= min && self.price_max.map_or(true, |max| first.price <= max)
    }

    fn matches_loft_gap_targets(&self, model: &ClubModel) -> bool {
        match &self.loft_gap_targets {
            Some(targets) if !targets.is_empty() => {
                model.variants.iter().any(|variant| targets.contains(variant.loft_degrees()))
            }
            _ => true,
        }
    }
}

/// Filters `models` by `criteria` and orders the survivors by `sort`.
///
/// Models without variants never match; the sort is stable so ties keep
/// catalog order.
pub fn filter_catalog<'a>(
    models: &'a [ClubModel],
    criteria: &FilterCriteria,
    sort: SortKey,
) -> Vec<&'a ClubModel> {
    let mut matched = models
        .iter()
        .filter(|model| match model.first_variant() {
            Some(first) => criteria.matches(model, first),
            None => {
                warn!(
                    event_name = "catalog.filter.no_variants",
                    brand = %model.brand,
                    model = %model.model,
                    "excluding club model without variants"
                );
                false
            }
        })
        .collect::<Vec<_>>();

    sort_models(&mut matched, sort);
    debug!(
        event_name = "catalog.filter.applied",
        matched = matched.len(),
        total = models.len(),
        sort = sort.as_str(),
        "catalog filter applied"
    );
    matched
}

pub fn sort_models(models: &mut [&ClubModel], sort: SortKey) {
    match sort {
        SortKey::Default => {}
        SortKey::PriceAsc => models.sort_by(|a, b| first_price(a).cmp(&first_price(b))),
        SortKey::PriceDesc => models.sort_by(|a, b| first_price(b).cmp(&first_price(a))),
        SortKey::Brand => models.sort_by(|a, b| compare_brand(&a.brand, &b.brand)),
        SortKey::Loft => models.sort_by(|a, b| first_loft(a).total_cmp(&first_loft(b))),
    }
}

fn first_price(model: &ClubModel) -> Decimal {
    model.first_variant().map_or(Decimal::MAX, |variant| variant.price)
}

fn first_loft(model: &ClubModel) -> f64 {
    model.first_variant().map_or(f64::INFINITY, Variant::loft_degrees)
}

/// Case-insensitive ordering, falling back to code-point order for ties.
fn compare_brand(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
