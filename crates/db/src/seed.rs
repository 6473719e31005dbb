//! Loads the JSON club catalog into the store.
//!
//! The loader is lenient about field spelling (lower-case and camelCase), legacy
//! handicapper labels and the retailer `prices` array shape, and strict about
//! prices: a variant without a usable non-negative price is skipped and reported
//! rather than stored.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use caddie_core::domain::club::{ClubModel, ClubModelId, HandicapperLevel};
use caddie_core::domain::description::DescriptionFacts;
use caddie_core::domain::variant::{RetailerPrice, Variant, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::repositories::{ClubRepository, RepositoryError};

/// Demo catalog shipped with the workspace.
pub const BUNDLED_CATALOG: &str = include_str!("../../../config/fixtures/clubs.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse seed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to store seed catalog: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingPrice,
    InvalidPrice { raw: String },
    NegativePrice,
    DuplicateVariantId,
    DuplicateClubId,
    NoVariants,
}

/// One catalog entry left out of the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSkip {
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<i64>,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub clubs_loaded: usize,
    pub variants_loaded: usize,
    pub offers_loaded: usize,
    pub skipped: Vec<SeedSkip>,
}

#[derive(Debug, Deserialize)]
struct SeedDocument {
    #[serde(default)]
    clubs: Vec<SeedClub>,
}

#[derive(Debug, Deserialize)]
struct SeedClub {
    #[serde(default)]
    id: Option<i64>,
    #[serde(rename = "type")]
    club_type: String,
    #[serde(default, alias = "subType")]
    subtype: Option<String>,
    #[serde(default, alias = "specificType", alias = "specific_type")]
    specifictype: Option<String>,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    model: String,
    #[serde(default, alias = "handicapperLevel", alias = "handicapper_level")]
    handicapperlevel: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    variants: Vec<SeedVariant>,
}

#[derive(Debug, Deserialize)]
struct SeedVariant {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    loft: Option<Value>,
    #[serde(default, alias = "shaftMaterial", alias = "shaft_material")]
    shaftmaterial: Option<String>,
    #[serde(default, alias = "setMakeup", alias = "set_makeup")]
    setmakeup: Option<String>,
    #[serde(default)]
    length: Option<String>,
    #[serde(default)]
    bounce: Option<Value>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    prices: Vec<SeedOffer>,
}

#[derive(Debug, Deserialize)]
struct SeedOffer {
    #[serde(default)]
    retailer: String,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    url: Option<String>,
}

enum PriceError {
    Missing,
    Invalid(String),
    Negative,
}

impl From<PriceError> for SkipReason {
    fn from(value: PriceError) -> Self {
        match value {
            PriceError::Missing => Self::MissingPrice,
            PriceError::Invalid(raw) => Self::InvalidPrice { raw },
            PriceError::Negative => Self::NegativePrice,
        }
    }
}

fn parse_price(value: Option<&Value>) -> Result<Decimal, PriceError> {
    let raw = match value {
        None | Some(Value::Null) => return Err(PriceError::Missing),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => text.trim().trim_start_matches('$').replace(',', ""),
        Some(other) => return Err(PriceError::Invalid(other.to_string())),
    };
    if raw.is_empty() {
        return Err(PriceError::Missing);
    }

    let price = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| PriceError::Invalid(raw.clone()))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PriceError::Negative);
    }
    Ok(price.normalize())
}

/// Loft and bounce arrive as strings or bare numbers.
fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Hands out ids in file order, starting above the largest explicit id so the
/// same file always yields the same ids.
struct IdAllocator {
    next: i64,
    used: BTreeSet<i64>,
}

impl IdAllocator {
    fn new(explicit: impl Iterator<Item = i64>) -> Self {
        let used = BTreeSet::new();
        let next = explicit.max().unwrap_or(0).max(0) + 1;
        Self { next, used }
    }

    /// `None` when an explicit id was already taken.
    fn claim(&mut self, explicit: Option<i64>) -> Option<i64> {
        let id = match explicit {
            Some(id) => id,
            None => {
                let id = self.next;
                self.next += 1;
                id
            }
        };
        self.used.insert(id).then_some(id)
    }
}

/// A parsed seed catalog ready to be written to a repository.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogSeed {
    models: Vec<ClubModel>,
    skipped: Vec<SeedSkip>,
}

impl CatalogSeed {
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| SeedError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        let document: SeedDocument = serde_json::from_str(raw)?;
        Ok(Self::from_document(document))
    }

    fn from_document(document: SeedDocument) -> Self {
        let mut club_ids = IdAllocator::new(document.clubs.iter().filter_map(|club| club.id));
        let mut variant_ids = IdAllocator::new(
            document.clubs.iter().flat_map(|club| club.variants.iter().filter_map(|v| v.id)),
        );
        let mut models = Vec::with_capacity(document.clubs.len());
        let mut skipped = Vec::new();

        for club in document.clubs {
            let mut skip = |variant_id: Option<i64>, reason: SkipReason| {
                warn!(
                    event_name = "catalog.seed.entry_skipped",
                    brand = %club.brand,
                    model = %club.model,
                    variant_id = ?variant_id,
                    reason = ?reason,
                    "skipping malformed catalog entry"
                );
                skipped.push(SeedSkip {
                    brand: club.brand.clone(),
                    model: club.model.clone(),
                    variant_id,
                    reason,
                });
            };

            let Some(club_id) = club_ids.claim(club.id) else {
                skip(None, SkipReason::DuplicateClubId);
                continue;
            };

            let mut variants = Vec::with_capacity(club.variants.len());
            for raw in club.variants {
                let explicit_id = raw.id;
                match seed_variant(raw) {
                    Ok(mut variant) => {
                        let Some(id) = variant_ids.claim(explicit_id) else {
                            skip(explicit_id, SkipReason::DuplicateVariantId);
                            continue;
                        };
                        variant.id = VariantId(id);
                        variants.push(variant);
                    }
                    Err(reason) => skip(explicit_id, reason.into()),
                }
            }

            if variants.is_empty() {
                skip(None, SkipReason::NoVariants);
                continue;
            }

            models.push(ClubModel {
                id: Some(ClubModelId(club_id)),
                club_type: club.club_type,
                subtype: club.subtype,
                specific_type: club.specifictype,
                handicapper_level: club
                    .handicapperlevel
                    .as_deref()
                    .map(HandicapperLevel::normalize_label)
                    .unwrap_or_default(),
                brand: club.brand,
                model: club.model,
                category: club.category.unwrap_or_default(),
                image: club.image.unwrap_or_default(),
                variants,
            });
        }

        Self { models, skipped }
    }

    pub fn models(&self) -> &[ClubModel] {
        &self.models
    }

    pub fn skipped(&self) -> &[SeedSkip] {
        &self.skipped
    }

    /// Replaces the repository's catalog with this seed.
    pub async fn load(self, repository: &dyn ClubRepository) -> Result<SeedSummary, SeedError> {
        repository.replace_catalog(&self.models).await?;

        let variants = self.models.iter().flat_map(|model| model.variants.iter());
        let summary = SeedSummary {
            clubs_loaded: self.models.len(),
            variants_loaded: variants.clone().count(),
            offers_loaded: variants.map(|variant| variant.prices.len()).sum(),
            skipped: self.skipped,
        };

        info!(
            event_name = "catalog.seed.loaded",
            clubs = summary.clubs_loaded,
            variants = summary.variants_loaded,
            offers = summary.offers_loaded,
            skipped = summary.skipped.len(),
            "seed catalog loaded"
        );
        Ok(summary)
    }
}

/// Builds a variant with a placeholder id; the caller assigns the real one.
fn seed_variant(raw: SeedVariant) -> Result<Variant, PriceError> {
    let mut offers = Vec::with_capacity(raw.prices.len());
    for offer in raw.prices {
        match parse_price(offer.price.as_ref()) {
            Ok(price) => {
                offers.push(RetailerPrice { retailer: offer.retailer, price, url: offer.url })
            }
            Err(_) => warn!(
                event_name = "catalog.seed.offer_skipped",
                retailer = %offer.retailer,
                "skipping retailer offer without a usable price"
            ),
        }
    }

    let (price, source, url) = match raw.price {
        Some(ref value) if !value.is_null() => (parse_price(Some(value))?, raw.source, raw.url),
        _ => {
            let first = offers.first().ok_or(PriceError::Missing)?;
            (
                first.price,
                raw.source.or_else(|| Some(first.retailer.clone())),
                raw.url.or_else(|| first.url.clone()),
            )
        }
    };

    let description = raw.description.unwrap_or_default();
    Ok(Variant {
        id: VariantId(0),
        loft: text_field(raw.loft),
        shaft_material: raw.shaftmaterial,
        set_makeup: raw.setmakeup,
        length: raw.length,
        bounce: text_field(raw.bounce),
        price,
        facts: DescriptionFacts::parse(&description),
        description,
        source,
        url,
        prices: offers,
    })
}
