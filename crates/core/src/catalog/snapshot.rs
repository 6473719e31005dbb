use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::bag_entry::BagEntry;
use crate::domain::club::{CatalogDocument, ClubModel};
use crate::domain::variant::{Variant, VariantId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogIssueKind {
    NoVariants,
    DuplicateVariantId { variant_id: VariantId },
}

/// A catalog entry that was skipped during ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIssue {
    pub brand: String,
    pub model: String,
    pub kind: CatalogIssueKind,
}

/// Immutable in-memory catalog, produced once per load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    models: Vec<ClubModel>,
    issues: Vec<CatalogIssue>,
}

impl CatalogSnapshot {
    /// Builds a snapshot, skipping models without variants and variants whose id
    /// was already seen earlier in the catalog.
    pub fn ingest(models: Vec<ClubModel>) -> Self {
        let mut seen = BTreeSet::new();
        let mut issues = Vec::new();
        let mut kept = Vec::with_capacity(models.len());

        for mut model in models {
            let mut variants = Vec::with_capacity(model.variants.len());
            for mut variant in std::mem::take(&mut model.variants) {
                if !seen.insert(variant.id) {
                    warn!(
                        event_name = "catalog.ingest.duplicate_variant",
                        brand = %model.brand,
                        model = %model.model,
                        variant_id = variant.id.0,
                        "skipping variant with duplicate id"
                    );
                    issues.push(CatalogIssue {
                        brand: model.brand.clone(),
                        model: model.model.clone(),
                        kind: CatalogIssueKind::DuplicateVariantId { variant_id: variant.id },
                    });
                    continue;
                }
                if variant.facts.is_empty() {
                    variant.refresh_facts();
                }
                variants.push(variant);
            }

            if variants.is_empty() {
                warn!(
                    event_name = "catalog.ingest.no_variants",
                    brand = %model.brand,
                    model = %model.model,
                    "skipping club model without variants"
                );
                issues.push(CatalogIssue {
                    brand: model.brand.clone(),
                    model: model.model.clone(),
                    kind: CatalogIssueKind::NoVariants,
                });
                continue;
            }

            model.variants = variants;
            kept.push(model);
        }

        Self { models: kept, issues }
    }

    pub fn from_document(document: CatalogDocument) -> Self {
        Self::ingest(document.clubs)
    }

    pub fn models(&self) -> &[ClubModel] {
        &self.models
    }

    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Every variant paired with its model, in catalog order.
    pub fn variants(&self) -> impl Iterator<Item = (&ClubModel, &Variant)> + '_ {
        self.models.iter().flat_map(|model| model.variants.iter().map(move |v| (model, v)))
    }

    pub fn find_variant(&self, id: VariantId) -> Option<(&ClubModel, &Variant)> {
        self.variants().find(|(_, variant)| variant.id == id)
    }

    pub fn bag_entry(&self, id: VariantId) -> Option<BagEntry> {
        self.find_variant(id).map(|(model, variant)| BagEntry::join(model, variant))
    }

    /// Distinct brands, sorted.
    pub fn brand_options(&self) -> Vec<String> {
        distinct_sorted(self.models.iter().map(|model| model.brand.as_str()))
    }

    /// Distinct handicapper levels, sorted.
    pub fn handicapper_level_options(&self) -> Vec<String> {
        distinct_sorted(self.models.iter().map(|model| model.handicapper_level.as_str()))
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
