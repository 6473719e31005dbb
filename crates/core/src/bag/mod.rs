//! The shopper's selected variants, capped at fourteen clubs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::snapshot::CatalogSnapshot;
use crate::domain::bag_entry::BagEntry;
use crate::domain::variant::VariantId;
use crate::gaps::{analyze_bag, GapReport};

pub const MAX_BAG_SIZE: usize = 14;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagRejection {
    #[error("bag already holds the maximum of 14 clubs")]
    BagFull,
    #[error("variant is already in the bag")]
    AlreadyPresent,
    #[error("variant is not in the bag")]
    NotPresent,
    #[error("variant to replace is not in the bag")]
    OldNotPresent,
}

impl BagRejection {
    /// Duplicate adds are idempotent and should not be reported to the user.
    pub fn is_silent(self) -> bool {
        matches!(self, Self::AlreadyPresent)
    }
}

/// Failure to add a variant looked up by id.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BagAddError {
    #[error("variant {0} is not in the catalog")]
    UnknownVariant(VariantId),
    #[error(transparent)]
    Rejected(#[from] BagRejection),
}

impl BagAddError {
    pub fn is_silent(self) -> bool {
        matches!(self, Self::Rejected(rejection) if rejection.is_silent())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    entries: Vec<BagEntry>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BagEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_BAG_SIZE
    }

    pub fn contains(&self, id: VariantId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    pub fn add(&mut self, entry: BagEntry) -> Result<(), BagRejection> {
        if self.is_full() {
            return Err(self.rejected(entry.id(), BagRejection::BagFull));
        }
        if self.contains(entry.id()) {
            return Err(self.rejected(entry.id(), BagRejection::AlreadyPresent));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Joins `id` against the catalog and adds the resulting entry.
    pub fn add_from_catalog(
        &mut self,
        snapshot: &CatalogSnapshot,
        id: VariantId,
    ) -> Result<(), BagAddError> {
        let entry = snapshot.bag_entry(id).ok_or(BagAddError::UnknownVariant(id))?;
        Ok(self.add(entry)?)
    }

    pub fn remove(&mut self, id: VariantId) -> Result<BagEntry, BagRejection> {
        match self.entries.iter().position(|entry| entry.id() == id) {
            Some(position) => Ok(self.entries.remove(position)),
            None => Err(self.rejected(id, BagRejection::NotPresent)),
        }
    }

    /// Swaps `old` for `new`. Replacing an entry with itself refreshes it in
    /// place; when `new` is already elsewhere in the bag, `old` is just
    /// removed.
    pub fn replace(&mut self, old: VariantId, new: BagEntry) -> Result<(), BagRejection> {
        let Some(position) = self.entries.iter().position(|entry| entry.id() == old) else {
            return Err(self.rejected(old, BagRejection::OldNotPresent));
        };

        if new.id() == old {
            self.entries[position] = new;
        } else if self.contains(new.id()) {
            self.entries.remove(position);
        } else {
            self.entries.remove(position);
            self.entries.push(new);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn total_price(&self) -> Decimal {
        self.entries.iter().map(|entry| entry.variant.price).sum()
    }

    pub fn gap_report(&self, snapshot: &CatalogSnapshot) -> GapReport {
        analyze_bag(&self.entries, snapshot)
    }

    pub fn checkout_summary(&self) -> CheckoutSummary {
        CheckoutSummary::for_bag(self)
    }

    fn rejected(&self, id: VariantId, rejection: BagRejection) -> BagRejection {
        debug!(
            event_name = "bag.mutation.rejected",
            variant_id = id.0,
            bag_size = self.entries.len(),
            reason = %rejection,
            "bag mutation rejected"
        );
        rejection
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub variant_id: VariantId,
    pub label: String,
    pub price: Decimal,
    pub retailer: Option<String>,
    pub url: Option<String>,
}

/// Per-club prices with the retailer link to buy each one. No payment is
/// taken here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub lines: Vec<CheckoutLine>,
    pub total: Decimal,
}

impl CheckoutSummary {
    pub fn for_bag(bag: &Bag) -> Self {
        let lines = bag
            .entries()
            .iter()
            .map(|entry| {
                let variant = &entry.variant;
                let (price, retailer, url) = match variant.cheapest_offer() {
                    Some(offer) => (offer.price, Some(offer.retailer.clone()), offer.url.clone()),
                    None => (variant.price, variant.source.clone(), variant.url.clone()),
                };
                let label = match entry.specific_type.as_deref() {
                    Some(specific) => format!("{} ({specific})", entry.display_name()),
                    None => entry.display_name(),
                };
                CheckoutLine { variant_id: entry.id(), label, price, retailer, url }
            })
            .collect::<Vec<_>>();
        let total = lines.iter().map(|line| line.price).sum();
        Self { lines, total }
    }
}
