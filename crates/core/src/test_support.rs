//! Fixture builders shared by the unit tests in this crate.

use rust_decimal::Decimal;

use crate::domain::bag_entry::BagEntry;
use crate::domain::club::ClubModel;
use crate::domain::description::DescriptionFacts;
use crate::domain::variant::{Variant, VariantId};

pub fn variant(id: i64, loft: Option<&str>, price: i64) -> Variant {
    Variant {
        id: VariantId(id),
        loft: loft.map(str::to_string),
        shaft_material: None,
        set_makeup: None,
        length: None,
        bounce: None,
        price: Decimal::from(price),
        description: String::new(),
        source: None,
        url: None,
        prices: Vec::new(),
        facts: DescriptionFacts::default(),
    }
}

pub fn club(
    club_type: &str,
    subtype: Option<&str>,
    specific_type: Option<&str>,
    brand: &str,
    model: &str,
    variants: Vec<Variant>,
) -> ClubModel {
    ClubModel {
        id: None,
        club_type: club_type.to_string(),
        subtype: subtype.map(str::to_string),
        specific_type: specific_type.map(str::to_string),
        brand: brand.to_string(),
        model: model.to_string(),
        handicapper_level: "Intermediate".to_string(),
        category: club_type.to_string(),
        image: format!("{}_{}", brand.to_lowercase(), model.to_lowercase().replace(' ', "_")),
        variants,
    }
}

/// A bag entry for a single-variant model.
pub fn entry(
    id: i64,
    club_type: &str,
    subtype: Option<&str>,
    specific_type: Option<&str>,
    loft: Option<&str>,
) -> BagEntry {
    let variant = variant(id, loft, 100);
    let model = club(club_type, subtype, specific_type, "Brand", &format!("Model {id}"), vec![]);
    BagEntry::join(&model, &variant)
}
