use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::description::DescriptionFacts;
use crate::loft::parse_loft;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(pub i64);

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One retailer's offer for a variant (price-comparison shape).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerPrice {
    pub retailer: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub url: Option<String>,
}

/// One purchasable SKU of a club model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    #[serde(default)]
    pub loft: Option<String>,
    #[serde(default, rename = "shaftmaterial", alias = "shaftMaterial")]
    pub shaft_material: Option<String>,
    #[serde(default, rename = "setmakeup", alias = "setMakeup")]
    pub set_makeup: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub bounce: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prices: Vec<RetailerPrice>,
    #[serde(default)]
    pub facts: DescriptionFacts,
}

impl Variant {
    /// Parsed loft in degrees, `f64::INFINITY` when absent or unparseable.
    pub fn loft_degrees(&self) -> f64 {
        parse_loft(self.loft.as_deref())
    }

    /// Re-derives the description facts from the raw description text.
    pub fn refresh_facts(&mut self) {
        self.facts = DescriptionFacts::parse(&self.description);
    }

    /// The lowest-priced retailer offer; ties keep the first listed retailer.
    pub fn cheapest_offer(&self) -> Option<&RetailerPrice> {
        self.prices.iter().reduce(|best, offer| if offer.price < best.price { offer } else { best })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{RetailerPrice, Variant, VariantId};
    use crate::domain::description::{DescriptionFacts, Handedness};

    fn variant() -> Variant {
        Variant {
            id: VariantId(7),
            loft: Some("10.5°".to_string()),
            shaft_material: Some("Graphite".to_string()),
            set_makeup: None,
            length: None,
            bounce: None,
            price: Decimal::new(29_900, 2),
            description: "Handedness: Left-Handed, Flex: Regular".to_string(),
            source: None,
            url: None,
            prices: vec![
                RetailerPrice {
                    retailer: "Fairway Outlet".to_string(),
                    price: Decimal::new(31_000, 2),
                    url: None,
                },
                RetailerPrice {
                    retailer: "Pro Shop".to_string(),
                    price: Decimal::new(29_900, 2),
                    url: Some("https://shop.example/driver".to_string()),
                },
                RetailerPrice {
                    retailer: "Second Swing".to_string(),
                    price: Decimal::new(29_900, 2),
                    url: None,
                },
            ],
            facts: DescriptionFacts::default(),
        }
    }

    #[test]
    fn cheapest_offer_prefers_first_of_equal_prices() {
        let variant = variant();
        let offer = variant.cheapest_offer().expect("offer");
        assert_eq!(offer.retailer, "Pro Shop");
    }

    #[test]
    fn refresh_facts_parses_description() {
        let mut variant = variant();
        variant.refresh_facts();
        assert_eq!(variant.facts.handedness, Some(Handedness::LeftHanded));
        assert_eq!(variant.facts.flex.as_deref(), Some("Regular"));
        assert_eq!(variant.loft_degrees(), 10.5);
    }

    #[test]
    fn deserializes_camel_case_aliases_and_numeric_price() {
        let variant: Variant = serde_json::from_value(serde_json::json!({
            "id": 3,
            "loft": "19 degrees",
            "shaftMaterial": "Steel",
            "setMakeup": "4-PW",
            "price": 149.99,
            "description": ""
        }))
        .expect("variant json");

        assert_eq!(variant.shaft_material.as_deref(), Some("Steel"));
        assert_eq!(variant.set_makeup.as_deref(), Some("4-PW"));
        assert_eq!(variant.price, Decimal::new(14_999, 2));
        assert!(variant.prices.is_empty());
    }
}
