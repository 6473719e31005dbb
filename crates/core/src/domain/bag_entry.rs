use serde::{Deserialize, Serialize};

use crate::domain::club::{ClubModel, ClubType};
use crate::domain::variant::{Variant, VariantId};

/// A variant joined with the model fields the bag needs for rendering and gap
/// analysis, so the bag never has to look back into the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagEntry {
    #[serde(flatten)]
    pub variant: Variant,
    #[serde(rename = "type")]
    pub club_type: String,
    pub subtype: Option<String>,
    #[serde(rename = "specifictype")]
    pub specific_type: Option<String>,
    pub brand: String,
    pub model: String,
    #[serde(rename = "handicapperlevel")]
    pub handicapper_level: String,
    pub image_path: String,
}

impl BagEntry {
    pub fn join(model: &ClubModel, variant: &Variant) -> Self {
        Self {
            variant: variant.clone(),
            club_type: model.club_type.clone(),
            subtype: model.subtype.clone(),
            specific_type: model.specific_type.clone(),
            brand: model.brand.clone(),
            model: model.model.clone(),
            handicapper_level: model.handicapper_level.clone(),
            image_path: model.image_path(),
        }
    }

    pub fn id(&self) -> VariantId {
        self.variant.id
    }

    pub fn kind(&self) -> Option<ClubType> {
        ClubType::from_label(&self.club_type)
    }

    pub fn loft_degrees(&self) -> f64 {
        self.variant.loft_degrees()
    }

    pub fn is_full_set(&self) -> bool {
        self.subtype.as_deref() == Some("Set")
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}
