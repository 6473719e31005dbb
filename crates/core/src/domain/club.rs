use serde::{Deserialize, Serialize};

use crate::domain::variant::Variant;

pub const IMAGE_DIRECTORY: &str = "club_images";
pub const PLACEHOLDER_IMAGE_PATH: &str = "driver_images/placeholder.jpg";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClubModelId(pub i64);

/// The club families a bag is ordered by, in bag order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClubType {
    Driver,
    FairwayWood,
    Hybrid,
    IronSet,
    Wedge,
    Putter,
}

impl ClubType {
    pub const BAG_ORDER: [ClubType; 6] = [
        ClubType::Driver,
        ClubType::FairwayWood,
        ClubType::Hybrid,
        ClubType::IronSet,
        ClubType::Wedge,
        ClubType::Putter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "Driver",
            Self::FairwayWood => "Fairway Wood",
            Self::Hybrid => "Hybrid",
            Self::IronSet => "Iron Set",
            Self::Wedge => "Wedge",
            Self::Putter => "Putter",
        }
    }

    /// Exact match on the catalog's `type` label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::BAG_ORDER.into_iter().find(|club_type| club_type.as_str() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandicapperLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl HandicapperLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Accepts current labels and the legacy "<x> Handicapper" labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" | "high handicapper" => Some(Self::Beginner),
            "intermediate" | "mid handicapper" | "medium handicapper" => Some(Self::Intermediate),
            "advanced" | "low handicapper" => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Maps legacy labels onto the current ones and leaves unknown labels untouched.
    pub fn normalize_label(label: &str) -> String {
        Self::from_label(label)
            .map(|level| level.as_str().to_string())
            .unwrap_or_else(|| label.to_string())
    }
}

/// One marketed product and its purchasable variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ClubModelId>,
    #[serde(rename = "type")]
    pub club_type: String,
    #[serde(default, alias = "subType")]
    pub subtype: Option<String>,
    #[serde(default, rename = "specifictype", alias = "specificType")]
    pub specific_type: Option<String>,
    pub brand: String,
    pub model: String,
    #[serde(default, rename = "handicapperlevel", alias = "handicapperLevel")]
    pub handicapper_level: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl ClubModel {
    pub fn kind(&self) -> Option<ClubType> {
        ClubType::from_label(&self.club_type)
    }

    pub fn first_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }

    pub fn image_path(&self) -> String {
        let image = self.image.trim();
        if image.is_empty() {
            PLACEHOLDER_IMAGE_PATH.to_string()
        } else {
            format!("{IMAGE_DIRECTORY}/{image}.jpg")
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// Wire shape of the catalog read operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub clubs: Vec<ClubModel>,
}
