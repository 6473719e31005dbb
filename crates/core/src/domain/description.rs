//! Structured facts embedded in variant descriptions.
//!
//! Retailer descriptions carry loosely formatted fragments such as
//! `"Handedness: Right-Handed, Flex: Stiff, Condition: Good"`. They are parsed
//! once when a variant is ingested so filters never re-scan the text.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    #[serde(rename = "Right-Handed")]
    RightHanded,
    #[serde(rename = "Left-Handed")]
    LeftHanded,
}

impl Handedness {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RightHanded => "Right-Handed",
            Self::LeftHanded => "Left-Handed",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "right-handed" => Some(Self::RightHanded),
            "left-handed" => Some(Self::LeftHanded),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

struct FactPatterns {
    handedness: Regex,
    flex: Regex,
    condition: Regex,
}

fn patterns() -> &'static FactPatterns {
    static PATTERNS: OnceLock<FactPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FactPatterns {
        handedness: Regex::new(r"(?i)Handedness:\s*(Right-Handed|Left-Handed)")
            .expect("handedness pattern is valid"),
        flex: Regex::new(r"Flex:\s*([^\s,]+)").expect("flex pattern is valid"),
        condition: Regex::new(r"Condition:\s*([^\s,]+)").expect("condition pattern is valid"),
    })
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern.captures(text).and_then(|captures| captures.get(1)).map(|m| m.as_str().to_string())
}

impl DescriptionFacts {
    pub fn parse(description: &str) -> Self {
        let patterns = patterns();
        Self {
            handedness: capture(&patterns.handedness, description)
                .and_then(|label| Handedness::from_label(&label)),
            flex: capture(&patterns.flex, description),
            condition: capture(&patterns.condition, description),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handedness.is_none() && self.flex.is_none() && self.condition.is_none()
    }
}
