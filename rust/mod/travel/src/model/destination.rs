use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tripmatch_core::MbtiType;

/// Shown when a destination has no type-specific reason.
pub const GENERIC_REASON: &str = "This destination is a good match for your personality type.";

/// A point of interest within a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    pub description: String,
    pub location: String,
}

/// A catalog entry. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Unique across the catalog.
    pub id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub image_url: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Types this destination is recommended for.
    #[serde(default)]
    pub mbti_types: Vec<MbtiType>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mbti_reasons: BTreeMap<MbtiType, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attractions: Vec<Attraction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time_to_visit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_stay: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_cost: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub travel_tips: Vec<String>,
}

impl Destination {
    pub fn is_for(&self, mbti_type: MbtiType) -> bool {
        self.mbti_types.contains(&mbti_type)
    }

    /// Exact, case-sensitive tag match.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Why this destination suits `mbti_type`, falling back to a generic line.
    pub fn reason_for(&self, mbti_type: MbtiType) -> &str {
        self.mbti_reasons
            .get(&mbti_type)
            .map(String::as_str)
            .unwrap_or(GENERIC_REASON)
    }

    /// `needle` must already be lower-cased. Matches name, description,
    /// location or any tag as a substring.
    pub(crate) fn matches_keyword(&self, needle: &str) -> bool {
        [&self.name, &self.description, &self.location]
            .into_iter()
            .chain(self.tags.iter())
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A destination recommended for one type, with the reason shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MbtiMatch {
    pub destination: Destination,
    pub reason: String,
}
