use serde::{Deserialize, Serialize};

use super::Destination;

/// The two user-scoped bookmark lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Saved,
    Liked,
}

impl RelationKind {
    pub const ALL: [RelationKind; 2] = [RelationKind::Saved, RelationKind::Liked];

    /// Backing table.
    pub fn table(self) -> &'static str {
        match self {
            RelationKind::Saved => "saved_destinations",
            RelationKind::Liked => "liked_destinations",
        }
    }

    /// Past-tense verb for messages and URL segments.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Saved => "saved",
            RelationKind::Liked => "liked",
        }
    }
}

/// One stored (user, destination) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRow {
    pub user_id: String,
    pub destination_id: String,
    /// RFC 3339.
    pub created_at: String,
}

/// A relation row joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedDestination {
    pub destination: Destination,
    /// When the user saved or liked it.
    pub collected_at: String,
}
