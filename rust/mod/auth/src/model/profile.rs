use serde::{Deserialize, Serialize};

use tripmatch_core::MbtiType;

/// A user's editable profile. Row in the `profiles` table, keyed by the
/// identity id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbti_type: Option<MbtiType>,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial profile update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub mbti_type: Option<MbtiType>,
}

impl ProfileUpdate {
    pub fn mbti_type(mbti_type: MbtiType) -> Self {
        Self {
            nickname: None,
            mbti_type: Some(mbti_type),
        }
    }
}

/// Request body for `PUT /auth/profile/mbti`.
#[derive(Debug, Clone, Deserialize)]
pub struct MbtiRequest {
    pub mbti_type: MbtiType,
}

impl UserProfile {
    /// Fresh profile for a just-created identity, with no MBTI type yet.
    pub fn new(id: &str, email: &str, nickname: &str) -> Self {
        let now = tripmatch_core::now_rfc3339();
        Self {
            id: id.to_string(),
            email: email.to_string(),
            nickname: nickname.trim().to_string(),
            mbti_type: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
