use serde::{Deserialize, Serialize};

/// A signed-up account, as exposed to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// UUIDv4, no dashes. Profiles share this id.
    pub id: String,

    /// Lower-cased, trimmed. Unique across identities.
    pub email: String,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Row stored in the `identities` table `data` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IdentityRecord {
    pub id: String,
    pub email: String,
    /// argon2id PHC string.
    pub password_hash: String,
    pub created_at: String,
}

impl From<IdentityRecord> for Identity {
    fn from(r: IdentityRecord) -> Self {
        Self {
            id: r.id,
            email: r.email,
            created_at: r.created_at,
        }
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}
