use serde::{Deserialize, Serialize};

use super::Identity;

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: identity id.
    pub sub: String,
    pub email: String,
    /// Session id. The token only verifies while `auth:session:{sid}` exists.
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
}

/// Session record kept in the writable KV layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    pub issued_at: String,
    pub expires_at: String,
}

/// Returned by a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub user: Identity,
}

/// Session-change notification published by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user: Identity, session_id: String },
    SignedOut { user_id: String, session_id: String },
}

impl SessionEvent {
    pub fn user_id(&self) -> &str {
        match self {
            SessionEvent::SignedIn { user, .. } => &user.id,
            SessionEvent::SignedOut { user_id, .. } => user_id,
        }
    }
}
