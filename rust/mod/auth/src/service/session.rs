use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use axum::http::HeaderMap;
use tracing::{debug, warn};
use tripmatch_core::{bearer_token, new_id, Authenticator, CurrentUser, ServiceError};

use crate::model::{AuthSession, Claims, Identity, SessionRecord};
use crate::service::{AuthError, AuthService};

/// KV prefix of session records.
pub const SESSION_PREFIX: &str = "auth:session:";

pub(crate) fn session_key(session_id: &str) -> String {
    format!("{SESSION_PREFIX}{session_id}")
}

impl AuthService {
    /// Sign an access token for `identity` and record its session.
    pub(crate) fn issue_session(
        &self,
        identity: &Identity,
    ) -> Result<(AuthSession, SessionRecord), AuthError> {
        let session_id = new_id();
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.access_token_ttl);

        let claims = Claims {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            sid: session_id.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))?;

        let record = SessionRecord {
            id: session_id,
            user_id: identity.id.clone(),
            issued_at: now.to_rfc3339(),
            expires_at: exp.to_rfc3339(),
        };
        let bytes = serde_json::to_vec(&record).map_err(|e| AuthError::Internal(e.to_string()))?;
        self.kv.set(&session_key(&record.id), &bytes)?;

        let session = AuthSession {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
            user: identity.clone(),
        };
        Ok((session, record))
    }

    /// Verify and decode an access token. Fails once the session has been
    /// signed out, even if the token has not expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::Unauthorized(format!("invalid token: {}", e)))?
        .claims;

        if self.kv.get(&session_key(&claims.sid))?.is_none() {
            return Err(AuthError::Unauthorized("session has been signed out".into()));
        }
        Ok(claims)
    }

    /// Session record by id, if it is still live.
    pub fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>, AuthError> {
        let Some(bytes) = self.kv.get(&session_key(session_id))? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Delete session records whose `expires_at` has passed. Records that
    /// do not parse are left alone. Returns the number removed.
    pub fn purge_expired_sessions(&self) -> Result<usize, AuthError> {
        let now = chrono::Utc::now();
        let mut removed = 0;
        for (key, bytes) in self.kv.scan(SESSION_PREFIX)? {
            let record: SessionRecord = match serde_json::from_slice(&bytes) {
                Ok(r) => r,
                Err(e) => {
                    warn!(%key, "unreadable session record: {e}");
                    continue;
                }
            };
            let expired = chrono::DateTime::parse_from_rfc3339(&record.expires_at)
                .map(|exp| exp <= now)
                .unwrap_or(false);
            if expired {
                self.kv.delete(&key)?;
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("purged {removed} expired sessions");
        }
        Ok(removed)
    }
}

impl Authenticator for AuthService {
    fn authenticate(&self, headers: &HeaderMap) -> Result<CurrentUser, ServiceError> {
        let token = bearer_token(headers)
            .ok_or_else(|| ServiceError::Unauthorized("missing bearer token".into()))?;
        let claims = self.verify_token(token)?;
        Ok(CurrentUser {
            id: claims.sub,
            email: claims.email,
            session_id: claims.sid,
        })
    }
}
