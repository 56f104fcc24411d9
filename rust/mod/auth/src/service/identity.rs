use tokio::sync::broadcast;
use tracing::{info, warn};

use tripmatch_core::{new_id, now_rfc3339};
use tripmatch_sql::Value;

use crate::model::{AuthSession, Identity, IdentityRecord, SessionEvent};
use crate::service::session::session_key;
use crate::service::{AuthError, AuthService};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a plain password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against an argon2id hash. A malformed hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::Validation(format!("invalid email address: {email:?}")));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl AuthService {
    /// Create an identity. Does not sign in.
    pub fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = normalize_email(email);
        validate_credentials(&email, password)?;

        let record = IdentityRecord {
            id: new_id(),
            email,
            password_hash: hash_password(password)?,
            created_at: now_rfc3339(),
        };
        self.insert_record(
            "identities",
            &record.id,
            &record,
            &[
                ("email", Value::from(record.email.as_str())),
                ("created_at", Value::from(record.created_at.as_str())),
            ],
        )
        .map_err(|e| match e {
            AuthError::Conflict(_) => {
                AuthError::Conflict(format!("email {} is already registered", record.email))
            }
            other => other,
        })?;

        info!(user_id = %record.id, "identity created");
        Ok(record.into())
    }

    /// Check credentials and open a new session.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);
        let record: Option<IdentityRecord> = self.find_record("identities", "email", &email)?;

        // Same error for unknown email and wrong password.
        let record = match record {
            Some(r) if verify_password(password, &r.password_hash) => r,
            _ => return Err(AuthError::Unauthorized("invalid email or password".into())),
        };

        let identity = Identity::from(record);
        if let Err(e) = self.purge_expired_sessions() {
            warn!("expired session purge failed: {e}");
        }
        let (session, record) = self.issue_session(&identity)?;
        info!(user_id = %identity.id, session_id = %record.id, "signed in");

        self.publish(SessionEvent::SignedIn {
            user: identity,
            session_id: record.id,
        });
        Ok(session)
    }

    /// End the session behind `token`. The token stops verifying immediately.
    pub fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.verify_token(token)?;
        self.kv.delete(&session_key(&claims.sid))?;
        info!(user_id = %claims.sub, session_id = %claims.sid, "signed out");

        self.publish(SessionEvent::SignedOut {
            user_id: claims.sub,
            session_id: claims.sid,
        });
        Ok(())
    }

    /// Identity behind a live token. Invalid, expired and signed-out tokens
    /// all yield `None`.
    pub fn current(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let claims = match self.verify_token(token) {
            Ok(c) => c,
            Err(AuthError::Unauthorized(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        self.get_identity(&claims.sub)
    }

    pub fn get_identity(&self, id: &str) -> Result<Option<Identity>, AuthError> {
        let record: Option<IdentityRecord> = self.find_record("identities", "id", id)?;
        Ok(record.map(Identity::from))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }

    #[test]
    fn sign_up_validates_and_normalizes() {
        let (svc, _dir) = testing::service();

        assert!(matches!(
            svc.sign_up("no-at-sign", "secret1"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            svc.sign_up("a@b.c", "12345"),
            Err(AuthError::Validation(_))
        ));

        let identity = svc.sign_up("  Ada@Example.com ", "secret1").unwrap();
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.id.len(), 32);
        assert_eq!(svc.get_identity(&identity.id).unwrap(), Some(identity));
    }

    #[test]
    fn duplicate_email_conflicts() {
        let (svc, _dir) = testing::service();
        svc.sign_up("ada@example.com", "secret1").unwrap();
        let err = svc.sign_up("ADA@example.com", "secret2").unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)), "{err}");
    }

    #[test]
    fn sign_in_checks_password() {
        let (svc, _dir) = testing::service();
        let identity = svc.sign_up("ada@example.com", "secret1").unwrap();

        assert!(matches!(
            svc.sign_in("ada@example.com", "wrong-pw"),
            Err(AuthError::Unauthorized(_))
        ));
        assert!(matches!(
            svc.sign_in("nobody@example.com", "secret1"),
            Err(AuthError::Unauthorized(_))
        ));

        let session = svc.sign_in("Ada@Example.com", "secret1").unwrap();
        assert_eq!(session.user, identity);
        assert_eq!(svc.current(&session.access_token).unwrap(), Some(identity));
    }

    #[test]
    fn sign_out_invalidates_token_and_notifies() {
        let (svc, _dir) = testing::service();
        let mut events = svc.subscribe();
        let identity = svc.sign_up("ada@example.com", "secret1").unwrap();
        let session = svc.sign_in("ada@example.com", "secret1").unwrap();

        let signed_in = events.try_recv().unwrap();
        assert!(matches!(&signed_in, SessionEvent::SignedIn { user, .. } if *user == identity));

        svc.sign_out(&session.access_token).unwrap();
        assert_eq!(svc.current(&session.access_token).unwrap(), None);

        let signed_out = events.try_recv().unwrap();
        assert_eq!(signed_out.user_id(), identity.id);
        assert!(matches!(signed_out, SessionEvent::SignedOut { .. }));

        // Second sign-out with the dead token is rejected.
        assert!(matches!(
            svc.sign_out(&session.access_token),
            Err(AuthError::Unauthorized(_))
        ));
    }

    #[test]
    fn current_of_garbage_is_none() {
        let (svc, _dir) = testing::service();
        assert_eq!(svc.current("garbage").unwrap(), None);
    }
}
