//! Seams between the profile session and whatever backs identities and
//! profiles. [`AuthService`] implements both locally.

use tokio::sync::broadcast;

use crate::model::{AuthSession, Identity, ProfileUpdate, SessionEvent, UserProfile};
use crate::service::{AuthError, AuthService};

/// Sign-up, sign-in and session-change notifications.
pub trait IdentityProvider: Send + Sync + 'static {
    fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// `Ok(None)` when the token no longer belongs to a live session.
    fn current(&self, token: &str) -> Result<Option<Identity>, AuthError>;

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

/// Profile rows keyed by identity id.
pub trait ProfileStore: Send + Sync + 'static {
    fn get_profile(&self, id: &str) -> Result<Option<UserProfile>, AuthError>;

    fn create_profile(&self, profile: &UserProfile) -> Result<(), AuthError>;

    fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<UserProfile, AuthError>;
}

impl IdentityProvider for AuthService {
    fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        AuthService::sign_up(self, email, password)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        AuthService::sign_in(self, email, password)
    }

    fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        AuthService::sign_out(self, token)
    }

    fn current(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        AuthService::current(self, token)
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        AuthService::subscribe(self)
    }
}

impl ProfileStore for AuthService {
    fn get_profile(&self, id: &str) -> Result<Option<UserProfile>, AuthError> {
        AuthService::get_profile(self, id)
    }

    fn create_profile(&self, profile: &UserProfile) -> Result<(), AuthError> {
        AuthService::create_profile(self, profile)
    }

    fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<UserProfile, AuthError> {
        AuthService::update_profile(self, id, update)
    }
}
