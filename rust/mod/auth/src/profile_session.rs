//! Application-lifetime view of "who is signed in".
//!
//! A [`ProfileSession`] owns the current token, identity and profile, publishes
//! them through a `watch` channel, and keeps them in sync with the identity
//! provider's session events until it is shut down.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tripmatch_core::MbtiType;

use crate::model::{Identity, ProfileUpdate, SessionEvent, UserProfile};
use crate::provider::{IdentityProvider, ProfileStore};
use crate::service::profile::validate_nickname;
use crate::service::AuthError;

/// Snapshot published to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<Identity>,
    pub profile: Option<UserProfile>,
    pub token: Option<String>,
    /// True until the first hydration finishes, and while a profile is
    /// being fetched.
    pub is_loading: bool,
}

struct Shared {
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    state: watch::Sender<SessionState>,
}

impl Shared {
    /// Profile for `user_id`, or `None` with a warning if it cannot be read.
    fn fetch_profile(&self, user_id: &str) -> Option<UserProfile> {
        match self.profiles.get_profile(user_id) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(%user_id, "profile fetch failed: {e}");
                None
            }
        }
    }

    fn signed_in(&self, user: Identity, token: String) {
        self.state.send_replace(SessionState {
            user: Some(user.clone()),
            profile: None,
            token: Some(token.clone()),
            is_loading: true,
        });
        let profile = self.fetch_profile(&user.id);
        self.state.send_replace(SessionState {
            user: Some(user),
            profile,
            token: Some(token),
            is_loading: false,
        });
    }

    fn signed_out(&self) {
        self.state.send_replace(SessionState::default());
    }

    /// Re-check the held token against the provider.
    fn hydrate(&self, token: Option<String>) {
        let Some(token) = token else {
            self.signed_out();
            return;
        };
        match self.provider.current(&token) {
            Ok(Some(user)) => self.signed_in(user, token),
            Ok(None) => {
                debug!("held token no longer valid");
                self.signed_out();
            }
            Err(e) => {
                warn!("session hydration failed: {e}");
                self.signed_out();
            }
        }
    }

    fn on_event(&self, event: SessionEvent) {
        let current = self.state.borrow().clone();
        let Some(user) = current.user else {
            return;
        };
        if event.user_id() != user.id {
            return;
        }
        match event {
            SessionEvent::SignedOut { .. } => {
                // Another of the user's sessions may have ended; only ours matters.
                let still_valid = current
                    .token
                    .as_deref()
                    .map(|t| matches!(self.provider.current(t), Ok(Some(_))))
                    .unwrap_or(false);
                if !still_valid {
                    info!(user_id = %user.id, "session ended elsewhere");
                    self.signed_out();
                }
            }
            SessionEvent::SignedIn { .. } => {}
        }
    }
}

/// Current user, profile and token, plus the operations that change them.
///
/// Dropping the session stops its listener, same as [`ProfileSession::shutdown`].
pub struct ProfileSession {
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

impl ProfileSession {
    /// Start a session, optionally restoring a previously issued token.
    ///
    /// The restored token is checked before this returns, so operations
    /// called right after `start` are never overwritten by hydration. Must
    /// be called inside a tokio runtime: the event listener runs on a
    /// spawned task.
    pub fn start(
        provider: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        restored_token: Option<String>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState {
            is_loading: true,
            ..SessionState::default()
        });
        // Subscribe before hydrating so no event falls in between.
        let events = provider.subscribe();
        let shared = Arc::new(Shared {
            provider,
            profiles,
            state,
        });
        shared.hydrate(restored_token);

        let cancel = CancellationToken::new();
        tokio::spawn(listen(shared.clone(), events, cancel.clone()));

        Self { shared, cancel }
    }

    /// Current snapshot.
    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// Sign in and load the user's profile.
    pub fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let session = self.shared.provider.sign_in(email, password)?;
        self.shared
            .signed_in(session.user.clone(), session.access_token);
        Ok(session.user)
    }

    /// Create an identity, then its profile. Does not sign in.
    ///
    /// The two writes are not atomic: if the profile insert fails the
    /// identity stays behind without a profile.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<Identity, AuthError> {
        let nickname = validate_nickname(nickname)?;
        let identity = self.shared.provider.sign_up(email, password)?;
        self.shared
            .profiles
            .create_profile(&UserProfile::new(&identity.id, &identity.email, &nickname))?;
        Ok(identity)
    }

    /// End the current session. Without one this only clears local state.
    pub fn logout(&self) -> Result<(), AuthError> {
        let token = self.shared.state.borrow().token.clone();
        if let Some(token) = token {
            self.shared.provider.sign_out(&token)?;
        }
        self.shared.signed_out();
        Ok(())
    }

    pub fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, AuthError> {
        let user_id = self
            .shared
            .state
            .borrow()
            .user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or_else(|| AuthError::Unauthorized("not signed in".into()))?;

        let profile = self.shared.profiles.update_profile(&user_id, update)?;
        self.shared.state.send_modify(|s| {
            // The user may have signed out while the write was in flight.
            if s.user.as_ref().is_some_and(|u| u.id == user_id) {
                s.profile = Some(profile.clone());
            }
        });
        Ok(profile)
    }

    pub fn update_mbti_type(&self, mbti_type: MbtiType) -> Result<UserProfile, AuthError> {
        self.update_profile(ProfileUpdate::mbti_type(mbti_type))
    }

    /// Stop listening for session events. Local state is kept.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ProfileSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn listen(
    shared: Arc<Shared>,
    mut events: broadcast::Receiver<SessionEvent>,
    cancel: CancellationToken,
) {
    debug!("profile session listener started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Ok(event) => shared.on_event(event),
                Err(RecvError::Lagged(n)) => {
                    warn!("profile session missed {n} events, re-checking session");
                    let token = shared.state.borrow().token.clone();
                    shared.hydrate(token);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
    debug!("profile session listener stopped");
}
