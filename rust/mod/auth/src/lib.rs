//! Auth module: local identity provider, user profiles and the client-side
//! profile session.
//!
//! # Resources
//!
//! - **Identity**: email + argon2id password hash, table `identities`
//! - **Session**: HS256 JWT whose record lives at `auth:session:{sid}` in KV
//! - **Profile**: nickname and optional MBTI type, table `profiles`
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(sql, kv, AuthConfig::default())?;
//! let router = module.routes(); // /auth/...
//! let gate = module.authenticator(); // for other modules' session-gated routes
//! ```

pub mod api;
pub mod model;
pub mod profile_session;
pub mod provider;
pub mod service;

use std::sync::Arc;

use axum::Router;

use tripmatch_core::{Authenticator, Module, ServiceError};
use tripmatch_kv::KVStore;
use tripmatch_sql::SQLStore;

pub use crate::profile_session::{ProfileSession, SessionState};
pub use crate::provider::{IdentityProvider, ProfileStore};
use crate::service::{AuthConfig, AuthService};

pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(
        sql: Arc<dyn SQLStore>,
        kv: Arc<dyn KVStore>,
        config: AuthConfig,
    ) -> Result<Self, ServiceError> {
        let service = AuthService::new(sql, kv, config)?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }

    /// Bearer-token verifier backed by this module's sessions.
    pub fn authenticator(&self) -> Arc<dyn Authenticator> {
        self.service.clone()
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
