//! Session gating for module routes.
//!
//! Modules never depend on the identity module directly. They only know
//! the [`Authenticator`] trait; the concrete implementation is injected
//! by the binary at startup.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::ServiceError;

/// The signed-in user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    /// Session the bearer token belongs to.
    pub session_id: String,
}

/// Resolves request headers to a signed-in user.
pub trait Authenticator: Send + Sync + 'static {
    /// Returns `Err(ServiceError::Unauthorized)` when the request carries no
    /// valid session.
    fn authenticate(&self, headers: &HeaderMap) -> Result<CurrentUser, ServiceError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware for session-gated routes.
///
/// On success the [`CurrentUser`] is stored as a request extension, so
/// handlers take `Extension<CurrentUser>`.
pub async fn require_user(
    State(auth): State<Arc<dyn Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let user = auth.authenticate(req.headers())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Authenticator that accepts every request as one fixed user. For tests.
pub struct FixedUser(pub CurrentUser);

impl Authenticator for FixedUser {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<CurrentUser, ServiceError> {
        Ok(self.0.clone())
    }
}

/// Authenticator that rejects everything. For tests.
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<CurrentUser, ServiceError> {
        Err(ServiceError::Unauthorized("login required".into()))
    }
}
