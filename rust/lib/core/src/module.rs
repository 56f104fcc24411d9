use axum::Router;

/// A feature module that contributes HTTP routes.
///
/// `auth` and `travel` implement this; the server binary collects them and
/// merges their routers. Routes are absolute (`/auth/...`, `/destinations/...`)
/// and already carry their own state.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    fn routes(&self) -> Router;
}
