mod collection;
mod destinations;
mod mbti;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use tripmatch_core::{require_user, Authenticator};

use crate::model::RelationKind;
use crate::service::TravelService;

/// Shared handler state.
pub type AppState = Arc<TravelService>;

/// Build the travel router. Catalog routes are public; `/me/...` routes go
/// through `auth`.
pub fn build_router(svc: AppState, auth: Arc<dyn Authenticator>) -> Router {
    let mut gated = Router::new();
    for kind in RelationKind::ALL {
        gated = gated.merge(collection::routes(kind));
    }
    let gated = gated.route_layer(from_fn_with_state(auth, require_user));

    Router::new()
        .route("/destinations", get(destinations::list))
        .route("/destinations/all", get(destinations::all))
        .route("/destinations/popular", get(destinations::popular))
        .route("/destinations/tags", get(destinations::tags))
        .route("/destinations/mbti/{mbti_type}", get(destinations::by_mbti))
        .route("/destinations/{id}", get(destinations::get))
        .route("/mbti", get(mbti::list))
        .merge(gated)
        .with_state(svc)
}
