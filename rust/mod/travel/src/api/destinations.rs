use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use tripmatch_core::{ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{Destination, MbtiMatch};
use crate::service::query::ALL_TAGS;

#[derive(Debug, Deserialize)]
pub(super) struct ListParams {
    /// Exact tag, or `all`.
    tag: Option<String>,
    /// Search keyword. A present but blank keyword finds nothing.
    q: Option<String>,
}

/// GET /destinations?tag=&q=
pub(super) async fn list(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ListResult<Destination>> {
    let tag = params.tag.as_deref().unwrap_or(ALL_TAGS);
    let items = match params.q.as_deref() {
        Some(q) => svc
            .search(q)
            .into_iter()
            .filter(|d| tag == ALL_TAGS || d.has_tag(tag))
            .collect(),
        None => svc.by_tag(tag),
    };
    Json(ListResult::new(items))
}

/// GET /destinations/all
pub(super) async fn all(State(svc): State<AppState>) -> Json<ListResult<Destination>> {
    Json(ListResult::new(svc.all()))
}

/// GET /destinations/popular
pub(super) async fn popular(State(svc): State<AppState>) -> Json<ListResult<Destination>> {
    Json(ListResult::new(svc.popular()))
}

/// GET /destinations/tags
pub(super) async fn tags(State(svc): State<AppState>) -> Json<ListResult<String>> {
    Json(ListResult::new(svc.tags()))
}

#[derive(Debug, Deserialize)]
pub(super) struct MbtiParams {
    tag: Option<String>,
}

/// GET /destinations/mbti/{mbti_type}?tag=
pub(super) async fn by_mbti(
    State(svc): State<AppState>,
    Path(mbti_type): Path<String>,
    Query(params): Query<MbtiParams>,
) -> Json<ListResult<MbtiMatch>> {
    let tag = params.tag.as_deref().unwrap_or(ALL_TAGS);
    Json(ListResult::new(svc.mbti_matches(&mbti_type, tag)))
}

/// GET /destinations/{id}
pub(super) async fn get(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Destination>, ServiceError> {
    svc.by_id(&id)
        .map(Json)
        .ok_or_else(|| ServiceError::NotFound(format!("destination {id}")))
}
