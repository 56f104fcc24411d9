//! `/me/saved` and `/me/liked`. Both are mounted behind `require_user`.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use tripmatch_core::{CurrentUser, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{CollectedDestination, RelationKind, RelationRow};

pub(super) fn routes(kind: RelationKind) -> Router<AppState> {
    let base = format!("/me/{}", kind.as_str());
    Router::new()
        .route(
            &base,
            get(
                move |State(svc): State<AppState>, Extension(user): Extension<CurrentUser>| async move {
                    list(svc, user, kind)
                },
            ),
        )
        .route(
            &format!("{base}/{{id}}"),
            get(
                move |State(svc): State<AppState>,
                      Extension(user): Extension<CurrentUser>,
                      Path(id): Path<String>| async move { check(svc, user, kind, id) },
            )
            .put(
                move |State(svc): State<AppState>,
                      Extension(user): Extension<CurrentUser>,
                      Path(id): Path<String>| async move { add(svc, user, kind, id) },
            )
            .delete(
                move |State(svc): State<AppState>,
                      Extension(user): Extension<CurrentUser>,
                      Path(id): Path<String>| async move { remove(svc, user, kind, id) },
            ),
        )
}

/// GET /me/{kind}
fn list(
    svc: AppState,
    user: CurrentUser,
    kind: RelationKind,
) -> Result<Json<ListResult<CollectedDestination>>, ServiceError> {
    let items = svc.list_relation(kind, &user.id)?;
    Ok(Json(ListResult::new(items)))
}

/// GET /me/{kind}/{id}: `{"saved": true}` or `{"liked": false}`.
fn check(
    svc: AppState,
    user: CurrentUser,
    kind: RelationKind,
    id: String,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let present = svc.has_relation(kind, &user.id, &id)?;
    let mut body = serde_json::Map::new();
    body.insert(kind.as_str().to_string(), present.into());
    Ok(Json(body.into()))
}

/// PUT /me/{kind}/{id}
fn add(
    svc: AppState,
    user: CurrentUser,
    kind: RelationKind,
    id: String,
) -> Result<(StatusCode, Json<RelationRow>), ServiceError> {
    let row = svc.add_relation(kind, &user.id, &id)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /me/{kind}/{id}
fn remove(
    svc: AppState,
    user: CurrentUser,
    kind: RelationKind,
    id: String,
) -> Result<StatusCode, ServiceError> {
    svc.remove_relation(kind, &user.id, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
