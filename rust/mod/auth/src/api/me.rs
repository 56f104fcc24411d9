use axum::extract::{Extension, State};
use axum::Json;

use tripmatch_core::{CurrentUser, ServiceError};

use crate::api::{Account, AppState};
use crate::model::{MbtiRequest, ProfileUpdate, UserProfile};

/// GET /auth/me
pub(super) async fn me(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Account>, ServiceError> {
    let identity = svc
        .get_identity(&user.id)?
        .ok_or_else(|| ServiceError::NotFound(format!("identity {}", user.id)))?;
    let profile = svc.get_profile(&user.id)?;
    Ok(Json(Account {
        user: identity,
        profile,
    }))
}

/// PUT /auth/profile
pub(super) async fn update_profile(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ServiceError> {
    Ok(Json(svc.update_profile(&user.id, update)?))
}

/// PUT /auth/profile/mbti
pub(super) async fn update_mbti(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<MbtiRequest>,
) -> Result<Json<UserProfile>, ServiceError> {
    let update = ProfileUpdate::mbti_type(body.mbti_type);
    Ok(Json(svc.update_profile(&user.id, update)?))
}
