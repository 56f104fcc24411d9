use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use tripmatch_core::{bearer_token, ServiceError};

use crate::api::{Account, AppState};
use crate::model::{AuthSession, Credentials, RegisterRequest, UserProfile};
use crate::service::profile::validate_nickname;

/// POST /auth/register: create an identity and its profile. Does not sign in.
pub(super) async fn register(
    State(svc): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Account>), ServiceError> {
    let nickname = validate_nickname(&body.nickname)?;
    let user = svc.sign_up(&body.email, &body.password)?;
    let profile = UserProfile::new(&user.id, &user.email, &nickname);
    svc.create_profile(&profile)?;

    Ok((
        StatusCode::CREATED,
        Json(Account {
            user,
            profile: Some(profile),
        }),
    ))
}

/// POST /auth/login
pub(super) async fn login(
    State(svc): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Json<AuthSession>, ServiceError> {
    Ok(Json(svc.sign_in(&body.email, &body.password)?))
}

/// POST /auth/logout: end the session behind the bearer token.
pub(super) async fn logout(
    State(svc): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ServiceError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ServiceError::Unauthorized("missing bearer token".into()))?;
    svc.sign_out(token)?;
    Ok(StatusCode::NO_CONTENT)
}
