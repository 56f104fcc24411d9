mod account;
mod me;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::Router;
use serde::Serialize;

use tripmatch_core::{require_user, Authenticator};

use crate::model::{Identity, UserProfile};
use crate::service::AuthService;

/// Shared handler state.
pub type AppState = Arc<AuthService>;

/// Identity plus profile, returned by register and `/auth/me`.
#[derive(Debug, Serialize)]
struct Account {
    user: Identity,
    profile: Option<UserProfile>,
}

/// Build the auth router. Register and login are public; everything else
/// needs a bearer token.
pub fn build_router(svc: AppState) -> Router {
    let auth: Arc<dyn Authenticator> = svc.clone();

    let gated = Router::new()
        .route("/auth/logout", post(account::logout))
        .route("/auth/me", get(me::me))
        .route("/auth/profile", put(me::update_profile))
        .route("/auth/profile/mbti", put(me::update_mbti))
        .route_layer(from_fn_with_state(auth, require_user));

    Router::new()
        .route("/auth/register", post(account::register))
        .route("/auth/login", post(account::login))
        .merge(gated)
        .with_state(svc)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::service::testing;

    async fn api(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
            None => Body::empty(),
        };
        let resp = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn register_body() -> serde_json::Value {
        json!({"email": "ada@example.com", "password": "secret1", "nickname": "Ada"})
    }

    async fn login(router: &Router) -> String {
        let (status, body) = api(
            router,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["token_type"], "Bearer");
        body["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn register_creates_identity_and_profile() {
        let (svc, _dir) = testing::service();
        let router = build_router(svc);

        let (status, body) = api(&router, "POST", "/auth/register", None, Some(register_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert_eq!(body["profile"]["nickname"], "Ada");
        assert!(body["profile"].get("mbti_type").is_none());

        let (status, body) = api(&router, "POST", "/auth/register", None, Some(register_body())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn register_validation_errors() {
        let (svc, _dir) = testing::service();
        let router = build_router(svc);

        let cases = [
            json!({"email": "ada", "password": "secret1", "nickname": "Ada"}),
            json!({"email": "ada@example.com", "password": "123", "nickname": "Ada"}),
            json!({"email": "ada@example.com", "password": "secret1", "nickname": ""}),
        ];
        for case in cases {
            let (status, body) = api(&router, "POST", "/auth/register", None, Some(case)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "VALIDATION_FAILED");
        }
    }

    #[tokio::test]
    async fn login_me_update_logout() {
        let (svc, _dir) = testing::service();
        let router = build_router(svc);
        api(&router, "POST", "/auth/register", None, Some(register_body())).await;

        let (status, body) = api(
            &router,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "wrong!"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let token = login(&router).await;

        let (status, body) = api(&router, "GET", "/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert_eq!(body["profile"]["nickname"], "Ada");

        let (status, body) = api(
            &router,
            "PUT",
            "/auth/profile/mbti",
            Some(&token),
            Some(json!({"mbti_type": "enfp"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mbti_type"], "ENFP");

        let (status, body) = api(
            &router,
            "PUT",
            "/auth/profile",
            Some(&token),
            Some(json!({"nickname": "Countess"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nickname"], "Countess");
        assert_eq!(body["mbti_type"], "ENFP");

        let (status, _) = api(&router, "POST", "/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = api(&router, "GET", "/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn gated_routes_need_token() {
        let (svc, _dir) = testing::service();
        let router = build_router(svc);

        for (method, uri) in [
            ("GET", "/auth/me"),
            ("POST", "/auth/logout"),
            ("PUT", "/auth/profile"),
            ("PUT", "/auth/profile/mbti"),
        ] {
            let (status, body) = api(&router, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body["code"], "UNAUTHENTICATED");
        }
    }
}
