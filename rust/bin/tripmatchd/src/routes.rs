//! Route registration: module routes plus the system endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use tripmatch_core::{MbtiType, ServiceError};
use travel::model::Destination;
use travel::service::TravelService;

/// Build the complete router. Module routers carry absolute paths and are
/// merged as-is.
pub fn build_router(travel: Arc<TravelService>, module_routes: Vec<(&str, Router)>) -> Router {
    let mut app: Router = Router::new()
        .route("/", get(home))
        .with_state(travel)
        .route("/about", get(about))
        .route("/health", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        info!("Mounted {} routes", name);
        app = app.merge(router);
    }

    app.fallback(not_found)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MbtiChoice {
    code: MbtiType,
    title: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Home {
    popular: Vec<Destination>,
    mbti_types: Vec<MbtiChoice>,
}

/// GET /: landing data: the popular list and the type selector.
async fn home(State(travel): State<Arc<TravelService>>) -> Json<Home> {
    Json(Home {
        popular: travel.popular(),
        mbti_types: MbtiType::ALL
            .into_iter()
            .map(|t| MbtiChoice {
                code: t,
                title: t.title(),
            })
            .collect(),
    })
}

async fn about() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "TripMatch",
        "description": "Travel destinations matched to your MBTI personality type.",
        "personalityTypes": MbtiType::ALL.len(),
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "tripmatchd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: Uri) -> ServiceError {
    ServiceError::NotFound(format!("no route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::bootstrap::tests::{config, core_config};
    use crate::bootstrap::{build_app, open_stores};

    struct TestApp {
        router: axum::Router,
        _dir: tempfile::TempDir,
    }

    fn app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let stores = open_stores(&core_config(dir.path())).unwrap();
        let router = build_app(&config("unused"), &stores).unwrap();
        TestApp { router, _dir: dir }
    }

    async fn call(
        app: &TestApp,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header("authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = app.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn system_endpoints() {
        let app = app();

        let (status, body) = call(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (_, body) = call(&app, "GET", "/version", None, None).await;
        assert_eq!(body["name"], "tripmatchd");

        let (status, body) = call(&app, "GET", "/about", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["personalityTypes"], 16);
    }

    #[tokio::test]
    async fn home_uses_popular_limit() {
        let app = app();
        let (status, body) = call(&app, "GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["popular"].as_array().unwrap().len(), 3);
        assert_eq!(body["popular"][0]["id"], "jeju");
        assert_eq!(body["mbtiTypes"].as_array().unwrap().len(), 16);
        assert_eq!(body["mbtiTypes"][0]["code"], "INTJ");
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = app();
        let (status, body) = call(&app, "GET", "/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn register_login_and_save() {
        let app = app();

        let (status, _) = call(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(serde_json::json!({
                "email": "mina@example.com",
                "password": "hunter22",
                "nickname": "Mina",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, session) = call(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(serde_json::json!({"email": "mina@example.com", "password": "hunter22"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = session["access_token"].as_str().unwrap().to_string();

        // The session issued by auth opens the travel routes.
        let (status, _) = call(&app, "GET", "/me/saved", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, "PUT", "/me/saved/kyoto", Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "GET", "/me/saved", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["destination"]["id"], "kyoto");

        let (status, _) = call(&app, "POST", "/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, "GET", "/me/saved", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
