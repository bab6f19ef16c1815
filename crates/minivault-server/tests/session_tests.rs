use minivault_core::{FeedbackStore, SessionRegistry};
use minivault_fetch::{FetchCache, FetchConfig};
use minivault_notion::NotionClient;
use minivault_server::{routes, AppState, SESSION_COOKIE};
use minivault_test_utils::{sample_project_config, unreachable_base_url, StaticFetcher};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use warp::http::StatusCode;

const SECRET: &str = "s3cret";

fn state_with(secret: Option<&str>) -> (AppState, Arc<SessionRegistry>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let registry = Arc::new(SessionRegistry::new());
    let fetcher = StaticFetcher::new().with(
        "/api/notion/debug",
        json!({ "object": "list", "results": [{ "id": "row-1" }] }),
    );
    let state = AppState::new(
        sample_project_config(),
        FeedbackStore::new(tmp.path()),
        NotionClient::with_base_url(unreachable_base_url(), None, None),
        Arc::new(SessionRegistry::new()),
        Arc::new(FetchCache::with_config(
            Arc::new(fetcher),
            FetchConfig::new().with_retry(0, Duration::ZERO),
        )),
    )
    .with_session_registry(registry.clone(), secret.map(str::to_string));
    (state, registry, tmp)
}

fn bearer(secret: &str) -> String {
    format!("Bearer {secret}")
}

fn cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}")
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_bound_token_unlocks_sections() {
    let (state, registry, _tmp) = state_with(Some(SECRET));
    let app = routes(state);

    let res = warp::test::request()
        .method("POST")
        .path("/api/auth/session")
        .header("authorization", bearer(SECRET))
        .json(&json!({
            "token": "tok-1",
            "user": { "name": "Dana", "email": "dana@example.com" }
        }))
        .reply(&app)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res.body()),
        json!({ "success": true, "state": "present" })
    );
    assert_eq!(registry.len(), 1);

    let page = warp::test::request()
        .path("/tasks")
        .header("cookie", cookie("tok-1"))
        .reply(&app)
        .await;

    assert_eq!(page.status(), StatusCode::OK);
    let html = String::from_utf8(page.body().to_vec()).unwrap();
    assert!(html.contains("Signed in as Dana"));
    assert!(html.contains("row-1"));
}

#[tokio::test]
async fn test_token_without_user_is_pending() {
    let (state, _registry, _tmp) = state_with(Some(SECRET));
    let app = routes(state);

    let res = warp::test::request()
        .method("POST")
        .path("/api/auth/session")
        .header("authorization", bearer(SECRET))
        .json(&json!({ "token": "tok-2" }))
        .reply(&app)
        .await;
    assert_eq!(body_json(res.body())["state"], "loading");

    let page = warp::test::request()
        .path("/goals")
        .header("cookie", cookie("tok-2"))
        .reply(&app)
        .await;

    assert_eq!(page.status(), StatusCode::OK);
    let html = String::from_utf8(page.body().to_vec()).unwrap();
    assert!(html.contains("aria-busy=\"true\""));
}

#[tokio::test]
async fn test_revoked_token_redirects_to_sign_in() {
    let (state, _registry, _tmp) = state_with(Some(SECRET));
    let app = routes(state);

    warp::test::request()
        .method("POST")
        .path("/api/auth/session")
        .header("authorization", bearer(SECRET))
        .json(&json!({ "token": "tok-3", "user": { "name": "Dana", "email": "d@x.io" } }))
        .reply(&app)
        .await;

    let res = warp::test::request()
        .method("DELETE")
        .path("/api/auth/session")
        .header("authorization", bearer(SECRET))
        .json(&json!({ "token": "tok-3" }))
        .reply(&app)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body())["revoked"], true);

    let page = warp::test::request()
        .path("/tasks")
        .header("cookie", cookie("tok-3"))
        .reply(&app)
        .await;
    assert_eq!(page.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(page.headers()["location"], "/auth/signin");
}

#[tokio::test]
async fn test_binding_requires_the_shared_secret() {
    let (state, registry, _tmp) = state_with(Some(SECRET));
    let app = routes(state);
    let body = json!({ "token": "tok-4", "user": { "name": "Eve", "email": "eve@x.io" } });

    for auth in [None, Some("Bearer wrong"), Some("s3cret"), Some("Bearer s3cret2")] {
        let mut req = warp::test::request()
            .method("POST")
            .path("/api/auth/session")
            .json(&body);
        if let Some(auth) = auth {
            req = req.header("authorization", auth);
        }
        let res = req.reply(&app).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{auth:?}");
        assert_eq!(body_json(res.body())["error"], "Unauthorized");
    }

    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_binding_refused_when_secret_unset() {
    let (state, registry, _tmp) = state_with(None);

    let res = warp::test::request()
        .method("POST")
        .path("/api/auth/session")
        .header("authorization", "Bearer ")
        .json(&json!({ "token": "tok-5" }))
        .reply(&routes(state))
        .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_binding_rejects_empty_token() {
    let (state, registry, _tmp) = state_with(Some(SECRET));

    let res = warp::test::request()
        .method("POST")
        .path("/api/auth/session")
        .header("authorization", bearer(SECRET))
        .json(&json!({ "token": "" }))
        .reply(&routes(state))
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(registry.is_empty());
}
