use minivault_core::{FeedbackStore, SessionRegistry};
use minivault_fetch::FetchCache;
use minivault_notion::NotionClient;
use minivault_server::{routes, AppState};
use minivault_test_utils::{
    feedback_body, sample_project_config, unreachable_base_url, FakeNotion, StaticFetcher,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use warp::http::StatusCode;

fn state_with(data_dir: &Path, notion_base: String) -> AppState {
    AppState::new(
        sample_project_config(),
        FeedbackStore::new(data_dir),
        NotionClient::with_base_url(notion_base, Some("token".into()), Some("db-1".into())),
        Arc::new(SessionRegistry::new()),
        Arc::new(FetchCache::new(Arc::new(StaticFetcher::new()))),
    )
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_feedback_save_writes_file() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/feedback/save")
        .json(&feedback_body("Hello, World! 2025", Some("2025-01-01"), "Nice work", "Sam"))
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["success"], true);
    assert_eq!(body["filename"], "2025-01-01_hello__world__2025.txt");

    let path = tmp.path().join("feedbacks/2025-01-01_hello__world__2025.txt");
    assert_eq!(body["path"], path.display().to_string());

    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("Title: Hello, World! 2025\n"));
    assert!(content.contains("User: Sam\n"));
    assert!(content.contains("Feedback:\nNice work\n"));
    assert!(content.contains("Created: "));
}

#[tokio::test]
async fn test_feedback_resubmission_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    for text in ["first version", "second version"] {
        let res = warp::test::request()
            .method("POST")
            .path("/api/feedback/save")
            .json(&feedback_body("Great Job", Some("2025-01-01"), text, "Sam"))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let dir = tmp.path().join("feedbacks");
    assert_eq!(file_count(&dir), 1);
    let content = std::fs::read_to_string(dir.join("2025-01-01_great_job.txt")).unwrap();
    assert!(content.contains("second version"));
    assert!(!content.contains("first version"));
}

#[tokio::test]
async fn test_feedback_missing_fields_rejected_without_write() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    let bodies = [
        json!({ "feedback": "x", "userName": "Sam" }),
        json!({ "title": "t", "userName": "Sam" }),
        json!({ "title": "t", "feedback": "x" }),
        json!({ "title": "", "feedback": "x", "userName": "Sam" }),
    ];

    for body in bodies {
        let res = warp::test::request()
            .method("POST")
            .path("/api/feedback/save")
            .json(&body)
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let reply = body_json(res.body());
        assert!(reply["error"].as_str().unwrap().starts_with("Missing required fields"));
    }

    assert_eq!(file_count(&tmp.path().join("feedbacks")), 0);
}

#[tokio::test]
async fn test_feedback_malformed_body_is_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/feedback/save")
        .body("{not json")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(res.body())["error"].is_string());
}

#[tokio::test]
async fn test_feedback_io_failure_is_500() {
    let tmp = tempfile::tempdir().unwrap();
    // A file where the data directory should be makes directory creation fail
    let blocker = tmp.path().join("data");
    std::fs::write(&blocker, "not a directory").unwrap();
    let api = routes(state_with(&blocker, unreachable_base_url()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/feedback/save")
        .json(&feedback_body("Great Job", None, "x", "Sam"))
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res.body());
    assert_eq!(body["error"], "Failed to save feedback");
    assert!(body["details"].as_str().unwrap().contains("io error"));
}

#[tokio::test]
async fn test_notion_debug_relays_upstream_error_body_with_200() {
    let upstream_body = json!({
        "object": "error",
        "status": 401,
        "code": "unauthorized",
        "message": "API token is invalid."
    });
    let notion = FakeNotion::start(401, upstream_body.clone()).await;
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), notion.base_url()));

    let res = warp::test::request()
        .method("GET")
        .path("/api/notion/debug")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body()), upstream_body);

    let requests = notion.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1/databases/db-1/query");
    assert_eq!(requests[0].body, json!({}));
}

#[tokio::test]
async fn test_notion_debug_transport_failure_is_500() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    let res = warp::test::request()
        .method("GET")
        .path("/api/notion/debug")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body_json(res.body())["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_notion_create_success_envelope() {
    let page = json!({ "object": "page", "id": "page-1" });
    let notion = FakeNotion::start(200, page.clone()).await;
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), notion.base_url()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/notion/create-test")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body()), json!({ "success": true, "data": page }));

    let sent = &notion.requests()[0];
    assert_eq!(sent.path, "/v1/pages");
    assert_eq!(sent.body["parent"]["database_id"], "db-1");
    let properties = sent.body["properties"].as_object().unwrap();
    for field in ["Name", "Status", "Due Date", "Priority", "Tags"] {
        assert!(properties.contains_key(field), "missing {field}");
    }
}

#[tokio::test]
async fn test_notion_create_upstream_failure_is_500() {
    let upstream_body = json!({ "object": "error", "code": "validation_error" });
    let notion = FakeNotion::start(400, upstream_body.clone()).await;
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), notion.base_url()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/notion/create-test")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(res.body()),
        json!({ "success": false, "error": upstream_body })
    );
}

#[tokio::test]
async fn test_notion_create_unreachable_upstream_is_500_with_message() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/notion/create-test")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res.body());
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_health() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    let res = warp::test::request().path("/api/health").reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body())["status"], "ok");
}

#[tokio::test]
async fn test_oversized_body_is_json_413() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/feedback/save")
        .body(vec![b'x'; 70 * 1024])
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_json(res.body())["error"].is_string());
    assert_eq!(file_count(&tmp.path().join("feedbacks")), 0);
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    let res = warp::test::request()
        .method("GET")
        .path("/api/feedback/save")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(body_json(res.body())["error"].is_string());
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let tmp = tempfile::tempdir().unwrap();
    let api = routes(state_with(tmp.path(), unreachable_base_url()));

    for path in ["/api/nope", "/api/auth/session"] {
        let res = warp::test::request()
            .method("POST")
            .path(path)
            .json(&json!({ "token": "t" }))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        assert!(body_json(res.body())["error"].is_string(), "{path}");
    }
}
