//! Testing utilities for MiniVault workspace
//!
//! Shared fixtures: sample project config, feedback bodies, a static
//! fetcher and a fake Notion upstream served on an ephemeral port.

#![allow(missing_docs)]

use async_trait::async_trait;
use minivault_core::{
    CustomLink, GithubRepo, NotionDatabases, ProjectConfig, User, WeeklyReport,
};
use minivault_fetch::{FetchError, Fetcher};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

pub fn sample_user() -> User {
    User::new("Test User", "test@example.com")
}

pub fn sample_project_config() -> ProjectConfig {
    ProjectConfig {
        name: "Acme Launch".to_string(),
        description: Some("Q3 launch tracker".to_string()),
        github: Some(GithubRepo {
            owner: "acme".to_string(),
            repo: "launch".to_string(),
        }),
        google_drive: None,
        notion_databases: NotionDatabases {
            tasks: Some("db-tasks".to_string()),
            ..NotionDatabases::default()
        },
        custom_links: vec![CustomLink {
            name: "Figma".to_string(),
            url: "https://figma.com/acme".to_string(),
        }],
        weekly_reports: vec![WeeklyReport {
            id: "w1".to_string(),
            date: "2025-01-06".parse().unwrap(),
            title: "Week 1".to_string(),
            content: "Kickoff".to_string(),
        }],
    }
}

pub fn feedback_body(title: &str, date: Option<&str>, feedback: &str, user_name: &str) -> Value {
    let mut body = json!({
        "title": title,
        "feedback": feedback,
        "userName": user_name,
    });
    if let Some(date) = date {
        body["date"] = json!(date);
    }
    body
}

/// Fetcher answering from a fixed map and counting calls
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Value>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.responses.insert(key.to_string(), value);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, key: &str) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                key: key.to_string(),
                status: 404,
            })
    }
}

/// Requests seen by a [`FakeNotion`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

/// Fake Notion upstream answering every POST with a canned status and body
#[derive(Debug, Clone)]
pub struct FakeNotion {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeNotion {
    /// Start on an ephemeral port
    pub async fn start(status: u16, body: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let status = StatusCode::from_u16(status).unwrap();

        let route = warp::post()
            .and(warp::path::full())
            .and(warp::body::json())
            .map(move |path: warp::path::FullPath, request: Value| {
                recorded.lock().push(RecordedRequest {
                    path: path.as_str().to_string(),
                    body: request,
                });
                warp::reply::with_status(warp::reply::json(&body), status)
            });

        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

/// Base URL nothing listens on
pub fn unreachable_base_url() -> String {
    "http://127.0.0.1:1".to_string()
}
