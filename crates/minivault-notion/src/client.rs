//! Notion REST client
//!
//! Credentials are forwarded as given. A missing token or database id is
//! not checked here; the upstream rejects the call and its error body is
//! relayed like any other response.

use crate::error::NotionError;
use crate::schema::TestTask;
use chrono::NaiveDate;
use serde_json::{json, Value};

/// Public Notion API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// API version header sent with every request
pub const NOTION_VERSION: &str = "2022-06-28";

/// Upstream response relayed by the proxy routes
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    /// Upstream HTTP status
    pub status: u16,
    /// Upstream JSON body, untouched
    pub body: Value,
}

impl UpstreamResponse {
    /// Whether the upstream reported success (2xx)
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Notion client bound to one token and database
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    database_id: String,
}

impl NotionClient {
    /// Create client against the public API
    #[must_use]
    pub fn new(token: Option<String>, database_id: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token, database_id)
    }

    /// Create client against a custom endpoint
    #[must_use]
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<String>,
        database_id: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.unwrap_or_default(),
            database_id: database_id.unwrap_or_default(),
        }
    }

    /// Endpoint requests are sent to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured database id (empty when unset)
    #[inline]
    #[must_use]
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// Query the configured database with an empty filter
    pub async fn query_database(&self) -> Result<UpstreamResponse, NotionError> {
        let url = format!("{}/v1/databases/{}/query", self.base_url, self.database_id);
        self.post(&url, &json!({})).await
    }

    /// Create one page in the configured database
    pub async fn create_page(&self, properties: Value) -> Result<UpstreamResponse, NotionError> {
        let url = format!("{}/v1/pages", self.base_url);
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
        });
        self.post(&url, &body).await
    }

    /// Create the canonical test task
    pub async fn create_test_task(&self, today: NaiveDate) -> Result<UpstreamResponse, NotionError> {
        self.create_page(TestTask::sample(today).to_properties()).await
    }

    async fn post(&self, url: &str, body: &Value) -> Result<UpstreamResponse, NotionError> {
        tracing::debug!(url, "notion request");
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|source| NotionError::Decode { status, source })?;

        tracing::debug!(status, "notion response");
        Ok(UpstreamResponse { status, body })
    }
}
