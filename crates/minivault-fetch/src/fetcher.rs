//! Request functions used by the cache

use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;

/// Maps a resource identifier to parsed JSON
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch and parse the resource
    async fn fetch(&self, key: &str) -> Result<Value, FetchError>;
}

/// Default request function: HTTP GET, JSON body
///
/// Relative keys (`/api/...`) are resolved against `base_url`; absolute
/// `http(s)://` keys are used as-is.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create fetcher resolving relative keys against `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create fetcher with a preconfigured client
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a key
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        if key.starts_with("http://") || key.starts_with("https://") {
            key.to_string()
        } else if key.starts_with('/') {
            format!("{}{}", self.base_url, key)
        } else {
            format!("{}/{}", self.base_url, key)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, key: &str) -> Result<Value, FetchError> {
        let url = self.resolve(key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::transport(key, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(key, e))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::decode(key, e))
    }
}
