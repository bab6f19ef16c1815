//! Error types for the Notion client

/// Failures raised before an upstream response could be relayed
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// Request never produced a response
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream body is not JSON
    #[error("upstream returned invalid json (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl NotionError {
    /// HTTP status the proxy routes answer with
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        500
    }
}
