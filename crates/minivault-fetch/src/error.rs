//! Error types for the fetch cache

/// Failure of the default request function
///
/// Every variant is a network error from the consumer's point of view;
/// the split only keeps the cause visible in logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport failed before a response arrived
    #[error("network error fetching {key}: {message}")]
    Transport { key: String, message: String },

    /// Response arrived with a non-success status
    #[error("request to {key} failed with status {status}")]
    Status { key: String, status: u16 },

    /// Response body is not valid JSON
    #[error("invalid json from {key}: {message}")]
    Decode { key: String, message: String },
}

impl FetchError {
    /// Create transport error for key
    pub fn transport(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create decode error for key
    pub fn decode(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Resource identifier that failed
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Transport { key, .. } | Self::Status { key, .. } | Self::Decode { key, .. } => {
                key
            }
        }
    }
}
