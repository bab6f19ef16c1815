//! Error types for MiniVault core
//!
//! Provides error handling for:
//! - Project configuration loading
//! - Feedback validation and persistence

use std::path::PathBuf;

/// Errors while loading a [`ProjectConfig`](crate::config::ProjectConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is neither `.toml` nor `.json`
    #[error("unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    /// TOML syntax or schema error
    #[error("invalid toml config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or schema error
    #[error("invalid json config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while validating or persisting feedback
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    /// One or more required fields are absent or empty
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Supplied date is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// IO error creating the directory or writing the file
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FeedbackError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error is the submitter's fault (maps to 400)
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields(_) | Self::InvalidDate(_))
    }

    /// HTTP status code for this error
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        if self.is_validation() {
            400
        } else {
            500
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_display() {
        let err = FeedbackError::MissingFields(vec!["title", "userName"]);
        assert_eq!(err.to_string(), "Missing required fields: title, userName");
    }

    #[test]
    fn feedback_status_codes() {
        assert_eq!(FeedbackError::MissingFields(vec!["title"]).status_code(), 400);
        assert_eq!(FeedbackError::InvalidDate("soon".into()).status_code(), 400);

        let io = FeedbackError::io_error(
            "data/feedbacks",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_validation());
        assert_eq!(io.status_code(), 500);
    }

    #[test]
    fn config_error_from_parsers() {
        let err: ConfigError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("invalid json config"));
    }
}
