//! Error types for the server

use minivault_core::{ConfigError, FeedbackError};

/// Failures while assembling [`AppState`](crate::state::AppState)
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Project config could not be loaded
    #[error("project config: {0}")]
    Config(#[from] ConfigError),

    /// Feedback directory could not be prepared
    #[error("feedback store: {0}")]
    Feedback(#[from] FeedbackError),

    /// `--dev-user` is not `Name <email>`
    #[error("invalid dev user '{0}': expected 'Name <email>'")]
    InvalidDevUser(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = StartupError::InvalidDevUser("bob".into());
        assert_eq!(err.to_string(), "invalid dev user 'bob': expected 'Name <email>'");

        let err: StartupError = ConfigError::UnsupportedFormat("yaml".into()).into();
        assert!(err.to_string().starts_with("project config:"));
    }
}
