//! Local development session
//!
//! `--dev-user "Name <email>"` signs every request in as that user so the
//! dashboard can be browsed without an identity provider.

use crate::error::StartupError;
use async_trait::async_trait;
use minivault_core::{SessionResolver, SessionState, User};

/// Resolver that reports the same user for every request
#[derive(Debug, Clone)]
pub struct DevSession {
    user: User,
}

impl DevSession {
    /// Create resolver for a user
    #[must_use]
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// Parse `Name <email>`
    pub fn parse(raw: &str) -> Result<Self, StartupError> {
        let invalid = || StartupError::InvalidDevUser(raw.to_string());
        let (name, rest) = raw.split_once('<').ok_or_else(invalid)?;
        let email = rest.strip_suffix('>').ok_or_else(invalid)?.trim();
        let name = name.trim();
        if name.is_empty() || !email.contains('@') {
            return Err(invalid());
        }
        Ok(Self::new(User::new(name, email)))
    }
}

#[async_trait]
impl SessionResolver for DevSession {
    async fn resolve(&self, _token: Option<&str>) -> SessionState {
        SessionState::Present(self.user.clone())
    }
}
