//! Session state as seen by the dashboard
//!
//! The identity provider owns sessions; MiniVault only reads them. Session
//! state is handed to consumers explicitly: pages receive a [`SessionState`]
//! from a [`SessionResolver`], long-lived observers subscribe to a
//! [`SessionHandle`].

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Identity of a signed-in viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl User {
    /// Create user with name and email
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            image: None,
        }
    }
}

/// Authentication state of the current viewer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session
    #[default]
    Absent,
    /// Session lookup still in progress
    Loading,
    /// Signed in
    Present(User),
}

impl SessionState {
    /// Signed-in user, if any
    #[inline]
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Present(user) => Some(user),
            _ => None,
        }
    }

    /// Short label for logs
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Loading => "loading",
            Self::Present(_) => "present",
        }
    }
}

/// Observable session context created once at the composition root
#[derive(Debug, Clone)]
pub struct SessionHandle {
    sender: watch::Sender<SessionState>,
}

impl SessionHandle {
    /// Create handle with initial state
    #[must_use]
    pub fn new(initial: SessionState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.sender.borrow().clone()
    }

    /// Current user, if signed in
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.sender.borrow().user().cloned()
    }

    /// Publish a new state; observers are only woken on actual change
    pub fn set(&self, state: SessionState) {
        self.sender.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.sender.subscribe()
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new(SessionState::Loading)
    }
}

/// Resolves a request's session token into a [`SessionState`]
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve the state for an optional token
    async fn resolve(&self, token: Option<&str>) -> SessionState;
}

#[derive(Debug, Clone)]
enum SessionEntry {
    Pending,
    Active(User),
}

/// In-memory token registry fed by the identity provider callback
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
}

impl SessionRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token whose identity is not yet confirmed
    pub fn begin(&self, token: impl Into<String>) {
        self.sessions.insert(token.into(), SessionEntry::Pending);
    }

    /// Bind a token to a confirmed user
    pub fn activate(&self, token: impl Into<String>, user: User) {
        self.sessions.insert(token.into(), SessionEntry::Active(user));
    }

    /// Drop a token (sign-out or expiry)
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Number of known tokens
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no tokens are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionResolver for SessionRegistry {
    async fn resolve(&self, token: Option<&str>) -> SessionState {
        let Some(token) = token else {
            return SessionState::Absent;
        };
        match self.sessions.get(token).map(|e| e.value().clone()) {
            Some(SessionEntry::Active(user)) => SessionState::Present(user),
            Some(SessionEntry::Pending) => SessionState::Loading,
            None => SessionState::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new("Alice", "alice@example.com")
    }

    #[tokio::test]
    async fn registry_resolves_states() {
        let registry = SessionRegistry::new();
        registry.begin("t-pending");
        registry.activate("t-active", alice());

        assert_eq!(registry.resolve(None).await, SessionState::Absent);
        assert_eq!(registry.resolve(Some("unknown")).await, SessionState::Absent);
        assert_eq!(registry.resolve(Some("t-pending")).await, SessionState::Loading);
        assert_eq!(
            registry.resolve(Some("t-active")).await,
            SessionState::Present(alice())
        );
    }

    #[tokio::test]
    async fn registry_revoke() {
        let registry = SessionRegistry::new();
        registry.activate("t", alice());
        assert!(registry.revoke("t"));
        assert!(!registry.revoke("t"));
        assert!(registry.is_empty());
        assert_eq!(registry.resolve(Some("t")).await, SessionState::Absent);
    }

    #[tokio::test]
    async fn handle_notifies_only_on_change() {
        let handle = SessionHandle::default();
        let mut rx = handle.subscribe();
        assert_eq!(handle.state(), SessionState::Loading);

        handle.set(SessionState::Loading);
        assert!(!rx.has_changed().unwrap());

        handle.set(SessionState::Present(alice()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::Present(alice()));
        assert_eq!(handle.user(), Some(alice()));
    }

    #[test]
    fn state_labels() {
        assert_eq!(SessionState::Absent.label(), "absent");
        assert_eq!(SessionState::Loading.label(), "loading");
        assert_eq!(SessionState::Present(alice()).label(), "present");
        assert!(SessionState::Loading.user().is_none());
    }
}
