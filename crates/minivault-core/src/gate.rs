//! Session gate for protected sections
//!
//! Decides what a protected route shows for the current session:
//!
//! ```text
//! Loading         → Placeholder  (no side effect)
//! Absent          → Nothing      (one navigation to the sign-in route)
//! Present(user)   → Content
//! ```
//!
//! The gate remembers the last `(state, route)` pair it saw, so observing
//! the same absent state twice on the same route redirects only once.

use crate::session::SessionState;
use tokio::sync::watch;

/// Route unauthenticated viewers are sent to
pub const SIGN_IN_ROUTE: &str = "/auth/signin";

/// Navigation side effect injected into the gate
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`
    fn navigate(&self, route: &str);
}

/// What the gated route should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    /// Neutral waiting placeholder
    Placeholder,
    /// Nothing; a redirect is underway
    Nothing,
    /// The wrapped content
    Content,
}

/// Session gate bound to a navigator
#[derive(Debug)]
pub struct SessionGate<N> {
    navigator: N,
    sign_in_route: String,
    last_seen: Option<(&'static str, String)>,
}

impl<N: Navigator> SessionGate<N> {
    /// Create gate redirecting to [`SIGN_IN_ROUTE`]
    #[must_use]
    pub fn new(navigator: N) -> Self {
        Self::with_sign_in_route(navigator, SIGN_IN_ROUTE)
    }

    /// Create gate redirecting to a custom sign-in route
    #[must_use]
    pub fn with_sign_in_route(navigator: N, route: impl Into<String>) -> Self {
        Self {
            navigator,
            sign_in_route: route.into(),
            last_seen: None,
        }
    }

    /// Sign-in route this gate redirects to
    #[must_use]
    pub fn sign_in_route(&self) -> &str {
        &self.sign_in_route
    }

    /// Evaluate the gate for a session state on a hosting route
    pub fn evaluate(&mut self, state: &SessionState, route: &str) -> GateView {
        let label = state.label();
        let changed = self
            .last_seen
            .as_ref()
            .map_or(true, |(seen, seen_route)| *seen != label || seen_route != route);
        if changed {
            self.last_seen = Some((label, route.to_string()));
        }

        match state {
            SessionState::Loading => GateView::Placeholder,
            SessionState::Absent => {
                if changed {
                    tracing::debug!(route, sign_in = %self.sign_in_route, "redirecting unauthenticated viewer");
                    self.navigator.navigate(&self.sign_in_route);
                }
                GateView::Nothing
            }
            SessionState::Present(_) => GateView::Content,
        }
    }

    /// Evaluate the current value of a session channel, then every change
    /// until the channel closes, handing each view to `render`
    pub async fn follow<F>(
        &mut self,
        mut session: watch::Receiver<SessionState>,
        route: &str,
        mut render: F,
    ) where
        F: FnMut(GateView),
    {
        loop {
            let state = session.borrow_and_update().clone();
            render(self.evaluate(&state, route));
            if session.changed().await.is_err() {
                break;
            }
        }
    }

    /// Borrow the navigator
    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Consume the gate, returning the navigator
    #[must_use]
    pub fn into_navigator(self) -> N {
        self.navigator
    }
}
