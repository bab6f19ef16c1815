//! `POST|DELETE /api/auth/session`
//!
//! Called by the identity provider once it has issued (or ended) a
//! session. Requests carry `Authorization: Bearer <NEXTAUTH_SECRET>`.
//!
//! ```text
//! POST   {"token": "...", "user": {"name": "...", "email": "..."}}  → bound, resolves Present
//! POST   {"token": "..."}                                            → pending, resolves Loading
//! DELETE {"token": "..."}                                            → revoked
//! ```

use super::{with_state, MAX_BODY_BYTES};
use crate::reply;
use crate::state::AppState;
use minivault_core::{SessionRegistry, User};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection};

#[derive(Debug, Deserialize)]
struct Binding {
    token: String,
    #[serde(default)]
    user: Option<User>,
}

pub(crate) fn routes(state: AppState) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let session = warp::path!("api" / "auth" / "session")
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_state(state));

    let bind = warp::post().and(session.clone()).then(bind);
    let revoke = warp::delete().and(session).then(revoke);

    bind.or(revoke).unify()
}

async fn bind(auth: Option<String>, body: Bytes, state: AppState) -> Response {
    let (registry, binding) = match authorize(auth.as_deref(), &body, &state) {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    match binding.user {
        Some(user) => {
            tracing::info!(email = %user.email, "session bound");
            registry.activate(binding.token, user);
            reply::json(StatusCode::OK, &json!({ "success": true, "state": "present" }))
        }
        None => {
            tracing::debug!("session pending");
            registry.begin(binding.token);
            reply::json(StatusCode::OK, &json!({ "success": true, "state": "loading" }))
        }
    }
}

async fn revoke(auth: Option<String>, body: Bytes, state: AppState) -> Response {
    let (registry, binding) = match authorize(auth.as_deref(), &body, &state) {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    let revoked = registry.revoke(&binding.token);
    tracing::info!(revoked, "session revoked");
    reply::json(StatusCode::OK, &json!({ "success": true, "revoked": revoked }))
}

/// Check the bearer secret and parse the body
fn authorize(
    auth: Option<&str>,
    body: &[u8],
    state: &AppState,
) -> Result<(Arc<SessionRegistry>, Binding), Response> {
    let Some(registry) = state.registry.clone() else {
        return Err(reply::error(StatusCode::NOT_FOUND, "Session binding is not enabled"));
    };

    let Some(secret) = state.session_secret.as_deref() else {
        tracing::warn!("session binding refused: NEXTAUTH_SECRET is not set");
        return Err(reply::error(StatusCode::UNAUTHORIZED, "Unauthorized"));
    };
    let presented = auth.and_then(|value| value.strip_prefix("Bearer "));
    if !presented.is_some_and(|p| secrets_match(secret, p)) {
        tracing::warn!("session binding refused: bad credentials");
        return Err(reply::error(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    let binding: Binding = serde_json::from_slice(body).map_err(|e| {
        reply::error(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}"))
    })?;
    if binding.token.is_empty() {
        return Err(reply::error(StatusCode::BAD_REQUEST, "Missing required fields: token"));
    }

    Ok((registry, binding))
}

/// Length-checked comparison that does not stop at the first differing byte
fn secrets_match(expected: &str, presented: &str) -> bool {
    let (a, b) = (expected.as_bytes(), presented.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_comparison() {
        assert!(secrets_match("s3cret", "s3cret"));
        assert!(!secrets_match("s3cret", "s3creT"));
        assert!(!secrets_match("s3cret", "s3cret2"));
        assert!(!secrets_match("s3cret", ""));
    }
}
