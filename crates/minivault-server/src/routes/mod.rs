//! Route table
//!
//! ```text
//! GET    /api/health
//! POST   /api/feedback/save
//! GET    /api/notion/debug
//! POST   /api/notion/create-test
//! POST   /api/auth/session    (bearer NEXTAUTH_SECRET)
//! DELETE /api/auth/session    (bearer NEXTAUTH_SECRET)
//! GET    /auth/signin
//! GET    /                    (overview, gated)
//! GET    /<section>           (gated)
//! ```
//!
//! Anything under `/api/` answers in JSON, rejections included.

mod feedback;
mod health;
mod notion;
mod pages;
mod session;

use crate::reply;
use crate::state::AppState;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::path::FullPath;
use warp::reject::{LengthRequired, MethodNotAllowed, PayloadTooLarge, UnsupportedMediaType};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

pub use pages::SESSION_COOKIE;

/// Largest accepted JSON request body
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Every MiniVault route
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let api_routes = health::route()
        .or(feedback::route(state.clone()))
        .unify()
        .or(notion::routes(state.clone()))
        .unify()
        .or(session::routes(state.clone()))
        .unify();

    let api = api_scope()
        .and(api_routes.recover(handle_rejection))
        .with(warp::trace(|info| {
            tracing::info_span!(
                "api",
                request_id = %uuid::Uuid::new_v4(),
                method = %info.method(),
                path = %info.path(),
            )
        }));

    api.or(pages::routes(state))
}

/// Passes only requests under `/api/`
fn api_scope() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::full()
        .and_then(|path: FullPath| async move {
            if path.as_str().starts_with("/api/") {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
}

/// Turns an API rejection into a JSON error body
async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.find::<PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required")
    } else if err.find::<UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type")
    } else if err.find::<MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else {
        tracing::error!(rejection = ?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    Ok(reply::error(status, message))
}

pub(crate) fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
