//! Notion proxy routes
//!
//! `debug` relays the upstream body with 200 whatever the upstream said;
//! `create-test` wraps it in a success/failure envelope. Only transport
//! failures make `debug` answer 500.

use super::with_state;
use crate::reply;
use crate::state::AppState;
use chrono::Utc;
use serde_json::json;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection};

pub(crate) fn routes(state: AppState) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let debug = warp::path!("api" / "notion" / "debug")
        .and(warp::get())
        .and(with_state(state.clone()))
        .then(debug);

    let create_test = warp::path!("api" / "notion" / "create-test")
        .and(warp::post())
        .and(with_state(state))
        .then(create_test);

    debug.or(create_test).unify()
}

async fn debug(state: AppState) -> Response {
    match state.notion.query_database().await {
        Ok(upstream) => {
            if !upstream.is_success() {
                tracing::warn!(status = upstream.status, "notion query returned an error body");
            }
            reply::json(StatusCode::OK, &upstream.body)
        }
        Err(e) => {
            tracing::error!(error = %e, "notion query failed");
            reply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn create_test(state: AppState) -> Response {
    match state.notion.create_test_task(Utc::now().date_naive()).await {
        Ok(upstream) if upstream.is_success() => {
            tracing::info!("notion test task created");
            reply::json(StatusCode::OK, &json!({ "success": true, "data": upstream.body }))
        }
        Ok(upstream) => {
            tracing::warn!(status = upstream.status, "notion rejected test task");
            reply::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "success": false, "error": upstream.body }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "notion create failed");
            reply::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "success": false, "error": e.to_string() }),
            )
        }
    }
}
