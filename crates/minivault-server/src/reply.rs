//! JSON and HTML reply helpers

use serde_json::{json, Value};
use warp::http::{StatusCode, Uri};
use warp::reply::{Reply, Response};

/// JSON body with status
pub(crate) fn json(status: StatusCode, body: &Value) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

/// `{"error": message}`
pub(crate) fn error(status: StatusCode, message: impl Into<String>) -> Response {
    json(status, &json!({ "error": message.into() }))
}

/// `{"error": message, "details": details}`
pub(crate) fn error_with_details(
    status: StatusCode,
    message: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    json(
        status,
        &json!({ "error": message.into(), "details": details.into() }),
    )
}

/// HTML page with status
pub(crate) fn html(status: StatusCode, body: String) -> Response {
    warp::reply::with_status(warp::reply::html(body), status).into_response()
}

/// Temporary redirect to `location`
pub(crate) fn redirect(location: &str) -> Response {
    match location.parse::<Uri>() {
        Ok(uri) => warp::redirect::temporary(uri).into_response(),
        Err(e) => {
            tracing::error!(location, error = %e, "invalid redirect target");
            error(StatusCode::INTERNAL_SERVER_ERROR, "invalid redirect target")
        }
    }
}
