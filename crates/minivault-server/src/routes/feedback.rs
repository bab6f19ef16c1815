//! `POST /api/feedback/save`

use super::{with_state, MAX_BODY_BYTES};
use crate::reply;
use crate::state::AppState;
use chrono::Utc;
use minivault_core::FeedbackSubmission;
use serde_json::json;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection};

pub(crate) fn route(state: AppState) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path!("api" / "feedback" / "save")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_state(state))
        .then(save)
}

async fn save(body: Bytes, state: AppState) -> Response {
    let submission: FeedbackSubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!(error = %e, "rejected malformed feedback body");
            return reply::error(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}"));
        }
    };

    let record = match submission.validate(Utc::now().date_naive()) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "rejected feedback");
            return reply::error(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state.feedback.save(&record).await {
        Ok(saved) => reply::json(
            StatusCode::OK,
            &json!({
                "success": true,
                "filename": saved.filename,
                "path": saved.path.display().to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to save feedback");
            reply::error_with_details(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save feedback",
                e.to_string(),
            )
        }
    }
}
