//! Session-gated section pages and the sign-in page

use super::with_state;
use crate::render::{self, SectionData};
use crate::reply;
use crate::state::AppState;
use futures::future::join_all;
use minivault_core::{GateView, Navigator, Section, SessionGate, SIGN_IN_ROUTE};
use minivault_fetch::FetchCache;
use parking_lot::Mutex;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection};

/// Cookie carrying the identity provider's session token
pub const SESSION_COOKIE: &str = "next-auth.session-token";

/// Records the gate's navigation so it can become an HTTP redirect
#[derive(Debug, Default)]
struct RedirectCapture {
    target: Mutex<Option<String>>,
}

impl RedirectCapture {
    fn take(&self) -> Option<String> {
        self.target.lock().take()
    }
}

impl Navigator for RedirectCapture {
    fn navigate(&self, route: &str) {
        *self.target.lock() = Some(route.to_string());
    }
}

pub(crate) fn routes(state: AppState) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let sign_in = warp::path!("auth" / "signin")
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: AppState| {
            reply::html(
                StatusCode::OK,
                render::sign_in_page(&state.project, &state.providers, &state.auth_url),
            )
        });

    let overview = warp::path::end()
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(with_state(state.clone()))
        .then(|token: Option<String>, state: AppState| {
            render_section(Section::Overview, token, state)
        });

    let section = warp::path::param::<String>()
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(with_state(state))
        .and_then(|slug: String, token: Option<String>, state: AppState| async move {
            let section: Section = slug.parse().map_err(|_| warp::reject::not_found())?;
            Ok::<_, Rejection>(render_section(section, token, state).await)
        });

    sign_in.or(overview).unify().or(section).unify()
}

async fn render_section(section: Section, token: Option<String>, state: AppState) -> Response {
    let session = state.sessions.resolve(token.as_deref()).await;
    let route = section.route();

    let mut gate = SessionGate::new(RedirectCapture::default());
    let view = gate.evaluate(&session, &route);
    tracing::debug!(section = %section, session = session.label(), ?view, "gate evaluated");

    match (view, session.user()) {
        (GateView::Content, Some(user)) => {
            let data = load_section_data(&state.fetch, section).await;
            reply::html(
                StatusCode::OK,
                render::section_page(&state.project, section, user, &data),
            )
        }
        (GateView::Placeholder, _) => {
            reply::html(StatusCode::OK, render::placeholder(&state.project, section))
        }
        _ => {
            let target = gate
                .into_navigator()
                .take()
                .unwrap_or_else(|| SIGN_IN_ROUTE.to_string());
            reply::redirect(&target)
        }
    }
}

async fn load_section_data(fetch: &FetchCache, section: Section) -> SectionData {
    join_all(section.resources().iter().map(|&resource| async move {
        let result = match fetch.get(resource).await {
            Ok(value) => Ok(value),
            Err(e) => match fetch.peek(resource).await {
                Some(previous) => Ok(previous.value),
                None => Err(e.to_string()),
            },
        };
        (resource, result)
    }))
    .await
}
