//! Role gate for page routes.
//!
//! Protected pages fall into two disjoint groups. A request for either group
//! without a session goes to the login page; a request for the other role's
//! group goes to the caller's own landing page. Everything else passes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::models::user::Role;
use crate::session::SessionUser;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

const ADMIN_ROUTES: &[&str] = &["/dashboard", "/addjobs", "/seeapplication", "/editjobs"];
const USER_ROUTES: &[&str] = &["/user-dashboard", "/alljobs"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(&'static str),
}

/// Role a path is reserved for, if any.
pub fn required_role(path: &str) -> Option<Role> {
    if ADMIN_ROUTES.iter().any(|p| matches_prefix(path, p)) {
        Some(Role::Admin)
    } else if USER_ROUTES.iter().any(|p| matches_prefix(path, p)) {
        Some(Role::User)
    } else {
        None
    }
}

pub fn decide(path: &str, session: Option<&SessionUser>) -> GateDecision {
    let Some(required) = required_role(path) else {
        return GateDecision::Pass;
    };
    match session {
        None => GateDecision::Redirect(LOGIN_PATH),
        Some(user) if user.role == required => GateDecision::Pass,
        Some(user) => GateDecision::Redirect(user.role.landing_path()),
    }
}

// Segment-aware: "/alljobs/3" matches "/alljobs", "/alljobsx" does not.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Router-wide middleware. Only decrypts the cookie for protected paths.
pub async fn role_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if required_role(path).is_none() {
        return next.run(request).await;
    }

    let session = state.sessions.read(request.headers());
    match decide(path, session.as_ref()) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::Redirect(target) => {
            debug!(path = %request.uri().path(), target, "role gate redirect");
            Redirect::temporary(target).into_response()
        }
    }
}
