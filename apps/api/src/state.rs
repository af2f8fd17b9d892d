use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::applications::repository::ApplicationRepository;
use crate::auth::users::UserRepository;
use crate::config::Config;
use crate::jobs::repository::JobRepository;
use crate::session::SessionCodec;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub resumes: Arc<dyn ResumeStore>,
    pub sessions: SessionCodec,
    pub config: Config,
}

/// Lets handlers take a `PrivateCookieJar` directly.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.key().clone()
    }
}
