pub mod health;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::jobs::handlers as jobs;
use crate::session::gate::role_gate;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let resume_limit = DefaultBodyLimit::max(state.config.max_resume_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/login", get(pages::login).post(auth::handle_login))
        .route("/register", post(auth::handle_register))
        .route("/logout", post(auth::handle_logout))
        .route("/session", get(auth::handle_session))
        // Jobs API
        .route(
            "/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/jobs/:id",
            get(jobs::handle_get_job)
                .patch(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Applications API
        .route(
            "/applications",
            get(applications::handle_list_applications)
                .patch(applications::handle_review_application)
                .delete(applications::handle_delete_application),
        )
        .route(
            "/applications/user",
            get(applications::handle_my_applications),
        )
        .route(
            "/applications/:job_id",
            post(applications::handle_submit_application).layer(resume_limit),
        )
        // Pages
        .route("/", get(pages::home))
        .route("/signup", get(pages::signup))
        .route("/dashboard", get(pages::admin_dashboard))
        .route("/addjobs", get(pages::add_job))
        .route("/editjobs/:id", get(pages::edit_job))
        .route("/seeapplication", get(pages::review_applications))
        .route("/user-dashboard", get(pages::user_dashboard))
        .route("/alljobs", get(pages::browse_jobs))
        .route("/alljobs/:id", get(pages::apply_to_job))
        .layer(from_fn_with_state(state.clone(), role_gate))
        .with_state(state)
}
