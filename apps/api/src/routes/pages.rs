//! Page shells. The browser client mounts into `#app`; these exist so the role
//! gate has real page routes to guard.

use axum::{extract::Path, response::Html};

use crate::errors::AppError;
use crate::validation::parse_id;

fn shell(page: &str, title: &str, entity_id: Option<i32>) -> Html<String> {
    let id_attr = entity_id
        .map(|id| format!(" data-id=\"{id}\""))
        .unwrap_or_default();
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} | Job Board</title></head>\n<body><main id=\"app\" data-page=\"{page}\"{id_attr}><h1>{title}</h1></main></body>\n</html>\n"
    ))
}

pub async fn home() -> Html<String> {
    shell("home", "Job Board", None)
}

pub async fn login() -> Html<String> {
    shell("login", "Log in", None)
}

pub async fn signup() -> Html<String> {
    shell("signup", "Sign up", None)
}

pub async fn admin_dashboard() -> Html<String> {
    shell("dashboard", "Admin dashboard", None)
}

pub async fn add_job() -> Html<String> {
    shell("addjobs", "Post a job", None)
}

pub async fn edit_job(Path(id): Path<String>) -> Result<Html<String>, AppError> {
    Ok(shell("editjobs", "Edit job", Some(parse_id(&id, "job")?)))
}

pub async fn review_applications() -> Html<String> {
    shell("seeapplication", "Applications", None)
}

pub async fn user_dashboard() -> Html<String> {
    shell("user-dashboard", "My dashboard", None)
}

pub async fn browse_jobs() -> Html<String> {
    shell("alljobs", "Open positions", None)
}

pub async fn apply_to_job(Path(id): Path<String>) -> Result<Html<String>, AppError> {
    Ok(shell("alljobs", "Apply", Some(parse_id(&id, "job")?)))
}
