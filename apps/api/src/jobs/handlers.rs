//! Axum route handlers for job postings.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{Job, JobInput};
use crate::session::{AdminUser, CurrentUser};
use crate::state::AppState;
use crate::validation::{parse_id, ValidJson};

/// GET /jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.jobs.list().await?))
}

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidJson(input): ValidJson<JobInput>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = state.jobs.create(&input, admin.id).await?;
    info!(job_id = job.id, admin_id = admin.id, "Created job");
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let id = parse_id(&id, "job")?;
    let job = state
        .jobs
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// PATCH /jobs/:id
///
/// Replaces every editable field; the body uses the same schema as create.
pub async fn handle_update_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<JobInput>,
) -> Result<Json<Job>, AppError> {
    let id = parse_id(&id, "job")?;
    let job = state
        .jobs
        .update(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    info!(job_id = id, admin_id = admin.id, "Updated job");
    Ok(Json(job))
}

/// DELETE /jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let id = parse_id(&id, "job")?;
    let job = state
        .jobs
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    info!(job_id = id, admin_id = admin.id, "Deleted job");
    Ok(Json(job))
}
