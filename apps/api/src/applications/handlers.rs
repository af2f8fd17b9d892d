use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::applications::submission::{read_application_form, submit_application};
use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationStatus, ApplicationWithJob, StatusUpdate,
};
use crate::session::{AdminUser, CurrentUser};
use crate::state::AppState;
use crate::validation::{parse_id, ValidJson};

#[derive(Debug, Deserialize)]
pub struct ApplicationIdQuery {
    pub id: Option<String>,
}

impl ApplicationIdQuery {
    fn optional_id(&self) -> Result<Option<i32>, AppError> {
        self.id
            .as_deref()
            .map(|raw| parse_id(raw, "application"))
            .transpose()
    }

    fn required_id(&self) -> Result<i32, AppError> {
        self.optional_id()?
            .ok_or_else(|| AppError::Validation("Application id is required".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub application: Application,
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}

/// POST /applications/:job_id
pub async fn handle_submit_application(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let job_id = parse_id(&job_id, "job")?;
    let multipart = multipart.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let form = read_application_form(multipart, state.config.max_resume_bytes).await?;
    let application = submit_application(
        state.jobs.as_ref(),
        state.applications.as_ref(),
        state.resumes.as_ref(),
        job_id,
        &user,
        form,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            application,
        }),
    ))
}

/// GET /applications
///
/// With `?id=` returns that single application, otherwise all of them.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ApplicationIdQuery>,
) -> Result<Response, AppError> {
    match query.optional_id()? {
        Some(id) => {
            let application = state.applications.find(id).await?.ok_or_else(|| not_found(id))?;
            Ok(Json(application).into_response())
        }
        None => Ok(Json(state.applications.list().await?).into_response()),
    }
}

/// PATCH /applications?id=
pub async fn handle_review_application(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(query): Query<ApplicationIdQuery>,
    ValidJson(update): ValidJson<StatusUpdate>,
) -> Result<Json<Application>, AppError> {
    let id = query.required_id()?;
    let next = ApplicationStatus::from(update.status);

    let current = state.applications.find(id).await?.ok_or_else(|| not_found(id))?;
    if !current.status.can_transition_to(next) {
        return Err(AppError::Validation(format!(
            "Cannot move application from {:?} to {:?}",
            current.status, next
        )));
    }

    let updated = state
        .applications
        .set_status(id, next)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(application_id = id, admin_id = admin.id, status = ?next, "Application reviewed");
    Ok(Json(updated))
}

/// DELETE /applications?id=
pub async fn handle_delete_application(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(query): Query<ApplicationIdQuery>,
) -> Result<Json<Application>, AppError> {
    let id = query.required_id()?;
    let deleted = state
        .applications
        .delete(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(application_id = id, admin_id = admin.id, "Deleted application");
    Ok(Json(deleted))
}

/// GET /applications/user
pub async fn handle_my_applications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    Ok(Json(state.applications.list_for_user(user.id).await?))
}
