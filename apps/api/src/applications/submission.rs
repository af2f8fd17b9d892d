//! Application submission: multipart form → resume upload → pending record.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use tracing::{info, warn};
use validator::Validate;

use crate::applications::repository::ApplicationRepository;
use crate::errors::AppError;
use crate::jobs::repository::JobRepository;
use crate::models::application::{Application, NewApplication};
use crate::session::SessionUser;
use crate::storage::{ResumeFile, ResumeStore};

const MISSING_FIELDS: &str = "All fields are required";

#[derive(Debug, Clone, Validate)]
pub struct ApplicantDetails {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Cover letter is required"))]
    pub cover_letter: String,
}

#[derive(Debug, Clone)]
pub struct ApplicationForm {
    pub details: ApplicantDetails,
    pub resume: ResumeFile,
}

/// Raw multipart fields before the all-or-nothing presence check.
#[derive(Debug, Default)]
struct FormParts {
    full_name: Option<String>,
    email: Option<String>,
    cover_letter: Option<String>,
    resume: Option<ResumeFile>,
}

impl FormParts {
    /// Blank text fields and an empty file count as missing.
    fn complete(self) -> Result<ApplicationForm, AppError> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        match (
            present(self.full_name),
            present(self.email),
            present(self.cover_letter),
            self.resume.filter(|file| !file.bytes.is_empty()),
        ) {
            (Some(full_name), Some(email), Some(cover_letter), Some(resume)) => {
                let details = ApplicantDetails {
                    full_name: full_name.trim().to_string(),
                    email: email.trim().to_string(),
                    cover_letter,
                };
                details.validate()?;
                Ok(ApplicationForm { details, resume })
            }
            _ => Err(AppError::Validation(MISSING_FIELDS.to_string())),
        }
    }
}

/// Reads `fullName`, `email`, `coverLetter` and the `resume` file. Unknown fields are skipped.
///
/// A `resume` part only counts when it carries a file name; a plain text part
/// under that name is ignored and the form then fails the presence check.
pub async fn read_application_form(
    mut multipart: Multipart,
    max_resume_bytes: usize,
) -> Result<ApplicationForm, AppError> {
    let mut parts = FormParts::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_resume_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "fullName" => parts.full_name = Some(field_text(field, max_resume_bytes).await?),
            "email" => parts.email = Some(field_text(field, max_resume_bytes).await?),
            "coverLetter" => {
                parts.cover_letter = Some(field_text(field, max_resume_bytes).await?)
            }
            "resume" => {
                let Some(file_name) = field
                    .file_name()
                    .filter(|name| !name.trim().is_empty())
                    .map(str::to_string)
                else {
                    continue;
                };
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_resume_bytes))?;
                parts.resume = Some(ResumeFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    parts.complete()
}

async fn field_text(
    field: axum::extract::multipart::Field<'_>,
    max_resume_bytes: usize,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| multipart_error(e, max_resume_bytes))
}

/// Body-limit overruns surface as 413 from the multipart reader.
fn multipart_error(err: MultipartError, max_resume_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(format!("Resume exceeds {max_resume_bytes} bytes"))
    } else {
        AppError::Validation(err.body_text())
    }
}

/// Checks the job, uploads the resume, then records the application as `pending`.
///
/// The upload happens before the insert. If the insert then fails the stored
/// object is left behind; it is logged, not removed.
pub async fn submit_application(
    jobs: &dyn JobRepository,
    applications: &dyn ApplicationRepository,
    resumes: &dyn ResumeStore,
    job_id: i32,
    applicant: &SessionUser,
    form: ApplicationForm,
) -> Result<Application, AppError> {
    if jobs.find(job_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    let resume_url = resumes.upload(job_id, &form.resume).await?;

    let ApplicantDetails {
        full_name,
        email,
        cover_letter,
    } = form.details;
    let created = applications
        .create(NewApplication {
            user_name: full_name,
            email,
            cover_letter,
            resume: resume_url.clone(),
            job_id,
            user_id: applicant.id,
        })
        .await;

    match created {
        Ok(application) => {
            info!(
                application_id = application.id,
                job_id,
                user_id = applicant.id,
                "Application submitted"
            );
            Ok(application)
        }
        Err(e) => {
            warn!(%resume_url, job_id, "Application insert failed after upload; resume left in storage");
            Err(e)
        }
    }
}
