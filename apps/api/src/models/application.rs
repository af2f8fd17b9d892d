use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::job::Job;

/// Review state of an application. Stored as the `application_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Every state can move to `accepted` or `rejected`; nothing returns to `pending`.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        !matches!(next, ApplicationStatus::Pending)
    }
}

/// The only statuses an admin may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Accepted,
    Rejected,
}

impl From<ReviewDecision> for ApplicationStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Accepted => ApplicationStatus::Accepted,
            ReviewDecision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdate {
    pub status: ReviewDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub cover_letter: String,
    pub resume: String,
    pub status: ApplicationStatus,
    pub job_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

/// An application about to be inserted. Status always starts at `pending`.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_name: String,
    pub email: String,
    pub cover_letter: String,
    pub resume: String,
    pub job_id: i32,
    pub user_id: i32,
}

/// An applicant's own view of a submission, with the job it targets.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Job,
}
