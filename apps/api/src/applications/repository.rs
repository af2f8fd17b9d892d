use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationStatus, ApplicationWithJob, NewApplication,
};
use crate::models::job::Job;

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Inserts with status `pending`.
    async fn create(&self, application: NewApplication) -> Result<Application, AppError>;
    async fn list(&self) -> Result<Vec<Application>, AppError>;
    async fn find(&self, id: i32) -> Result<Option<Application>, AppError>;
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<ApplicationWithJob>, AppError>;
    /// Unconditional write; concurrent updates resolve last-write-wins.
    async fn set_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError>;
    async fn delete(&self, id: i32) -> Result<Option<Application>, AppError>;
}

pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn create(&self, application: NewApplication) -> Result<Application, AppError> {
        Ok(sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications
                (user_name, email, cover_letter, resume, status, job_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&application.user_name)
        .bind(&application.email)
        .bind(&application.cover_letter)
        .bind(&application.resume)
        .bind(ApplicationStatus::Pending)
        .bind(application.job_id)
        .bind(application.user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list(&self) -> Result<Vec<Application>, AppError> {
        Ok(
            sqlx::query_as::<_, Application>("SELECT * FROM applications ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find(&self, id: i32) -> Result<Option<Application>, AppError> {
        Ok(
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<ApplicationWithJob>, AppError> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let job_ids: Vec<i32> = applications.iter().map(|a| a.job_id).collect();
        let jobs: HashMap<i32, Job> =
            sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ANY($1)")
                .bind(&job_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|job| (job.id, job))
                .collect();

        Ok(attach_jobs(applications, &jobs))
    }

    async fn set_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        Ok(sqlx::query_as::<_, Application>(
            "UPDATE applications SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, id: i32) -> Result<Option<Application>, AppError> {
        Ok(
            sqlx::query_as::<_, Application>("DELETE FROM applications WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

/// Pairs each application with its job. Applications whose job vanished are dropped.
pub fn attach_jobs(
    applications: Vec<Application>,
    jobs: &HashMap<i32, Job>,
) -> Vec<ApplicationWithJob> {
    applications
        .into_iter()
        .filter_map(|application| {
            let job = jobs.get(&application.job_id)?.clone();
            Some(ApplicationWithJob { application, job })
        })
        .collect()
}
