use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::job::{Job, JobInput};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Job>, AppError>;
    async fn find(&self, id: i32) -> Result<Option<Job>, AppError>;
    async fn create(&self, input: &JobInput, posted_by_id: i32) -> Result<Job, AppError>;
    /// Returns `None` when no job has this id.
    async fn update(&self, id: i32, input: &JobInput) -> Result<Option<Job>, AppError>;
    /// Returns the deleted job, or `None` when no job has this id.
    async fn delete(&self, id: i32) -> Result<Option<Job>, AppError>;
}

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn list(&self) -> Result<Vec<Job>, AppError> {
        Ok(sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find(&self, id: i32) -> Result<Option<Job>, AppError> {
        Ok(sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, input: &JobInput, posted_by_id: i32) -> Result<Job, AppError> {
        Ok(sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, description, category, location, salary, posted_by_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.location)
        .bind(input.salary)
        .bind(posted_by_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update(&self, id: i32, input: &JobInput) -> Result<Option<Job>, AppError> {
        Ok(sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET title = $1, description = $2, category = $3, location = $4, salary = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.location)
        .bind(input.salary)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, id: i32) -> Result<Option<Job>, AppError> {
        Ok(
            sqlx::query_as::<_, Job>("DELETE FROM jobs WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}
