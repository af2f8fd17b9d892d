use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub salary: f64,
    pub posted_by_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Editable job fields, shared by create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(range(exclusive_min = 0.0, message = "Salary must be positive"))]
    pub salary: f64,
}
