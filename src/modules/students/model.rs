use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A student record. Each student is owned by exactly one parent account;
/// deleting related records never cascades from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub grade: String,
    pub student_code: String,
    pub parent_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "grade must not be empty"))]
    pub grade: String,
    #[validate(length(min = 1, message = "student_code must not be empty"))]
    pub student_code: String,
    /// Admins may enroll a student under any parent; parents always enroll
    /// under themselves and this field is ignored for them.
    pub parent_id: Option<Uuid>,
}
