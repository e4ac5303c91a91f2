use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "resource_category", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ResourceCategory {
    StudyMaterials,
    Homework,
    ExamPreparation,
    ExtraLearning,
    VideoLectures,
    Assignments,
}

impl Default for ResourceCategory {
    fn default() -> Self {
        Self::StudyMaterials
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "resource_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ResourceStatus {
    Active,
    Archived,
    UnderReview,
}

/// A learning artifact. The file itself lives elsewhere; this row carries
/// its metadata, tags and aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ResourceCategory,
    pub subject: String,
    pub grade: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by: Uuid,
    pub downloads: i64,
    pub average_rating: f64,
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resource joined with the uploader's name and role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResourceWithUploader {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ResourceCategory,
    pub subject: String,
    pub grade: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by: Uuid,
    pub uploader_name: String,
    pub uploader_role: crate::modules::users::model::UserRole,
    pub downloads: i64,
    pub average_rating: f64,
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rating {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateResourceRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[serde(default)]
    pub category: ResourceCategory,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: String,
    #[validate(length(min = 1, message = "grade must not be empty"))]
    pub grade: String,
    #[validate(url(message = "file_url must be a valid URL"))]
    pub file_url: String,
    #[validate(length(min = 1, message = "file_type must not be empty"))]
    pub file_type: String,
    #[validate(range(min = 0, message = "file_size must not be negative"))]
    #[serde(default)]
    pub file_size: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub category: Option<ResourceCategory>,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: Option<String>,
    #[validate(length(min = 1, message = "grade must not be empty"))]
    pub grade: Option<String>,
    pub status: Option<ResourceStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RateResourceRequest {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadResponse {
    pub download_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ResourceCategory::StudyMaterials).unwrap(),
            "\"study-materials\""
        );
        assert_eq!(
            serde_json::to_string(&ResourceCategory::ExamPreparation).unwrap(),
            "\"exam-preparation\""
        );
    }

    #[test]
    fn rating_bounds() {
        use validator::Validate;

        let ok = RateResourceRequest {
            rating: 5,
            review: None,
        };
        assert!(ok.validate().is_ok());

        let too_high = RateResourceRequest {
            rating: 6,
            review: None,
        };
        assert!(too_high.validate().is_err());

        let too_low = RateResourceRequest {
            rating: 0,
            review: None,
        };
        assert!(too_low.validate().is_err());
    }
}
