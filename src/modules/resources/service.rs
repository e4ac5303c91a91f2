//! Resource library.
//!
//! The download counter and the rating average are the two aggregates the
//! store maintains in single statements (`downloads + 1`, `AVG(rating)`
//! recomputed from the ratings table), so concurrent writers cannot lose
//! increments the way a read-modify-write cycle would.

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::resources::model::{
    CreateResourceRequest, Resource, ResourceCategory, ResourceWithUploader,
    UpdateResourceRequest,
};
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

const RESOURCE_COLUMNS: &str = "id, title, description, category, subject, grade, file_url, \
     file_type, file_size, uploaded_by, downloads, average_rating, status, created_at, \
     updated_at";

const WITH_UPLOADER_COLUMNS: &str = "r.id, r.title, r.description, r.category, r.subject, \
     r.grade, r.file_url, r.file_type, r.file_size, r.uploaded_by, u.name AS uploader_name, \
     u.role AS uploader_role, r.downloads, r.average_rating, r.status, r.created_at";

pub struct ResourceService;

impl ResourceService {
    #[instrument(skip(db, dto))]
    pub async fn create_resource(
        db: &PgPool,
        uploaded_by: Uuid,
        dto: CreateResourceRequest,
    ) -> Result<Resource, AppError> {
        let query = format!(
            "INSERT INTO resources
                 (title, description, category, subject, grade, file_url, file_type,
                  file_size, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {RESOURCE_COLUMNS}"
        );

        sqlx::query_as::<_, Resource>(&query)
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(dto.category)
            .bind(&dto.subject)
            .bind(&dto.grade)
            .bind(&dto.file_url)
            .bind(&dto.file_type)
            .bind(dto.file_size)
            .bind(uploaded_by)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_resources(db: &PgPool) -> Result<Vec<ResourceWithUploader>, AppError> {
        let query = format!(
            "SELECT {WITH_UPLOADER_COLUMNS}
             FROM resources r
             JOIN users u ON u.id = r.uploaded_by
             WHERE r.status = 'active'
             ORDER BY r.created_at DESC"
        );

        sqlx::query_as::<_, ResourceWithUploader>(&query)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_by_category(
        db: &PgPool,
        category: ResourceCategory,
    ) -> Result<Vec<ResourceWithUploader>, AppError> {
        let query = format!(
            "SELECT {WITH_UPLOADER_COLUMNS}
             FROM resources r
             JOIN users u ON u.id = r.uploaded_by
             WHERE r.status = 'active' AND r.category = $1
             ORDER BY r.created_at DESC"
        );

        sqlx::query_as::<_, ResourceWithUploader>(&query)
            .bind(category)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_resource(db: &PgPool, id: Uuid) -> Result<ResourceWithUploader, AppError> {
        let query = format!(
            "SELECT {WITH_UPLOADER_COLUMNS}
             FROM resources r
             JOIN users u ON u.id = r.uploaded_by
             WHERE r.id = $1"
        );

        sqlx::query_as::<_, ResourceWithUploader>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Resource not found"))
    }

    /// Case-insensitive substring search over title, description and
    /// subject.
    #[instrument(skip(db))]
    pub async fn search_resources(
        db: &PgPool,
        raw_query: &str,
    ) -> Result<Vec<ResourceWithUploader>, AppError> {
        let pattern = format!(
            "%{}%",
            raw_query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
        );

        let query = format!(
            "SELECT {WITH_UPLOADER_COLUMNS}
             FROM resources r
             JOIN users u ON u.id = r.uploaded_by
             WHERE r.status = 'active'
               AND (r.title ILIKE $1 OR r.description ILIKE $1 OR r.subject ILIKE $1)
             ORDER BY r.created_at DESC"
        );

        sqlx::query_as::<_, ResourceWithUploader>(&query)
            .bind(&pattern)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    /// Ten most downloaded active resources.
    #[instrument(skip(db))]
    pub async fn popular_resources(db: &PgPool) -> Result<Vec<ResourceWithUploader>, AppError> {
        let query = format!(
            "SELECT {WITH_UPLOADER_COLUMNS}
             FROM resources r
             JOIN users u ON u.id = r.uploaded_by
             WHERE r.status = 'active'
             ORDER BY r.downloads DESC
             LIMIT 10"
        );

        sqlx::query_as::<_, ResourceWithUploader>(&query)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_resource(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        user_role: UserRole,
        dto: UpdateResourceRequest,
    ) -> Result<Resource, AppError> {
        let existing = Self::get_resource(db, id).await?;
        Self::authorize_owner_or_admin(&existing.uploaded_by, user_id, user_role, "update")?;

        let query = format!(
            "UPDATE resources
             SET title = $1, description = $2, category = $3, subject = $4, grade = $5,
                 status = $6, updated_at = now()
             WHERE id = $7
             RETURNING {RESOURCE_COLUMNS}"
        );

        sqlx::query_as::<_, Resource>(&query)
            .bind(dto.title.unwrap_or(existing.title))
            .bind(dto.description.unwrap_or(existing.description))
            .bind(dto.category.unwrap_or(existing.category))
            .bind(dto.subject.unwrap_or(existing.subject))
            .bind(dto.grade.unwrap_or(existing.grade))
            .bind(dto.status.unwrap_or(existing.status))
            .bind(id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn delete_resource(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        user_role: UserRole,
    ) -> Result<(), AppError> {
        let existing = Self::get_resource(db, id).await?;
        Self::authorize_owner_or_admin(&existing.uploaded_by, user_id, user_role, "delete")?;

        sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        Ok(())
    }

    /// Bumps the download counter in-store and hands back the file URL.
    #[instrument(skip(db))]
    pub async fn record_download(db: &PgPool, id: Uuid) -> Result<String, AppError> {
        let row: Option<(String,)> = sqlx::query_as(
            "UPDATE resources SET downloads = downloads + 1, updated_at = now()
             WHERE id = $1
             RETURNING file_url",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?;

        row.map(|(file_url,)| file_url)
            .ok_or_else(|| AppError::not_found("Resource not found"))
    }

    /// Upserts the caller's rating and recomputes the average from the
    /// ratings table in the same statement set.
    #[instrument(skip(db, review))]
    pub async fn rate_resource(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        rating: i32,
        review: Option<&str>,
    ) -> Result<Resource, AppError> {
        // Existence check first so an unknown resource is a 404, not an FK
        // violation.
        Self::get_resource(db, id).await?;

        sqlx::query(
            "INSERT INTO ratings (resource_id, user_id, rating, review)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (resource_id, user_id)
             DO UPDATE SET rating = EXCLUDED.rating, review = EXCLUDED.review,
                           created_at = now()",
        )
        .bind(id)
        .bind(user_id)
        .bind(rating)
        .bind(review)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        let query = format!(
            "UPDATE resources
             SET average_rating =
                     (SELECT COALESCE(AVG(rating), 0) FROM ratings WHERE resource_id = $1),
                 updated_at = now()
             WHERE id = $1
             RETURNING {RESOURCE_COLUMNS}"
        );

        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    fn authorize_owner_or_admin(
        owner_id: &Uuid,
        user_id: Uuid,
        user_role: UserRole,
        action: &str,
    ) -> Result<(), AppError> {
        if *owner_id != user_id && user_role != UserRole::Admin {
            return Err(AppError::forbidden(format!(
                "Not authorized to {} this resource",
                action
            )));
        }
        Ok(())
    }
}
