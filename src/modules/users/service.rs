use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{User, UserFilterParams, UserRole, UserStatus};
use crate::utils::errors::AppError;

const USER_COLUMNS: &str =
    "id, name, email, role, status, last_login, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    #[instrument(skip(db))]
    pub async fn list_users(
        db: &PgPool,
        filter: UserFilterParams,
    ) -> Result<Vec<User>, AppError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::user_status IS NULL OR status = $2)
             ORDER BY name"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(filter.role)
            .bind(filter.status)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    /// Active teachers, for the compose-message recipient picker.
    #[instrument(skip(db))]
    pub async fn list_active_teachers(db: &PgPool) -> Result<Vec<User>, AppError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role = $1 AND status = $2
             ORDER BY name"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(UserRole::Teacher)
            .bind(UserStatus::Active)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    /// Cheap existence probe used before addressing a message or
    /// notification at a user.
    #[instrument(skip(db))]
    pub async fn exists(db: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?;

        Ok(found.is_some())
    }
}
