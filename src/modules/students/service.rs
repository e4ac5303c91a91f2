use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::students::model::Student;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn create_student(
        db: &PgPool,
        name: &str,
        grade: &str,
        student_code: &str,
        parent_id: Uuid,
    ) -> Result<Student, AppError> {
        let parent_role: Option<(UserRole,)> =
            sqlx::query_as("SELECT role FROM users WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(db)
                .await
                .map_err(AppError::database)?;

        match parent_role {
            None => return Err(AppError::not_found("Parent not found")),
            Some((role,)) if role != UserRole::Parent => {
                return Err(AppError::bad_request(
                    "parent_id must reference a parent account",
                ));
            }
            _ => {}
        }

        sqlx::query_as::<_, Student>(
            "INSERT INTO students (name, grade, student_code, parent_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, grade, student_code, parent_id, created_at",
        )
        .bind(name)
        .bind(grade)
        .bind(student_code)
        .bind(parent_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "A student with ID {} already exists",
                        student_code
                    ));
                }
            }
            AppError::database(e)
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            "SELECT id, name, grade, student_code, parent_id, created_at
             FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found("Student not found"))
    }

    #[instrument(skip(db))]
    pub async fn list_children(db: &PgPool, parent_id: Uuid) -> Result<Vec<Student>, AppError> {
        sqlx::query_as::<_, Student>(
            "SELECT id, name, grade, student_code, parent_id, created_at
             FROM students WHERE parent_id = $1
             ORDER BY name",
        )
        .bind(parent_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_all(db: &PgPool) -> Result<Vec<Student>, AppError> {
        sqlx::query_as::<_, Student>(
            "SELECT id, name, grade, student_code, parent_id, created_at
             FROM students
             ORDER BY name",
        )
        .fetch_all(db)
        .await
        .map_err(AppError::database)
    }

    /// Gate for everything that exposes a student's records.
    ///
    /// Parents see only their own children; teachers and admins are
    /// unrestricted. Failure is always 403, never 404, so a parent cannot
    /// probe which student ids exist.
    #[instrument(skip(db, auth_user))]
    pub async fn can_view_student(
        db: &PgPool,
        auth_user: &AuthUser,
        student_id: Uuid,
    ) -> Result<(), AppError> {
        if auth_user.is_staff() {
            return Ok(());
        }

        let owned: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM students WHERE id = $1 AND parent_id = $2")
                .bind(student_id)
                .bind(auth_user.user_id()?)
                .fetch_optional(db)
                .await
                .map_err(AppError::database)?;

        if owned.is_none() {
            return Err(AppError::forbidden(
                "Not authorized to view this student's records",
            ));
        }

        Ok(())
    }
}
