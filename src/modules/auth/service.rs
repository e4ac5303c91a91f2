use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, UserRole, UserStatus};
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_reset_token, verify_reset_token};
use crate::utils::password::{hash_password, verify_password};

use super::model::{
    AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
};

const USER_COLUMNS: &str =
    "id, name, email, role, status, last_login, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    id: Uuid,
    name: String,
    email: String,
    role: UserRole,
    status: UserStatus,
    password: String,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn register_user(
        db: &PgPool,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        // Emails are compared case-insensitively by storing them lowercased.
        let email = dto.email.to_lowercase();
        let hashed_password = hash_password(&dto.password)?;

        let query = format!(
            "INSERT INTO users (name, email, password, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(&dto.name)
            .bind(&email)
            .bind(&hashed_password)
            .bind(dto.role)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::conflict("A user with this email already exists");
                    }
                }
                AppError::database(e)
            })?;

        let access_token = create_access_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(AuthResponse { user, access_token })
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let email = dto.email.to_lowercase();

        let user_with_password = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, name, email, role, status, password FROM users WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !verify_password(&dto.password, &user_with_password.password)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        if user_with_password.status == UserStatus::Suspended {
            return Err(AppError::forbidden("This account has been suspended"));
        }

        let query = format!(
            "UPDATE users SET last_login = now(), updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_with_password.id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;

        let access_token = create_access_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(AuthResponse { user, access_token })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        let existing = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, name, email, role, status, password FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        let name = dto.name.unwrap_or(existing.name);
        let email = dto
            .email
            .map(|e| e.to_lowercase())
            .unwrap_or(existing.email);

        // A password change requires the current password to check out.
        let password = match (dto.current_password, dto.new_password) {
            (Some(current), Some(new)) => {
                if !verify_password(&current, &existing.password)? {
                    return Err(AppError::unauthorized("Current password is incorrect"));
                }
                hash_password(&new)?
            }
            (None, Some(_)) => {
                return Err(AppError::bad_request(
                    "current_password is required to change the password",
                ));
            }
            _ => existing.password,
        };

        let query = format!(
            "UPDATE users SET name = $1, email = $2, password = $3, updated_at = now()
             WHERE id = $4
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&name)
            .bind(&email)
            .bind(&password)
            .bind(user_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::conflict("A user with this email already exists");
                    }
                }
                AppError::database(e)
            })
    }

    /// Issues a reset token for the address if it belongs to a user. The
    /// caller answers identically either way, so the endpoint does not
    /// reveal which addresses are registered.
    #[instrument(skip(db, jwt_config))]
    pub async fn forgot_password(
        db: &PgPool,
        email: &str,
        jwt_config: &JwtConfig,
    ) -> Result<Option<(User, String)>, AppError> {
        let email = email.to_lowercase();
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(&email)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?;

        match user {
            Some(user) => {
                let token = create_reset_token(user.id, &user.email, jwt_config)?;
                Ok(Some((user, token)))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn reset_password(
        db: &PgPool,
        dto: ResetPasswordRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(), AppError> {
        let claims = verify_reset_token(&dto.token, jwt_config)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired reset token"))?;

        let hashed = hash_password(&dto.new_password)?;

        let result = sqlx::query(
            "UPDATE users SET password = $1, updated_at = now() WHERE id = $2",
        )
        .bind(&hashed)
        .bind(user_id)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::unauthorized("Invalid or expired reset token"));
        }

        Ok(())
    }
}
