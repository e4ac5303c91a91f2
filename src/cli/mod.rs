//! Maintenance commands dispatched from the binary's argument list:
//! `create-admin`, `seed`, and `purge`.

pub mod seeder;

use sqlx::PgPool;

use crate::modules::messages::service::MessageService;
use crate::modules::notifications::service::NotificationService;
use crate::modules::users::model::UserRole;
use crate::utils::password::hash_password;

pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(name)
    .bind(email.to_lowercase())
    .bind(hashed_password)
    .bind(UserRole::Admin)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    Ok(())
}

/// Drops expired notifications and messages both sides have deleted.
///
/// This is the only place hard deletion happens; request handlers never
/// trigger it.
pub async fn purge(db: &PgPool) -> Result<(u64, u64), Box<dyn std::error::Error>> {
    let notifications = NotificationService::purge_expired(db)
        .await
        .map_err(|e| e.error.to_string())?;
    let messages = MessageService::purge_removed(db)
        .await
        .map_err(|e| e.error.to_string())?;

    Ok((notifications, messages))
}
