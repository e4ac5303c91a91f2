//! Notification read-state engine.
//!
//! Mark-read and delete are keyed by (id, user_id) in a single statement,
//! so ownership and existence collapse into one lookup and a caller can
//! never distinguish "someone else's notification" from "no such
//! notification".

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::notifications::model::{
    CreateNotificationRequest, NotificationKind, NotificationPriority, NotificationWithSender,
};
use crate::utils::errors::AppError;

const WITH_SENDER_COLUMNS: &str = "n.id, n.user_id, n.sender_id, u.name AS sender_name, \
     u.role AS sender_role, n.title, n.body, n.kind, n.priority, n.read, n.link, \
     n.expires_at, n.created_at";

pub struct NotificationService;

impl NotificationService {
    #[instrument(skip(db, dto))]
    pub async fn create_notification(
        db: &PgPool,
        sender_id: Uuid,
        dto: CreateNotificationRequest,
    ) -> Result<NotificationWithSender, AppError> {
        let target: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(dto.user_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?;

        if target.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let (notification_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO notifications (user_id, sender_id, title, body, kind, priority, link, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, now() + interval '30 days'))
             RETURNING id",
        )
        .bind(dto.user_id)
        .bind(sender_id)
        .bind(&dto.title)
        .bind(&dto.body)
        .bind(dto.kind)
        .bind(dto.priority)
        .bind(&dto.link)
        .bind(dto.expires_at)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        let query = format!(
            "SELECT {WITH_SENDER_COLUMNS}
             FROM notifications n
             JOIN users u ON u.id = n.sender_id
             WHERE n.id = $1"
        );

        sqlx::query_as::<_, NotificationWithSender>(&query)
            .bind(notification_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_notifications(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<NotificationWithSender>, AppError> {
        let query = format!(
            "SELECT {WITH_SENDER_COLUMNS}
             FROM notifications n
             JOIN users u ON u.id = n.sender_id
             WHERE n.user_id = $1
             ORDER BY n.created_at DESC"
        );

        sqlx::query_as::<_, NotificationWithSender>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_by_kind(
        db: &PgPool,
        user_id: Uuid,
        kind: NotificationKind,
    ) -> Result<Vec<NotificationWithSender>, AppError> {
        let query = format!(
            "SELECT {WITH_SENDER_COLUMNS}
             FROM notifications n
             JOIN users u ON u.id = n.sender_id
             WHERE n.user_id = $1 AND n.kind = $2
             ORDER BY n.created_at DESC"
        );

        sqlx::query_as::<_, NotificationWithSender>(&query)
            .bind(user_id)
            .bind(kind)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_by_priority(
        db: &PgPool,
        user_id: Uuid,
        priority: NotificationPriority,
    ) -> Result<Vec<NotificationWithSender>, AppError> {
        let query = format!(
            "SELECT {WITH_SENDER_COLUMNS}
             FROM notifications n
             JOIN users u ON u.id = n.sender_id
             WHERE n.user_id = $1 AND n.priority = $2
             ORDER BY n.created_at DESC"
        );

        sqlx::query_as::<_, NotificationWithSender>(&query)
            .bind(user_id)
            .bind(priority)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn mark_read(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Notification not found"));
        }

        Ok(())
    }

    /// Bulk flip. Idempotent: a second call affects zero rows.
    #[instrument(skip(db))]
    pub async fn mark_all_read(db: &PgPool, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read",
        )
        .bind(user_id)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(db))]
    pub async fn delete_notification(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Notification not found"));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn unread_count(db: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(count)
    }

    /// Maintenance: drops every notification past its expiry. Runs with no
    /// ordering guarantee relative to concurrent reads.
    #[instrument(skip(db))]
    pub async fn purge_expired(db: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE expires_at IS NOT NULL AND expires_at < now()",
        )
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(result.rows_affected())
    }
}
