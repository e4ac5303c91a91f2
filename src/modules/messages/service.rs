//! Message read-state engine.
//!
//! Reading a conversation implicitly acknowledges it: the fetch is followed
//! by a bulk flip of the unread flags on the addressed side. The two
//! statements are not transactional; a concurrent reader may observe the
//! gap. That window is part of the contract, matching single-document
//! update semantics, and must not be silently "fixed" here.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::messages::model::{
    ConversationMessage, ConversationSummary, Message, SummaryMessage,
};
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

#[derive(FromRow)]
struct SummaryRow {
    counterpart_id: Uuid,
    counterpart_name: String,
    counterpart_role: UserRole,
    message_id: Uuid,
    sender_id: Uuid,
    content: String,
    read: bool,
    created_at: DateTime<Utc>,
    unread_count: i64,
}

const CONVERSATION_MESSAGE_COLUMNS: &str = "m.id, m.sender_id, su.name AS sender_name, \
     m.receiver_id, ru.name AS receiver_name, m.content, m.read, m.created_at";

pub struct MessageService;

impl MessageService {
    #[instrument(skip(db, content))]
    pub async fn send_message(
        db: &PgPool,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: &str,
    ) -> Result<ConversationMessage, AppError> {
        let receiver: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(receiver_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?;

        if receiver.is_none() {
            return Err(AppError::not_found("Receiver not found"));
        }

        let (message_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO messages (sender_id, receiver_id, content)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        let query = format!(
            "SELECT {CONVERSATION_MESSAGE_COLUMNS}
             FROM messages m
             JOIN users su ON su.id = m.sender_id
             JOIN users ru ON ru.id = m.receiver_id
             WHERE m.id = $1"
        );

        sqlx::query_as::<_, ConversationMessage>(&query)
            .bind(message_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    /// Both directions of a conversation, oldest first, each side filtered
    /// by the viewer's delete flag. Fetching marks every unread message
    /// addressed to the viewer as read.
    #[instrument(skip(db))]
    pub async fn get_conversation(
        db: &PgPool,
        user_id: Uuid,
        other_user_id: Uuid,
    ) -> Result<Vec<ConversationMessage>, AppError> {
        let query = format!(
            "SELECT {CONVERSATION_MESSAGE_COLUMNS}
             FROM messages m
             JOIN users su ON su.id = m.sender_id
             JOIN users ru ON ru.id = m.receiver_id
             WHERE (m.sender_id = $1 AND m.receiver_id = $2 AND NOT m.deleted_by_sender)
                OR (m.sender_id = $2 AND m.receiver_id = $1 AND NOT m.deleted_by_receiver)
             ORDER BY m.created_at ASC, m.id ASC"
        );

        let messages = sqlx::query_as::<_, ConversationMessage>(&query)
            .bind(user_id)
            .bind(other_user_id)
            .fetch_all(db)
            .await
            .map_err(AppError::database)?;

        Self::mark_conversation_read(db, user_id, other_user_id).await?;

        Ok(messages)
    }

    /// Flips read on everything addressed to `user_id` from
    /// `other_user_id`. Idempotent; returns the number of rows flipped.
    #[instrument(skip(db))]
    pub async fn mark_conversation_read(
        db: &PgPool,
        user_id: Uuid,
        other_user_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE messages SET read = TRUE, updated_at = now()
             WHERE sender_id = $1 AND receiver_id = $2 AND NOT read",
        )
        .bind(other_user_id)
        .bind(user_id)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(result.rows_affected())
    }

    /// One summary per counterpart: the latest message still visible to the
    /// viewer plus the unread count from that counterpart. Equal timestamps
    /// are broken by id so "latest" is deterministic.
    #[instrument(skip(db))]
    pub async fn get_conversation_summaries(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ConversationSummary>, AppError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT * FROM (
                 SELECT DISTINCT ON (v.counterpart_id)
                     v.counterpart_id,
                     u.name AS counterpart_name,
                     u.role AS counterpart_role,
                     v.id AS message_id,
                     v.sender_id,
                     v.content,
                     v.read,
                     v.created_at,
                     (SELECT COUNT(*) FROM messages um
                       WHERE um.sender_id = v.counterpart_id
                         AND um.receiver_id = $1
                         AND NOT um.read
                         AND NOT um.deleted_by_receiver) AS unread_count
                 FROM (
                     SELECT m.*,
                            CASE WHEN m.sender_id = $1 THEN m.receiver_id
                                 ELSE m.sender_id END AS counterpart_id
                     FROM messages m
                     WHERE (m.sender_id = $1 AND NOT m.deleted_by_sender)
                        OR (m.receiver_id = $1 AND NOT m.deleted_by_receiver)
                 ) v
                 JOIN users u ON u.id = v.counterpart_id
                 ORDER BY v.counterpart_id, v.created_at DESC, v.id DESC
             ) s
             ORDER BY s.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(rows
            .into_iter()
            .map(|row| ConversationSummary {
                user_id: row.counterpart_id,
                name: row.counterpart_name,
                role: row.counterpart_role,
                unread_count: row.unread_count,
                last_message: SummaryMessage {
                    id: row.message_id,
                    sender_id: row.sender_id,
                    content: row.content,
                    read: row.read,
                    created_at: row.created_at,
                },
            })
            .collect())
    }

    /// Soft-deletes the caller's side of a message. The other side's view
    /// is untouched.
    #[instrument(skip(db))]
    pub async fn soft_delete_message(
        db: &PgPool,
        message_id: Uuid,
        by_user_id: Uuid,
    ) -> Result<(), AppError> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT id, sender_id, receiver_id, content, read,
                    deleted_by_sender, deleted_by_receiver, created_at, updated_at
             FROM messages WHERE id = $1",
        )
        .bind(message_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found("Message not found"))?;

        let column = if message.sender_id == by_user_id {
            "deleted_by_sender"
        } else if message.receiver_id == by_user_id {
            "deleted_by_receiver"
        } else {
            return Err(AppError::forbidden("Not authorized to delete this message"));
        };

        let query = format!(
            "UPDATE messages SET {column} = TRUE, updated_at = now() WHERE id = $1"
        );

        sqlx::query(&query)
            .bind(message_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn unread_count(db: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages
             WHERE receiver_id = $1 AND NOT read AND NOT deleted_by_receiver",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(count)
    }

    /// Maintenance: hard-deletes messages both sides have discarded. Never
    /// called from request handlers.
    #[instrument(skip(db))]
    pub async fn purge_removed(db: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM messages WHERE deleted_by_sender AND deleted_by_receiver",
        )
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(result.rows_affected())
    }
}
