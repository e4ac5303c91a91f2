//! Direct messages between two users.
//!
//! Read state is per message; deletion is a per-side soft flag. A message
//! only leaves storage once both sides have deleted it, and only through
//! the maintenance purge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub read: bool,
    pub deleted_by_sender: bool,
    pub deleted_by_receiver: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// True once both sides have soft-deleted; the purge job removes
    /// exactly these rows.
    pub fn should_remove(&self) -> bool {
        self.deleted_by_sender && self.deleted_by_receiver
    }
}

/// A message as seen inside a conversation, with participant names joined.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub receiver_id: Uuid,
    pub receiver_name: String,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

fn not_blank(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("not_blank")
            .with_message("content must not be empty".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    #[validate(custom(function = not_blank))]
    pub content: String,
}

/// One row per counterpart the user has exchanged messages with.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationSummary {
    pub user_id: Uuid,
    pub name: String,
    pub role: crate::modules::users::model::UserRole,
    pub unread_count: i64,
    pub last_message: SummaryMessage,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(deleted_by_sender: bool, deleted_by_receiver: bool) -> Message {
        Message {
            id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            content: "hello".to_string(),
            read: false,
            deleted_by_sender,
            deleted_by_receiver,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn should_remove_only_when_both_sides_deleted() {
        assert!(!message(false, false).should_remove());
        assert!(!message(true, false).should_remove());
        assert!(!message(false, true).should_remove());
        assert!(message(true, true).should_remove());
    }

    #[test]
    fn blank_content_fails_validation() {
        let dto = SendMessageRequest {
            receiver_id: Uuid::new_v4(),
            content: "   ".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = SendMessageRequest {
            receiver_id: Uuid::new_v4(),
            content: "hi".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
