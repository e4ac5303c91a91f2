//! Notifications addressed to a single user.
//!
//! Every notification carries a kind and a priority; both default at the
//! DTO edge rather than being patched up in handlers. Expiry is logical:
//! a past `expires_at` makes the notification expired, purging it is a
//! separate maintenance concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    General,
    Academic,
    Attendance,
    Event,
    Homework,
    Behavior,
}

impl Default for NotificationKind {
    fn default() -> Self {
        Self::General
    }
}

impl NotificationKind {
    /// Icon name the frontend renders for this kind.
    pub fn icon(self) -> &'static str {
        match self {
            Self::General => "bell",
            Self::Academic => "graduation-cap",
            Self::Attendance => "calendar-check",
            Self::Event => "calendar",
            Self::Homework => "book",
            Self::Behavior => "exclamation-circle",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "notification_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Default for NotificationPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl NotificationPriority {
    /// Badge color the frontend renders for this priority.
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#28a745",
            Self::Normal => "#007bff",
            Self::High => "#ffc107",
            Self::Urgent => "#dc3545",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sender_id: Uuid,
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub read: bool,
    pub link: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Logical expiry check; a notification with no expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }
}

/// A notification with the sender's name and role joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NotificationWithSender {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub sender_role: crate::modules::users::model::UserRole,
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub read: bool,
    pub link: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNotificationRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: String,
    #[serde(default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub link: Option<String>,
    /// Defaults to thirty days from creation when omitted.
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = NotificationUnreadCount)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub message: String,
    pub updated: u64,
}
