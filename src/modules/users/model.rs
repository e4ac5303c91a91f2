//! User entity and account taxonomy.
//!
//! Users are parents, teachers, or admins. A parent's children are the
//! [`crate::modules::students::model::Student`] rows pointing back at it;
//! there is no embedded list on the user itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Parent,
    Teacher,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Parent
    }
}

impl UserRole {
    /// Staff accounts may author notifications and record progress.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A user account. The password hash is never selected into this struct,
/// so it cannot leak through serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for filtering the user listing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}
