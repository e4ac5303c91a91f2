use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::notifications::model::{
    CreateNotificationRequest, MarkAllReadResponse, NotificationKind, NotificationPriority,
    NotificationWithSender, UnreadCountResponse,
};
use crate::modules::notifications::service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = [NotificationWithSender]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn get_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<NotificationWithSender>>, AppError> {
    let notifications =
        NotificationService::list_notifications(&state.db, auth_user.user_id()?).await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = NotificationWithSender),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 404, description = "Target user not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, dto))]
pub async fn create_notification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateNotificationRequest>,
) -> Result<(axum::http::StatusCode, Json<NotificationWithSender>), AppError> {
    if !auth_user.is_staff() {
        return Err(AppError::forbidden(
            "Only teachers and admins can send notifications",
        ));
    }

    let notification =
        NotificationService::create_notification(&state.db, auth_user.user_id()?, dto).await?;

    Ok((axum::http::StatusCode::CREATED, Json(notification)))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked as read", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    NotificationService::mark_read(&state.db, id, auth_user.user_id()?).await?;

    Ok(Json(MessageResponse {
        message: "Notification marked as read".to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked as read", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let updated = NotificationService::mark_all_read(&state.db, auth_user.user_id()?).await?;

    Ok(Json(MarkAllReadResponse {
        message: "All notifications marked as read".to_string(),
        updated,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn delete_notification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    NotificationService::delete_notification(&state.db, id, auth_user.user_id()?).await?;

    Ok(Json(MessageResponse {
        message: "Notification deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notification count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn get_unread_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread_count =
        NotificationService::unread_count(&state.db, auth_user.user_id()?).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

#[utoipa::path(
    get,
    path = "/api/notifications/type/{kind}",
    params(("kind" = String, Path, description = "Notification kind")),
    responses(
        (status = 200, description = "Notifications of one kind, newest first", body = [NotificationWithSender]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn get_by_kind(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(kind): Path<NotificationKind>,
) -> Result<Json<Vec<NotificationWithSender>>, AppError> {
    let notifications =
        NotificationService::list_by_kind(&state.db, auth_user.user_id()?, kind).await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    get,
    path = "/api/notifications/priority/{priority}",
    params(("priority" = String, Path, description = "Notification priority")),
    responses(
        (status = 200, description = "Notifications of one priority, newest first", body = [NotificationWithSender]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn get_by_priority(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(priority): Path<NotificationPriority>,
) -> Result<Json<Vec<NotificationWithSender>>, AppError> {
    let notifications =
        NotificationService::list_by_priority(&state.db, auth_user.user_id()?, priority).await?;
    Ok(Json(notifications))
}
