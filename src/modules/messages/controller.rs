use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::messages::model::{
    ConversationMessage, ConversationSummary, SendMessageRequest, UnreadCountResponse,
};
use crate::modules::messages::service::MessageService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    responses(
        (status = 200, description = "Conversation summaries", body = [ConversationSummary]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state))]
pub async fn get_conversations(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    let summaries =
        MessageService::get_conversation_summaries(&state.db, auth_user.user_id()?).await?;
    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/messages/unread-count",
    responses(
        (status = 200, description = "Unread message count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state))]
pub async fn get_unread_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread_count = MessageService::unread_count(&state.db, auth_user.user_id()?).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

#[utoipa::path(
    get,
    path = "/api/messages/{other_user_id}",
    params(("other_user_id" = Uuid, Path, description = "The other participant")),
    responses(
        (status = 200, description = "Conversation, oldest first; fetching marks it read", body = [ConversationMessage]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state))]
pub async fn get_conversation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(other_user_id): Path<Uuid>,
) -> Result<Json<Vec<ConversationMessage>>, AppError> {
    let messages =
        MessageService::get_conversation(&state.db, auth_user.user_id()?, other_user_id).await?;
    Ok(Json(messages))
}

#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = ConversationMessage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Receiver not found", body = ErrorResponse),
        (status = 422, description = "Empty content", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state, dto))]
pub async fn send_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SendMessageRequest>,
) -> Result<(axum::http::StatusCode, Json<ConversationMessage>), AppError> {
    let message = MessageService::send_message(
        &state.db,
        auth_user.user_id()?,
        dto.receiver_id,
        &dto.content,
    )
    .await?;

    Ok((axum::http::StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message deleted for the caller's side", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is neither sender nor receiver", body = ErrorResponse),
        (status = 404, description = "Message not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state))]
pub async fn delete_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    MessageService::soft_delete_message(&state.db, id, auth_user.user_id()?).await?;

    Ok(Json(MessageResponse {
        message: "Message deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/messages/{conversation_id}/read",
    params(("conversation_id" = Uuid, Path, description = "The other participant")),
    responses(
        (status = 200, description = "Messages marked as read", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state))]
pub async fn mark_conversation_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    MessageService::mark_conversation_read(&state.db, auth_user.user_id()?, conversation_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Messages marked as read".to_string(),
    }))
}
