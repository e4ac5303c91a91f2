use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::messages::controller::{
    delete_message, get_conversation, get_conversations, get_unread_count,
    mark_conversation_read, send_message,
};
use crate::state::AppState;

pub fn init_messages_router() -> Router<AppState> {
    Router::new()
        .route("/", post(send_message))
        .route("/conversations", get(get_conversations))
        .route("/unread-count", get(get_unread_count))
        .route("/{id}", get(get_conversation).delete(delete_message))
        .route("/{id}/read", put(mark_conversation_read))
}
