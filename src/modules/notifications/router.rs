use axum::{
    Router,
    routing::{get, put},
};

use crate::modules::notifications::controller::{
    create_notification, delete_notification, get_by_kind, get_by_priority, get_notifications,
    get_unread_count, mark_all_read, mark_read,
};
use crate::state::AppState;

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notifications).post(create_notification))
        .route("/unread-count", get(get_unread_count))
        .route("/read-all", put(mark_all_read))
        .route("/type/{kind}", get(get_by_kind))
        .route("/priority/{priority}", get(get_by_priority))
        .route("/{id}", axum::routing::delete(delete_notification))
        .route("/{id}/read", put(mark_read))
}
