use axum::{Router, routing::get};

use crate::modules::users::controller::{get_teachers, get_users};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/teachers", get(get_teachers))
}
