use axum::{Router, routing::get};

use crate::modules::students::controller::{create_student, get_student, get_students};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route("/{id}", get(get_student))
}
