use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::auth::controller::{
    forgot_password, get_profile, login_user, register_user, reset_password, update_profile,
};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
