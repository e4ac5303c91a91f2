use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_any_role;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::model::{User, UserFilterParams, UserRole};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "List of users", body = [User]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filter): Query<UserFilterParams>,
) -> Result<Json<Vec<User>>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin])?;

    let users = UserService::list_users(&state.db, filter).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/teachers",
    responses(
        (status = 200, description = "Active teachers", body = [User]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    let teachers = UserService::list_active_teachers(&state.db).await?;
    Ok(Json(teachers))
}
