use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, UpdateProfileRequest,
};
use crate::modules::auth::service::AuthService;
use crate::modules::users::model::User;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Error body shape shared by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register_user(&state.db, dto, &state.jwt_config).await?;
    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account suspended", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user profile", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let user = AuthService::update_profile(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset mail queued if the address is known", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if let Some((user, token)) =
        AuthService::forgot_password(&state.db, &dto.email, &state.jwt_config).await?
    {
        let mailer = EmailService::new(state.email_config.clone());
        mailer
            .send_password_reset_email(&user.email, &user.name, &token)
            .await?;
    }

    Ok(Json(MessageResponse {
        message: "If that email is registered, a reset link is on its way".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::reset_password(&state.db, dto, &state.jwt_config).await?;

    Ok(Json(MessageResponse {
        message: "Password has been reset".to_string(),
    }))
}
