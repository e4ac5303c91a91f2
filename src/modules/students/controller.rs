use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::model::{CreateStudentDto, Student};
use crate::modules::students::service::StudentService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student enrolled", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 409, description = "Student ID already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(axum::http::StatusCode, Json<Student>), AppError> {
    let parent_id = match auth_user.role() {
        UserRole::Admin => dto.parent_id.ok_or_else(|| {
            AppError::bad_request("parent_id is required when enrolling as an admin")
        })?,
        UserRole::Parent => auth_user.user_id()?,
        UserRole::Teacher => {
            return Err(AppError::forbidden("Teachers cannot enroll students"));
        }
    };

    let student = StudentService::create_student(
        &state.db,
        &dto.name,
        &dto.grade,
        &dto.student_code,
        parent_id,
    )
    .await?;

    Ok((axum::http::StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "Own children, or every student for staff", body = [Student]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = if auth_user.is_staff() {
        StudentService::list_all(&state.db).await?
    } else {
        StudentService::list_children(&state.db, auth_user.user_id()?).await?
    };

    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    StudentService::can_view_student(&state.db, &auth_user, id).await?;

    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(student))
}
