use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::progress::model::{
    AssessmentsResponse, AttendanceResponse, OverallProgressResponse, ProgressRecord,
    RecordProgressRequest, Subject, SubjectProgressResponse, TermReportResponse,
};
use crate::modules::progress::service::ProgressService;
use crate::modules::progress::stats;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/progress/subjects",
    responses(
        (status = 200, description = "All subjects", body = [Subject]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = ProgressService::list_subjects(&state.db).await?;
    Ok(Json(subjects))
}

#[utoipa::path(
    post,
    path = "/api/progress",
    request_body = RecordProgressRequest,
    responses(
        (status = 201, description = "Progress recorded", body = ProgressRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 404, description = "Student or subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Progress"
)]
#[instrument(skip(state, dto))]
pub async fn record_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<RecordProgressRequest>,
) -> Result<(axum::http::StatusCode, Json<ProgressRecord>), AppError> {
    if !auth_user.is_staff() {
        return Err(AppError::forbidden(
            "Only teachers and admins can record progress",
        ));
    }

    let record = ProgressService::record_progress(&state.db, dto).await?;
    Ok((axum::http::StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/progress/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Overall progress with aggregate stats", body = OverallProgressResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not this parent's student", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn get_overall_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<Json<OverallProgressResponse>, AppError> {
    StudentService::can_view_student(&state.db, &auth_user, student_id).await?;

    let student = StudentService::get_student(&state.db, student_id).await?;
    let progress = ProgressService::get_student_progress(&state.db, student_id).await?;
    let stats = stats::overall_stats(&progress);

    Ok(Json(OverallProgressResponse {
        student,
        progress,
        stats,
    }))
}

#[utoipa::path(
    get,
    path = "/api/progress/{student_id}/subject/{subject_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("subject_id" = Uuid, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Per-subject progress with stats", body = SubjectProgressResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not this parent's student", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn get_subject_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((student_id, subject_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SubjectProgressResponse>, AppError> {
    StudentService::can_view_student(&state.db, &auth_user, student_id).await?;

    let subject = ProgressService::get_subject(&state.db, subject_id).await?;
    let progress =
        ProgressService::get_subject_progress(&state.db, student_id, subject_id).await?;
    let stats = stats::subject_stats(&progress);

    Ok(Json(SubjectProgressResponse {
        subject,
        progress,
        stats,
    }))
}

#[utoipa::path(
    get,
    path = "/api/progress/{student_id}/attendance",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Attendance records and aggregate", body = AttendanceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not this parent's student", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn get_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<Json<AttendanceResponse>, AppError> {
    StudentService::can_view_student(&state.db, &auth_user, student_id).await?;

    let records = ProgressService::get_student_progress(&state.db, student_id).await?;
    let stats = stats::attendance_stats(&records);

    Ok(Json(AttendanceResponse { records, stats }))
}

#[utoipa::path(
    get,
    path = "/api/progress/{student_id}/assessments",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Assessments and score stats", body = AssessmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not this parent's student", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn get_assessments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<Json<AssessmentsResponse>, AppError> {
    StudentService::can_view_student(&state.db, &auth_user, student_id).await?;

    let assessments = ProgressService::get_assessments(&state.db, student_id).await?;
    let stats = stats::assessment_stats(&assessments);

    Ok(Json(AssessmentsResponse {
        assessments,
        stats,
    }))
}

#[utoipa::path(
    get,
    path = "/api/progress/{student_id}/report/{term}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("term" = String, Path, description = "Term, e.g. \"Term 1\"")
    ),
    responses(
        (status = 200, description = "Term report with pass/fail partition", body = TermReportResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not this parent's student", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn get_term_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((student_id, term)): Path<(Uuid, String)>,
) -> Result<Json<TermReportResponse>, AppError> {
    StudentService::can_view_student(&state.db, &auth_user, student_id).await?;

    let student = StudentService::get_student(&state.db, student_id).await?;
    let report = ProgressService::get_term_report(&state.db, student_id, &term).await?;
    let stats = stats::report_stats(&report);

    Ok(Json(TermReportResponse {
        student,
        report,
        stats,
    }))
}
