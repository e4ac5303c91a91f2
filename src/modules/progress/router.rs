use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::progress::controller::{
    get_assessments, get_attendance, get_overall_progress, get_subject_progress, get_subjects,
    get_term_report, record_progress,
};
use crate::state::AppState;

pub fn init_progress_router() -> Router<AppState> {
    Router::new()
        .route("/", post(record_progress))
        .route("/subjects", get(get_subjects))
        .route("/{student_id}", get(get_overall_progress))
        .route("/{student_id}/subject/{subject_id}", get(get_subject_progress))
        .route("/{student_id}/attendance", get(get_attendance))
        .route("/{student_id}/assessments", get(get_assessments))
        .route("/{student_id}/report/{term}", get(get_term_report))
}
