use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::progress::model::{
    AssessmentWithSubject, ProgressRecord, RecordProgressRequest, Subject,
};
use crate::utils::errors::AppError;

const RECORD_COLUMNS: &str = "p.id, p.student_id, p.subject_id, s.name AS subject_name, \
     p.academic_year, p.term, p.grade, p.attendance_present, p.attendance_total, \
     p.created_at, p.updated_at";

pub struct ProgressService;

impl ProgressService {
    #[instrument(skip(db))]
    pub async fn list_subjects(db: &PgPool) -> Result<Vec<Subject>, AppError> {
        sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects ORDER BY name")
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_subject(db: &PgPool, id: Uuid) -> Result<Subject, AppError> {
        sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found("Subject not found"))
    }

    /// Upserts the (student, subject, year, term) row and appends any
    /// submitted assessments. The upsert and the appends are separate
    /// statements; a concurrent reader may see the grade before the new
    /// assessments, which mirrors the store's single-document guarantees.
    #[instrument(skip(db, dto))]
    pub async fn record_progress(
        db: &PgPool,
        dto: RecordProgressRequest,
    ) -> Result<ProgressRecord, AppError> {
        let student: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM students WHERE id = $1")
            .bind(dto.student_id)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?;
        if student.is_none() {
            return Err(AppError::not_found("Student not found"));
        }

        Self::get_subject(db, dto.subject_id).await?;

        if dto.attendance_present > dto.attendance_total {
            return Err(AppError::bad_request(
                "attendance_present cannot exceed attendance_total",
            ));
        }

        let (progress_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO progress
                 (student_id, subject_id, academic_year, term, grade,
                  attendance_present, attendance_total)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (student_id, subject_id, academic_year, term)
             DO UPDATE SET grade = EXCLUDED.grade,
                           attendance_present = EXCLUDED.attendance_present,
                           attendance_total = EXCLUDED.attendance_total,
                           updated_at = now()
             RETURNING id",
        )
        .bind(dto.student_id)
        .bind(dto.subject_id)
        .bind(&dto.academic_year)
        .bind(&dto.term)
        .bind(dto.grade)
        .bind(dto.attendance_present)
        .bind(dto.attendance_total)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        for assessment in &dto.assessments {
            sqlx::query(
                "INSERT INTO assessments (progress_id, kind, title, score, max_score, taken_on)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(progress_id)
            .bind(assessment.kind)
            .bind(&assessment.title)
            .bind(assessment.score)
            .bind(assessment.max_score)
            .bind(assessment.taken_on)
            .execute(db)
            .await
            .map_err(AppError::database)?;
        }

        let query = format!(
            "SELECT {RECORD_COLUMNS}
             FROM progress p
             JOIN subjects s ON s.id = p.subject_id
             WHERE p.id = $1"
        );

        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(progress_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)
    }

    /// Every record for a student, newest first.
    #[instrument(skip(db))]
    pub async fn get_student_progress(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<ProgressRecord>, AppError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS}
             FROM progress p
             JOIN subjects s ON s.id = p.subject_id
             WHERE p.student_id = $1
             ORDER BY p.created_at DESC"
        );

        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(student_id)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    /// One subject's records for a student, newest first.
    #[instrument(skip(db))]
    pub async fn get_subject_progress(
        db: &PgPool,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<ProgressRecord>, AppError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS}
             FROM progress p
             JOIN subjects s ON s.id = p.subject_id
             WHERE p.student_id = $1 AND p.subject_id = $2
             ORDER BY p.created_at DESC"
        );

        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(student_id)
            .bind(subject_id)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_assessments(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<AssessmentWithSubject>, AppError> {
        sqlx::query_as::<_, AssessmentWithSubject>(
            "SELECT a.id, a.kind, a.title, a.score, a.max_score, a.taken_on,
                    s.name AS subject_name
             FROM assessments a
             JOIN progress p ON p.id = a.progress_id
             JOIN subjects s ON s.id = p.subject_id
             WHERE p.student_id = $1
             ORDER BY a.taken_on DESC",
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)
    }

    /// Term report rows, ordered by subject name for a stable report
    /// layout.
    #[instrument(skip(db))]
    pub async fn get_term_report(
        db: &PgPool,
        student_id: Uuid,
        term: &str,
    ) -> Result<Vec<ProgressRecord>, AppError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS}
             FROM progress p
             JOIN subjects s ON s.id = p.subject_id
             WHERE p.student_id = $1 AND p.term = $2
             ORDER BY s.name"
        );

        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(student_id)
            .bind(term)
            .fetch_all(db)
            .await
            .map_err(AppError::database)
    }
}
