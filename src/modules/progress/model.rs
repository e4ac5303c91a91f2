use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::students::model::Student;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "assessment_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    Quiz,
    Test,
    Exam,
    Assignment,
    Project,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
}

/// One student's standing in one subject for one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub academic_year: String,
    pub term: String,
    pub grade: f64,
    pub attendance_present: i32,
    pub attendance_total: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// Share of sessions attended, 0 when nothing was recorded yet.
    pub fn attendance_percentage(&self) -> f64 {
        if self.attendance_total == 0 {
            return 0.0;
        }
        f64::from(self.attendance_present) / f64::from(self.attendance_total) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assessment {
    pub id: Uuid,
    pub progress_id: Uuid,
    pub kind: AssessmentKind,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub taken_on: NaiveDate,
}

impl Assessment {
    pub fn percentage(&self) -> f64 {
        self.score / self.max_score * 100.0
    }
}

/// Assessment joined with the subject it was taken in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssessmentWithSubject {
    pub id: Uuid,
    pub kind: AssessmentKind,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub taken_on: NaiveDate,
    pub subject_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssessmentInput {
    pub kind: AssessmentKind,
    #[validate(length(min = 1, message = "assessment title must not be empty"))]
    pub title: String,
    #[validate(range(min = 0.0, message = "score must not be negative"))]
    pub score: f64,
    #[validate(range(min = 0.000001, message = "max_score must be positive"))]
    pub max_score: f64,
    pub taken_on: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordProgressRequest {
    pub student_id: Uuid,
    pub subject_id: Uuid,
    #[validate(length(min = 1, message = "academic_year must not be empty"))]
    pub academic_year: String,
    #[validate(length(min = 1, message = "term must not be empty"))]
    pub term: String,
    #[validate(range(min = 0.0, max = 100.0, message = "grade must be between 0 and 100"))]
    pub grade: f64,
    #[validate(range(min = 0, message = "attendance_present must not be negative"))]
    #[serde(default)]
    pub attendance_present: i32,
    #[validate(range(min = 0, message = "attendance_total must not be negative"))]
    #[serde(default)]
    pub attendance_total: i32,
    #[validate(nested)]
    #[serde(default)]
    pub assessments: Vec<AssessmentInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OverallStats {
    pub average_grade: f64,
    pub total_subjects: usize,
    pub attendance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SubjectStats {
    pub average_grade: f64,
    pub highest_grade: f64,
    pub lowest_grade: f64,
    pub improvement: f64,
    pub attendance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceStats {
    pub overall_attendance: f64,
    pub total_records: usize,
    pub present_sessions: i64,
    pub total_sessions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AssessmentStats {
    pub total_assessments: usize,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SubjectGrade {
    pub subject: String,
    pub grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportStats {
    pub term_average: f64,
    pub total_subjects: usize,
    pub passed_subjects: usize,
    pub needs_improvement: Vec<SubjectGrade>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverallProgressResponse {
    pub student: Student,
    pub progress: Vec<ProgressRecord>,
    pub stats: OverallStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectProgressResponse {
    pub subject: Subject,
    pub progress: Vec<ProgressRecord>,
    pub stats: SubjectStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceResponse {
    pub records: Vec<ProgressRecord>,
    pub stats: AttendanceStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssessmentsResponse {
    pub assessments: Vec<AssessmentWithSubject>,
    pub stats: AssessmentStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TermReportResponse {
    pub student: Student,
    pub report: Vec<ProgressRecord>,
    pub stats: ReportStats,
}
