use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, UpdateProfileRequest,
};
use crate::modules::messages::model::{
    ConversationMessage, ConversationSummary, SendMessageRequest, SummaryMessage,
    UnreadCountResponse,
};
use crate::modules::notifications::model::{
    CreateNotificationRequest, MarkAllReadResponse, NotificationKind, NotificationPriority,
    NotificationWithSender,
};
use crate::modules::progress::model::{
    Assessment, AssessmentInput, AssessmentKind, AssessmentStats, AssessmentWithSubject,
    AssessmentsResponse, AttendanceResponse, AttendanceStats, OverallProgressResponse,
    OverallStats, ProgressRecord, RecordProgressRequest, ReportStats, Subject, SubjectGrade,
    SubjectProgressResponse, SubjectStats, TermReportResponse,
};
use crate::modules::resources::model::{
    CreateResourceRequest, DownloadResponse, RateResourceRequest, Resource, ResourceCategory,
    ResourceStatus, ResourceWithUploader, UpdateResourceRequest,
};
use crate::modules::students::model::{CreateStudentDto, Student};
use crate::modules::users::model::{User, UserRole, UserStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::update_profile,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_teachers,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::messages::controller::get_conversations,
        crate::modules::messages::controller::get_unread_count,
        crate::modules::messages::controller::get_conversation,
        crate::modules::messages::controller::send_message,
        crate::modules::messages::controller::delete_message,
        crate::modules::messages::controller::mark_conversation_read,
        crate::modules::notifications::controller::get_notifications,
        crate::modules::notifications::controller::create_notification,
        crate::modules::notifications::controller::mark_read,
        crate::modules::notifications::controller::mark_all_read,
        crate::modules::notifications::controller::delete_notification,
        crate::modules::notifications::controller::get_unread_count,
        crate::modules::notifications::controller::get_by_kind,
        crate::modules::notifications::controller::get_by_priority,
        crate::modules::progress::controller::get_subjects,
        crate::modules::progress::controller::record_progress,
        crate::modules::progress::controller::get_overall_progress,
        crate::modules::progress::controller::get_subject_progress,
        crate::modules::progress::controller::get_attendance,
        crate::modules::progress::controller::get_assessments,
        crate::modules::progress::controller::get_term_report,
        crate::modules::resources::controller::get_resources,
        crate::modules::resources::controller::search_resources,
        crate::modules::resources::controller::get_popular_resources,
        crate::modules::resources::controller::get_resources_by_category,
        crate::modules::resources::controller::get_resource,
        crate::modules::resources::controller::create_resource,
        crate::modules::resources::controller::update_resource,
        crate::modules::resources::controller::delete_resource,
        crate::modules::resources::controller::download_resource,
        crate::modules::resources::controller::rate_resource,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserStatus,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UpdateProfileRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            ErrorResponse,
            Student,
            CreateStudentDto,
            SendMessageRequest,
            ConversationMessage,
            ConversationSummary,
            SummaryMessage,
            UnreadCountResponse,
            CreateNotificationRequest,
            NotificationWithSender,
            NotificationKind,
            NotificationPriority,
            MarkAllReadResponse,
            crate::modules::notifications::model::UnreadCountResponse,
            Subject,
            ProgressRecord,
            Assessment,
            AssessmentWithSubject,
            AssessmentInput,
            AssessmentKind,
            RecordProgressRequest,
            OverallStats,
            SubjectStats,
            AttendanceStats,
            AssessmentStats,
            SubjectGrade,
            ReportStats,
            OverallProgressResponse,
            SubjectProgressResponse,
            AttendanceResponse,
            AssessmentsResponse,
            TermReportResponse,
            Resource,
            ResourceWithUploader,
            ResourceCategory,
            ResourceStatus,
            CreateResourceRequest,
            UpdateResourceRequest,
            RateResourceRequest,
            DownloadResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, profile and password reset"),
        (name = "Users", description = "User directory"),
        (name = "Students", description = "Student enrollment and lookup"),
        (name = "Messages", description = "Parent-teacher direct messaging"),
        (name = "Notifications", description = "Per-user notifications with kinds and priorities"),
        (name = "Progress", description = "Grades, attendance, assessments and term reports"),
        (name = "Resources", description = "Shared learning resource library")
    ),
    info(
        title = "HomeLink API",
        version = "0.1.0",
        description = "Parent-teacher engagement portal backend built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
