mod common;

use axum::http::StatusCode;
use common::{
    authed_request, create_test_student, create_test_subject, create_test_user, get_auth_token,
    json_body, setup_test_app,
};
use homelink::modules::users::model::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn record_progress(
    pool: &PgPool,
    token: &str,
    student_id: uuid::Uuid,
    subject_id: uuid::Uuid,
    grade: f64,
) {
    let response = setup_test_app(pool.clone())
        .oneshot(authed_request(
            "POST",
            "/api/progress",
            token,
            Some(json!({
                "student_id": student_id,
                "subject_id": subject_id,
                "academic_year": "2025/2026",
                "term": "Term 1",
                "grade": grade,
                "attendance_present": 18,
                "attendance_total": 20
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn parent_cannot_view_another_parents_student(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let other_parent = create_test_user(&pool, "Olive Other", UserRole::Parent).await;
    let _own_student = create_test_student(&pool, parent.id, "Max").await;
    let foreign_student = create_test_student(&pool, other_parent.id, "Nina").await;

    let token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "GET",
            &format!("/api/progress/{}", foreign_student),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn teacher_may_view_any_student(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let student = create_test_student(&pool, parent.id, "Max").await;

    let token = get_auth_token(setup_test_app(pool.clone()), &teacher.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "GET",
            &format!("/api/progress/{}", student),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn parents_cannot_record_progress(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let student = create_test_student(&pool, parent.id, "Max").await;
    let subject = create_test_subject(&pool, "Mathematics").await;

    let token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "POST",
            "/api/progress",
            &token,
            Some(json!({
                "student_id": student,
                "subject_id": subject,
                "academic_year": "2025/2026",
                "term": "Term 1",
                "grade": 90.0
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn term_report_partitions_pass_and_fail(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let student = create_test_student(&pool, parent.id, "Max").await;

    let maths = create_test_subject(&pool, "Mathematics").await;
    let english = create_test_subject(&pool, "English").await;
    let science = create_test_subject(&pool, "Science").await;

    let teacher_token = get_auth_token(setup_test_app(pool.clone()), &teacher.email).await;
    record_progress(&pool, &teacher_token, student, maths, 95.0).await;
    record_progress(&pool, &teacher_token, student, english, 40.0).await;
    record_progress(&pool, &teacher_token, student, science, 30.0).await;

    let parent_token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "GET",
            &format!("/api/progress/{}/report/Term%201", student),
            &parent_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let stats = &body["stats"];
    assert_eq!(stats["term_average"], 55.0);
    assert_eq!(stats["total_subjects"], 3);
    // 40 is exactly the pass mark.
    assert_eq!(stats["passed_subjects"], 2);

    let needs = stats["needs_improvement"].as_array().unwrap();
    assert_eq!(needs.len(), 1);
    assert_eq!(needs[0]["subject"], "Science");
    assert_eq!(needs[0]["grade"], 30.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn overall_progress_aggregates_grades_and_attendance(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let student = create_test_student(&pool, parent.id, "Max").await;

    let maths = create_test_subject(&pool, "Mathematics").await;
    let english = create_test_subject(&pool, "English").await;

    let teacher_token = get_auth_token(setup_test_app(pool.clone()), &teacher.email).await;
    record_progress(&pool, &teacher_token, student, maths, 80.0).await;
    record_progress(&pool, &teacher_token, student, english, 60.0).await;

    let parent_token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "GET",
            &format!("/api/progress/{}", student),
            &parent_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["student"]["name"], "Max");
    assert_eq!(body["progress"].as_array().unwrap().len(), 2);
    assert_eq!(body["stats"]["average_grade"], 70.0);
    assert_eq!(body["stats"]["total_subjects"], 2);
    assert_eq!(body["stats"]["attendance"], 90.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn assessments_listing_carries_subject_and_stats(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let student = create_test_student(&pool, parent.id, "Max").await;
    let maths = create_test_subject(&pool, "Mathematics").await;

    let teacher_token = get_auth_token(setup_test_app(pool.clone()), &teacher.email).await;
    let response = setup_test_app(pool.clone())
        .oneshot(authed_request(
            "POST",
            "/api/progress",
            &teacher_token,
            Some(json!({
                "student_id": student,
                "subject_id": maths,
                "academic_year": "2025/2026",
                "term": "Term 1",
                "grade": 75.0,
                "attendance_present": 19,
                "attendance_total": 20,
                "assessments": [
                    {"kind": "quiz", "title": "Quiz 1", "score": 8.0, "max_score": 10.0, "taken_on": "2026-02-10"},
                    {"kind": "exam", "title": "Midterm", "score": 60.0, "max_score": 100.0, "taken_on": "2026-03-15"}
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let parent_token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "GET",
            &format!("/api/progress/{}/assessments", student),
            &parent_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let assessments = body["assessments"].as_array().unwrap();
    assert_eq!(assessments.len(), 2);
    // Newest first.
    assert_eq!(assessments[0]["title"], "Midterm");
    assert_eq!(assessments[0]["subject_name"], "Mathematics");

    let stats = &body["stats"];
    assert_eq!(stats["total_assessments"], 2);
    assert_eq!(stats["average_score"], 70.0); // (80 + 60) / 2
    assert_eq!(stats["highest_score"], 80.0);
    assert_eq!(stats["lowest_score"], 60.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn attendance_endpoint_reports_session_totals(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let student = create_test_student(&pool, parent.id, "Max").await;
    let maths = create_test_subject(&pool, "Mathematics").await;

    let teacher_token = get_auth_token(setup_test_app(pool.clone()), &teacher.email).await;
    record_progress(&pool, &teacher_token, student, maths, 70.0).await;

    let parent_token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "GET",
            &format!("/api/progress/{}/attendance", student),
            &parent_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["stats"]["total_records"], 1);
    assert_eq!(body["stats"]["present_sessions"], 18);
    assert_eq!(body["stats"]["total_sessions"], 20);
    assert_eq!(body["stats"]["overall_attendance"], 90.0);
}
