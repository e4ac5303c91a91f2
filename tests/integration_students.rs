mod common;

use axum::http::StatusCode;
use common::{
    authed_request, create_test_student, create_test_user, get_auth_token, json_body,
    setup_test_app,
};
use homelink::modules::users::model::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn parent_enrolls_a_student_under_itself(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;

    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "POST",
            "/api/students",
            &token,
            Some(json!({
                "name": "Max",
                "grade": "7",
                "student_code": "STU-1001"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["name"], "Max");
    assert_eq!(body["parent_id"], parent.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_student_code_conflicts(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;

    let enroll = |token: String, pool: PgPool| async move {
        setup_test_app(pool)
            .oneshot(authed_request(
                "POST",
                "/api/students",
                &token,
                Some(json!({
                    "name": "Max",
                    "grade": "7",
                    "student_code": "STU-1001"
                })),
            ))
            .await
            .unwrap()
    };

    let response = enroll(token.clone(), pool.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = enroll(token, pool).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn teachers_cannot_enroll_students(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let token = get_auth_token(setup_test_app(pool.clone()), &teacher.email).await;

    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "POST",
            "/api/students",
            &token,
            Some(json!({
                "name": "Max",
                "grade": "7",
                "student_code": "STU-1001"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn admin_enrollment_requires_an_existing_parent(pool: PgPool) {
    let admin = create_test_user(&pool, "Ada Admin", UserRole::Admin).await;
    let token = get_auth_token(setup_test_app(pool.clone()), &admin.email).await;

    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "POST",
            "/api/students",
            &token,
            Some(json!({
                "name": "Max",
                "grade": "7",
                "student_code": "STU-1001",
                "parent_id": Uuid::new_v4()
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn parents_list_only_their_own_children(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let other_parent = create_test_user(&pool, "Olive Other", UserRole::Parent).await;
    create_test_student(&pool, parent.id, "Max").await;
    create_test_student(&pool, other_parent.id, "Nina").await;

    let token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request("GET", "/api/students", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let students = body.as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["name"], "Max");
}

#[sqlx::test(migrations = "./migrations")]
async fn fetching_a_foreign_student_is_forbidden_not_missing(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let other_parent = create_test_user(&pool, "Olive Other", UserRole::Parent).await;
    let foreign_student = create_test_student(&pool, other_parent.id, "Nina").await;

    let token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;

    let response = setup_test_app(pool.clone())
        .oneshot(authed_request(
            "GET",
            &format!("/api/students/{}", foreign_student),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A nonexistent id answers the same way, so ids cannot be probed.
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "GET",
            &format!("/api/students/{}", Uuid::new_v4()),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
