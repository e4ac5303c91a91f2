mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    authed_request, create_test_user, get_auth_token, json_body, setup_test_app,
};
use homelink::modules::notifications::model::CreateNotificationRequest;
use homelink::modules::notifications::service::NotificationService;
use homelink::modules::users::model::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

fn create_request(user_id: Uuid, title: &str) -> CreateNotificationRequest {
    serde_json::from_value(json!({
        "user_id": user_id,
        "title": title,
        "body": "details inside"
    }))
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn create_applies_defaults_including_thirty_day_expiry(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;

    let token = get_auth_token(setup_test_app(pool.clone()), &teacher.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "POST",
            "/api/notifications",
            &token,
            Some(json!({
                "user_id": parent.id,
                "title": "Field trip",
                "body": "Permission slips due Friday"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["kind"], "general");
    assert_eq!(body["priority"], "normal");
    assert_eq!(body["read"], false);
    assert_eq!(body["sender_name"], "Tess Teacher");

    let expires_at: chrono::DateTime<Utc> =
        serde_json::from_value(body["expires_at"].clone()).unwrap();
    let now = Utc::now();
    assert!(expires_at > now + Duration::days(29));
    assert!(expires_at < now + Duration::days(31));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_for_unknown_user_is_not_found(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;

    let err = NotificationService::create_notification(
        &pool,
        teacher.id,
        create_request(Uuid::new_v4(), "Nobody home"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn parents_cannot_author_notifications(pool: PgPool) {
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let other = create_test_user(&pool, "Olive Other", UserRole::Parent).await;

    let token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;
    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "POST",
            "/api/notifications",
            &token,
            Some(json!({
                "user_id": other.id,
                "title": "Hey",
                "body": "not allowed"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_read_is_keyed_by_owner(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;
    let snoop = create_test_user(&pool, "Sid Snoop", UserRole::Parent).await;

    let notification = NotificationService::create_notification(
        &pool,
        teacher.id,
        create_request(parent.id, "Yours only"),
    )
    .await
    .unwrap();

    // Another user sees a 404, indistinguishable from a missing id.
    let err = NotificationService::mark_read(&pool, notification.id, snoop.id)
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);

    NotificationService::mark_read(&pool, notification.id, parent.id)
        .await
        .unwrap();
    assert_eq!(
        NotificationService::unread_count(&pool, parent.id).await.unwrap(),
        0
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_all_read_zeroes_the_count_and_is_idempotent(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;

    for title in ["one", "two", "three"] {
        NotificationService::create_notification(
            &pool,
            teacher.id,
            create_request(parent.id, title),
        )
        .await
        .unwrap();
    }
    assert_eq!(
        NotificationService::unread_count(&pool, parent.id).await.unwrap(),
        3
    );

    let updated = NotificationService::mark_all_read(&pool, parent.id)
        .await
        .unwrap();
    assert_eq!(updated, 3);
    assert_eq!(
        NotificationService::unread_count(&pool, parent.id).await.unwrap(),
        0
    );

    // Second call is a no-op.
    let updated = NotificationService::mark_all_read(&pool, parent.id)
        .await
        .unwrap();
    assert_eq!(updated, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn kind_and_priority_listings_filter_and_sort(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;

    let homework: CreateNotificationRequest = serde_json::from_value(json!({
        "user_id": parent.id,
        "title": "Homework due",
        "body": "Chapter 4",
        "kind": "homework",
        "priority": "high"
    }))
    .unwrap();
    NotificationService::create_notification(&pool, teacher.id, homework)
        .await
        .unwrap();
    NotificationService::create_notification(
        &pool,
        teacher.id,
        create_request(parent.id, "General notice"),
    )
    .await
    .unwrap();

    let token = get_auth_token(setup_test_app(pool.clone()), &parent.email).await;

    let response = setup_test_app(pool.clone())
        .oneshot(authed_request(
            "GET",
            "/api/notifications/type/homework",
            &token,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Homework due");

    let response = setup_test_app(pool)
        .oneshot(authed_request(
            "GET",
            "/api/notifications/priority/high",
            &token,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["priority"], "high");
}

#[sqlx::test(migrations = "./migrations")]
async fn purge_removes_only_expired_notifications(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;

    let expired: CreateNotificationRequest = serde_json::from_value(json!({
        "user_id": parent.id,
        "title": "Old news",
        "body": "long gone",
        "expires_at": Utc::now() - Duration::days(1)
    }))
    .unwrap();
    NotificationService::create_notification(&pool, teacher.id, expired)
        .await
        .unwrap();
    NotificationService::create_notification(
        &pool,
        teacher.id,
        create_request(parent.id, "Still current"),
    )
    .await
    .unwrap();

    let purged = NotificationService::purge_expired(&pool).await.unwrap();
    assert_eq!(purged, 1);

    let remaining = NotificationService::list_notifications(&pool, parent.id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Still current");
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_is_keyed_by_owner(pool: PgPool) {
    let teacher = create_test_user(&pool, "Tess Teacher", UserRole::Teacher).await;
    let parent = create_test_user(&pool, "Pat Parent", UserRole::Parent).await;

    let notification = NotificationService::create_notification(
        &pool,
        teacher.id,
        create_request(parent.id, "Ephemeral"),
    )
    .await
    .unwrap();

    let err = NotificationService::delete_notification(&pool, notification.id, teacher.id)
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);

    NotificationService::delete_notification(&pool, notification.id, parent.id)
        .await
        .unwrap();
    let remaining = NotificationService::list_notifications(&pool, parent.id)
        .await
        .unwrap();
    assert!(remaining.is_empty());
}
