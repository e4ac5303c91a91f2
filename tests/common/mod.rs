#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use homelink::config::cors::CorsConfig;
use homelink::config::email::EmailConfig;
use homelink::config::jwt::JwtConfig;
use homelink::config::rate_limit::RateLimitConfig;
use homelink::modules::users::model::UserRole;
use homelink::router::init_router;
use homelink::state::AppState;
use homelink::utils::password::hash_password;

pub const TEST_PASSWORD: &str = "testpass123";

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
}

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::default(),
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

pub async fn create_test_user(pool: &PgPool, name: &str, role: UserRole) -> TestUser {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(name)
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser { id, email }
}

pub async fn create_test_student(pool: &PgPool, parent_id: Uuid, name: &str) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO students (name, grade, student_code, parent_id)
         VALUES ($1, '7', $2, $3)
         RETURNING id",
    )
    .bind(name)
    .bind(format!("STU-{}", Uuid::new_v4()))
    .bind(parent_id)
    .fetch_one(pool)
    .await
    .unwrap();

    id
}

pub async fn create_test_subject(pool: &PgPool, name: &str) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO subjects (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap();

    id
}

pub async fn get_auth_token(app: Router, email: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": email,
                "password": TEST_PASSWORD
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access_token"]
        .as_str()
        .expect("login response should carry an access token")
        .to_string()
}

pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json");

    match body {
        Some(json) => builder
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
