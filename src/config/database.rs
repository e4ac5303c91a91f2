use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

/// Initializes the PostgreSQL connection pool from `DATABASE_URL`.
///
/// The pool is cheaply cloneable and shared through [`crate::state::AppState`].
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the connection fails; the server
/// cannot do anything useful without its store.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPoolOptions::new()
        .max_connections(
            env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        )
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
