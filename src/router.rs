use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::router::init_auth_router;
use crate::modules::messages::router::init_messages_router;
use crate::modules::notifications::router::init_notifications_router;
use crate::modules::progress::router::init_progress_router;
use crate::modules::resources::router::init_resources_router;
use crate::modules::students::router::init_students_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    // Stricter limits on the credential endpoints, looser ones everywhere
    // else. Off by default so in-process test harnesses, which have no peer
    // address to key on, can drive the router directly.
    let auth_router = if state.rate_limit_config.enabled {
        init_auth_router().layer(GovernorLayer::new(Arc::new(
            state.rate_limit_config.auth_governor_config(),
        )))
    } else {
        init_auth_router()
    };

    let api_router = Router::new()
        .nest("/auth", auth_router)
        .nest("/users", init_users_router())
        .nest("/students", init_students_router())
        .nest("/messages", init_messages_router())
        .nest("/notifications", init_notifications_router())
        .nest("/progress", init_progress_router())
        .nest("/resources", init_resources_router());

    let api_router = if state.rate_limit_config.enabled {
        api_router.layer(GovernorLayer::new(Arc::new(
            state.rate_limit_config.general_governor_config(),
        )))
    } else {
        api_router
    };

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api_router)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
