use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::resources::controller::{
    create_resource, delete_resource, download_resource, get_popular_resources, get_resource,
    get_resources, get_resources_by_category, rate_resource, search_resources, update_resource,
};
use crate::state::AppState;

pub fn init_resources_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_resources).post(create_resource))
        .route("/search", get(search_resources))
        .route("/popular", get(get_popular_resources))
        .route("/category/{category}", get(get_resources_by_category))
        .route(
            "/{id}",
            get(get_resource)
                .put(update_resource)
                .delete(delete_resource),
        )
        .route("/{id}/download", post(download_resource))
        .route("/{id}/ratings", post(rate_resource))
}
