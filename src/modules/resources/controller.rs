use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::resources::model::{
    CreateResourceRequest, DownloadResponse, RateResourceRequest, Resource, ResourceCategory,
    ResourceWithUploader, SearchParams, UpdateResourceRequest,
};
use crate::modules::resources::service::ResourceService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/resources",
    responses(
        (status = 200, description = "Active resources, newest first", body = [ResourceWithUploader]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_resources(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<ResourceWithUploader>>, AppError> {
    let resources = ResourceService::list_resources(&state.db).await?;
    Ok(Json(resources))
}

#[utoipa::path(
    get,
    path = "/api/resources/search",
    params(("query" = String, Query, description = "Search text")),
    responses(
        (status = 200, description = "Matching resources", body = [ResourceWithUploader]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn search_resources(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ResourceWithUploader>>, AppError> {
    let resources = ResourceService::search_resources(&state.db, &params.query).await?;
    Ok(Json(resources))
}

#[utoipa::path(
    get,
    path = "/api/resources/popular",
    responses(
        (status = 200, description = "Ten most downloaded resources", body = [ResourceWithUploader]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_popular_resources(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<ResourceWithUploader>>, AppError> {
    let resources = ResourceService::popular_resources(&state.db).await?;
    Ok(Json(resources))
}

#[utoipa::path(
    get,
    path = "/api/resources/category/{category}",
    params(("category" = String, Path, description = "Resource category")),
    responses(
        (status = 200, description = "Resources in one category", body = [ResourceWithUploader]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_resources_by_category(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(category): Path<ResourceCategory>,
) -> Result<Json<Vec<ResourceWithUploader>>, AppError> {
    let resources = ResourceService::list_by_category(&state.db, category).await?;
    Ok(Json(resources))
}

#[utoipa::path(
    get,
    path = "/api/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource details", body = ResourceWithUploader),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_resource(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResourceWithUploader>, AppError> {
    let resource = ResourceService::get_resource(&state.db, id).await?;
    Ok(Json(resource))
}

#[utoipa::path(
    post,
    path = "/api/resources",
    request_body = CreateResourceRequest,
    responses(
        (status = 201, description = "Resource created", body = Resource),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, dto))]
pub async fn create_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateResourceRequest>,
) -> Result<(axum::http::StatusCode, Json<Resource>), AppError> {
    if !auth_user.is_staff() {
        return Err(AppError::forbidden(
            "Only teachers and admins can upload resources",
        ));
    }

    let resource =
        ResourceService::create_resource(&state.db, auth_user.user_id()?, dto).await?;
    Ok((axum::http::StatusCode::CREATED, Json(resource)))
}

#[utoipa::path(
    put,
    path = "/api/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    request_body = UpdateResourceRequest,
    responses(
        (status = 200, description = "Resource updated", body = Resource),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the uploader or an admin", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, dto))]
pub async fn update_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateResourceRequest>,
) -> Result<Json<Resource>, AppError> {
    let resource = ResourceService::update_resource(
        &state.db,
        id,
        auth_user.user_id()?,
        auth_user.role(),
        dto,
    )
    .await?;
    Ok(Json(resource))
}

#[utoipa::path(
    delete,
    path = "/api/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the uploader or an admin", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn delete_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    ResourceService::delete_resource(&state.db, id, auth_user.user_id()?, auth_user.role())
        .await?;

    Ok(Json(MessageResponse {
        message: "Resource deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/resources/{id}/download",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Download URL; the counter was bumped", body = DownloadResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn download_resource(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DownloadResponse>, AppError> {
    let download_url = ResourceService::record_download(&state.db, id).await?;
    Ok(Json(DownloadResponse { download_url }))
}

#[utoipa::path(
    post,
    path = "/api/resources/{id}/ratings",
    params(("id" = Uuid, Path, description = "Resource ID")),
    request_body = RateResourceRequest,
    responses(
        (status = 200, description = "Rating stored, average recomputed", body = Resource),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse),
        (status = 422, description = "Rating outside 1-5", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, dto))]
pub async fn rate_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<RateResourceRequest>,
) -> Result<Json<Resource>, AppError> {
    let resource = ResourceService::rate_resource(
        &state.db,
        id,
        auth_user.user_id()?,
        dto.rating,
        dto.review.as_deref(),
    )
    .await?;
    Ok(Json(resource))
}
