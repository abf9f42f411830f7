use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Extension, Path, Query},
    routing::{get, post},
    Json, Router,
};

use shareit_core::RequestId;

use crate::app::dto::{ItemRequestDto, PageQuery, RequestBody};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::SharerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_request).get(own_requests))
        .route("/all", get(requests_of_others))
        .route("/:id", get(get_request))
}

pub async fn create_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    body: Result<Json<RequestBody>, JsonRejection>,
) -> Result<Json<ItemRequestDto>, ApiError> {
    let Json(body) = body?;
    Ok(Json(services.create_request(sharer.user_id(), body).await?))
}

pub async fn own_requests(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
) -> Result<Json<Vec<ItemRequestDto>>, ApiError> {
    Ok(Json(services.own_requests(sharer.user_id()).await?))
}

pub async fn requests_of_others(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ItemRequestDto>>, ApiError> {
    let page = query.page()?;
    Ok(Json(services.requests_of_others(sharer.user_id(), page).await?))
}

pub async fn get_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    id: Result<Path<RequestId>, PathRejection>,
) -> Result<Json<ItemRequestDto>, ApiError> {
    let Path(id) = id?;
    Ok(Json(services.get_request(sharer.user_id(), id).await?))
}
