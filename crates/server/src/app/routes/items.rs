use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Extension, Path, Query},
    routing::{get, post},
    Json, Router,
};

use shareit_core::ItemId;

use crate::app::dto::{CommentBody, CommentDto, ItemBody, ItemDto, PageQuery, SearchQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::SharerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_item).get(list_own_items))
        .route("/search", get(search_items))
        .route("/:id", get(get_item).patch(patch_item).delete(delete_item))
        .route("/:id/comment", post(add_comment))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> Result<Json<ItemDto>, ApiError> {
    let Json(body) = body?;
    Ok(Json(services.create_item(sharer.user_id(), body).await?))
}

pub async fn list_own_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    let page = query.page()?;
    Ok(Json(services.list_own_items(sharer.user_id(), page).await?))
}

pub async fn search_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    let page = query.page()?;
    let text = query.text.unwrap_or_default();
    Ok(Json(services.search_items(sharer.user_id(), &text, page).await?))
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    id: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<ItemDto>, ApiError> {
    let Path(id) = id?;
    Ok(Json(services.get_item(sharer.user_id(), id).await?))
}

pub async fn patch_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    id: Result<Path<ItemId>, PathRejection>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> Result<Json<ItemDto>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(Json(services.patch_item(sharer.user_id(), id, body).await?))
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    id: Result<Path<ItemId>, PathRejection>,
) -> Result<(), ApiError> {
    let Path(id) = id?;
    services.delete_item(sharer.user_id(), id).await
}

pub async fn add_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    id: Result<Path<ItemId>, PathRejection>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> Result<Json<CommentDto>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(Json(services.add_comment(sharer.user_id(), id, body).await?))
}
