use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, OriginalUri, Query},
    http::Method,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::app::errors::GatewayError;
use crate::app::input::{CommentInput, ItemInput, PageQuery, SearchQuery};
use crate::app::{target, Gateway};
use crate::middleware::Sharer;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_item).get(list_own_items))
        .route("/search", get(search_items))
        .route("/:id", get(pass_through).patch(patch_item).delete(pass_through))
        .route("/:id/comment", post(add_comment))
}

pub async fn create_item(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<ItemInput>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body?;
    body.validate_new()?;
    Ok(gateway.client.forward_json(Method::POST, target(&uri), Some(user), &body).await?)
}

pub async fn list_own_items(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Response, GatewayError> {
    query.validate()?;
    Ok(gateway.client.forward(Method::GET, target(&uri), Some(user)).await?)
}

pub async fn search_items(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SearchQuery>,
) -> Result<Response, GatewayError> {
    query.validate()?;
    Ok(gateway.client.forward(Method::GET, target(&uri), Some(user)).await?)
}

pub async fn patch_item(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<ItemInput>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body?;
    body.validate_patch()?;
    Ok(gateway.client.forward_json(Method::PATCH, target(&uri), Some(user), &body).await?)
}

pub async fn add_comment(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<CommentInput>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body?;
    body.validate()?;
    Ok(gateway.client.forward_json(Method::POST, target(&uri), Some(user), &body).await?)
}

pub async fn pass_through(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, GatewayError> {
    Ok(gateway.client.forward(method, target(&uri), Some(user)).await?)
}
