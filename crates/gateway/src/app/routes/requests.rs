use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, OriginalUri, Query},
    http::Method,
    response::Response,
    routing::get,
    Json, Router,
};

use crate::app::errors::GatewayError;
use crate::app::input::{PageQuery, RequestInput};
use crate::app::{target, Gateway};
use crate::middleware::Sharer;

pub fn router() -> Router {
    Router::new()
        .route("/", get(pass_through).post(create_request))
        .route("/all", get(requests_of_others))
        .route("/:id", get(pass_through))
}

pub async fn create_request(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<RequestInput>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body?;
    body.validate()?;
    Ok(gateway.client.forward_json(Method::POST, target(&uri), Some(user), &body).await?)
}

pub async fn requests_of_others(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Response, GatewayError> {
    query.validate()?;
    Ok(gateway.client.forward(Method::GET, target(&uri), Some(user)).await?)
}

pub async fn pass_through(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, GatewayError> {
    Ok(gateway.client.forward(Method::GET, target(&uri), Some(user)).await?)
}
