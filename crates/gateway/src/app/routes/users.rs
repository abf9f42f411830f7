use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, OriginalUri},
    http::Method,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::app::errors::GatewayError;
use crate::app::input::UserInput;
use crate::app::{target, Gateway};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(pass_through))
        .route("/:id", get(pass_through).patch(patch_user).delete(pass_through))
}

pub async fn create_user(
    Extension(gateway): Extension<Arc<Gateway>>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body?;
    body.validate_new()?;
    Ok(gateway.client.forward_json(Method::POST, target(&uri), None, &body).await?)
}

pub async fn patch_user(
    Extension(gateway): Extension<Arc<Gateway>>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body?;
    body.validate_patch()?;
    Ok(gateway.client.forward_json(Method::PATCH, target(&uri), None, &body).await?)
}

/// Reads and deletes carry nothing to check.
pub async fn pass_through(
    Extension(gateway): Extension<Arc<Gateway>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, GatewayError> {
    Ok(gateway.client.forward(method, target(&uri), None).await?)
}
