use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Extension, Path},
    routing::{get, post},
    Json, Router,
};

use shareit_core::UserId;

use crate::app::dto::{UserBody, UserDto};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Users are managed without the sharer header.
pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).patch(patch_user).delete(delete_user))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<UserBody>, JsonRejection>,
) -> Result<Json<UserDto>, ApiError> {
    let Json(body) = body?;
    let user = services.create_user(body).await?;
    Ok(Json(UserDto::from(&user)))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = services.list_users().await?;
    Ok(Json(users.iter().map(UserDto::from).collect()))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<UserDto>, ApiError> {
    let Path(id) = id?;
    let user = services.get_user(id).await?;
    Ok(Json(UserDto::from(&user)))
}

pub async fn patch_user(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<UserId>, PathRejection>,
    body: Result<Json<UserBody>, JsonRejection>,
) -> Result<Json<UserDto>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let user = services.patch_user(id, body).await?;
    Ok(Json(UserDto::from(&user)))
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    id: Result<Path<UserId>, PathRejection>,
) -> Result<(), ApiError> {
    let Path(id) = id?;
    services.delete_user(id).await
}
