use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Extension, Path, Query},
    routing::get,
    Json, Router,
};

use shareit_core::BookingId;
use shareit_infra::BookingView;

use crate::app::dto::{BookingBody, BookingDto, BookingListQuery, DecisionQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::SharerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(bookings_of_booker).post(create_booking))
        .route("/owner", get(bookings_of_owner))
        .route("/:id", get(get_booking).patch(decide_booking))
}

pub async fn create_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    body: Result<Json<BookingBody>, JsonRejection>,
) -> Result<Json<BookingDto>, ApiError> {
    let Json(body) = body?;
    let view = services.create_booking(sharer.user_id(), body).await?;
    Ok(Json(BookingDto::new(&view, &services.format)))
}

pub async fn decide_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    id: Result<Path<BookingId>, PathRejection>,
    Query(query): Query<DecisionQuery>,
) -> Result<Json<BookingDto>, ApiError> {
    let Path(id) = id?;
    let approved = query.approved()?;
    let view = services.decide_booking(sharer.user_id(), id, approved).await?;
    Ok(Json(BookingDto::new(&view, &services.format)))
}

pub async fn get_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    id: Result<Path<BookingId>, PathRejection>,
) -> Result<Json<BookingDto>, ApiError> {
    let Path(id) = id?;
    let view = services.get_booking(sharer.user_id(), id).await?;
    Ok(Json(BookingDto::new(&view, &services.format)))
}

pub async fn bookings_of_booker(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    let (state, page) = (query.state()?, query.page()?);
    let views = services.bookings_of_booker(sharer.user_id(), state, page).await?;
    Ok(Json(to_dtos(&services, &views)))
}

pub async fn bookings_of_owner(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(sharer): Extension<SharerContext>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingDto>>, ApiError> {
    let (state, page) = (query.state()?, query.page()?);
    let views = services.bookings_of_owner(sharer.user_id(), state, page).await?;
    Ok(Json(to_dtos(&services, &views)))
}

fn to_dtos(services: &AppServices, views: &[BookingView]) -> Vec<BookingDto> {
    views.iter().map(|v| BookingDto::new(v, &services.format)).collect()
}
