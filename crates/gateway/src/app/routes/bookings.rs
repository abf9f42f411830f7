use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, OriginalUri, Query},
    http::Method,
    response::Response,
    routing::get,
    Json, Router,
};

use crate::app::errors::GatewayError;
use crate::app::input::{BookingInput, BookingListQuery, DecisionQuery};
use crate::app::{target, Gateway};
use crate::middleware::Sharer;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/owner", get(list_bookings))
        .route("/:id", get(get_booking).patch(decide_booking))
}

pub async fn create_booking(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<BookingInput>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body?;
    body.validate(&gateway.format, gateway.clock.now())?;
    tracing::debug!(booker_id = %user, "booking request passed edge checks");
    Ok(gateway.client.forward_json(Method::POST, target(&uri), Some(user), &body).await?)
}

pub async fn decide_booking(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DecisionQuery>,
) -> Result<Response, GatewayError> {
    query.validate()?;
    Ok(gateway.client.forward(Method::PATCH, target(&uri), Some(user)).await?)
}

pub async fn get_booking(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, GatewayError> {
    Ok(gateway.client.forward(Method::GET, target(&uri), Some(user)).await?)
}

/// Booker and owner listings share their query rules.
pub async fn list_bookings(
    Extension(gateway): Extension<Arc<Gateway>>,
    Extension(Sharer(user)): Extension<Sharer>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<BookingListQuery>,
) -> Result<Response, GatewayError> {
    let (state, page) = query.validate()?;
    tracing::debug!(user_id = %user, %state, from = page.from(), size = page.size(), "listing bookings");
    Ok(gateway.client.forward(Method::GET, target(&uri), Some(user)).await?)
}
