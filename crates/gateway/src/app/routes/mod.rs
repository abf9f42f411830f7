use axum::http::StatusCode;
use axum::Router;

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;

/// Answered by the gateway itself, the server is not consulted.
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Routes that require `X-Sharer-User-Id`.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .nest("/bookings", bookings::router())
        .nest("/requests", requests::router())
}
