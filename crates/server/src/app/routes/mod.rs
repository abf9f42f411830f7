use axum::Router;

pub mod bookings;
pub mod items;
pub mod requests;
pub mod system;
pub mod users;

/// Router for every endpoint that acts on behalf of `X-Sharer-User-Id`.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .nest("/bookings", bookings::router())
        .nest("/requests", requests::router())
}
