//! Server tier: business rules over the ShareIt store, exposed as REST.

pub mod app;
pub mod context;
pub mod middleware;
