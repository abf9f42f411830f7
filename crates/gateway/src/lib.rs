//! `shareit-gateway`: public edge that validates input, then forwards to the server tier.

pub mod app;
pub mod client;
pub mod middleware;
