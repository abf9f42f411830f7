//! Infrastructure layer: configuration and persistence.

pub mod config;
pub mod store;

pub use config::{ConfigError, GatewayConfig, ServerConfig, StoreBackend};
pub use store::{BookingView, CommentView, InMemoryStore, PostgresStore, Store, StoreError, StoreResult};
