//! Business operations behind the routes.
//!
//! Each submodule adds `impl AppServices` blocks for one resource. Handlers
//! stay thin: parse, call one method here, wrap the DTO.

use std::sync::Arc;

use shareit_core::{Clock, DateTimeFormat, DomainError, Item, ItemId, User, UserId};
use shareit_infra::Store;

use crate::app::errors::ApiError;

mod bookings;
mod items;
mod requests;
mod users;

pub type ServiceResult<T> = Result<T, ApiError>;

/// Shared state handed to every handler.
pub struct AppServices {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub format: DateTimeFormat,
}

impl AppServices {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, format: DateTimeFormat) -> Self {
        Self { store, clock, format }
    }

    pub(crate) async fn require_user(&self, id: UserId) -> ServiceResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("user with id={id} not found")).into())
    }

    pub(crate) async fn require_item(&self, id: ItemId) -> ServiceResult<Item> {
        self.store
            .find_item(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("item with id={id} not found")).into())
    }
}
