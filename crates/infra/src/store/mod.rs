//! Repository abstractions over the five ShareIt tables.
//!
//! One trait per table, bundled into [`Store`] so services can hold a single
//! `Arc<dyn Store>`. Two backends:
//! - [`InMemoryStore`]: default, process-local, used by tests.
//! - [`PostgresStore`]: enabled with `USE_PERSISTENT_STORES=true`.
//!
//! Ordering guarantees are part of the contract and both backends honour them:
//! bookings of one item come back latest start first (ties by id, at most
//! [`ITEM_BOOKINGS_LIMIT`]), comments in ascending id order, own requests
//! newest first, other users' requests by id descending.

use async_trait::async_trait;
use thiserror::Error;

use shareit_core::{
    Booking, BookingId, BookingStatus, Comment, Item, ItemId, ItemPatch, ItemRequest, NewBooking,
    NewComment, NewItem, NewItemRequest, NewUser, RequestId, User, UserId, UserPatch,
};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Unique constraint hit (duplicate email) or a lost status race.
    #[error("{0}")]
    Conflict(String),

    /// Row referenced by the operation does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Cap on the bookings read per item for the owner's last/next view.
pub const ITEM_BOOKINGS_LIMIT: usize = 100;

/// Booking joined with its item and booker, as every booking response needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub booking: Booking,
    pub item: Item,
    pub booker: User,
}

/// Comment joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author_name: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User>;
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    /// Read-modify-write of one user; `Conflict` when the new email is taken.
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> StoreResult<User>;
    /// Removes the user with everything they own or booked. `false` if absent.
    async fn delete_user(&self, id: UserId) -> StoreResult<bool>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn insert_item(&self, item: &NewItem) -> StoreResult<Item>;
    async fn find_item(&self, id: ItemId) -> StoreResult<Option<Item>>;
    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> StoreResult<Item>;
    async fn delete_item(&self, id: ItemId) -> StoreResult<bool>;
    /// Ascending id.
    async fn items_by_owner(&self, owner: UserId, offset: usize, limit: usize) -> StoreResult<Vec<Item>>;
    /// Available items whose name or description contains `needle`, ignoring case.
    async fn search_available(&self, needle: &str, offset: usize, limit: usize) -> StoreResult<Vec<Item>>;
    async fn items_by_requests(&self, requests: &[RequestId]) -> StoreResult<Vec<Item>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert_booking(&self, booking: &NewBooking) -> StoreResult<Booking>;
    async fn find_booking(&self, id: BookingId) -> StoreResult<Option<BookingView>>;
    /// Compare-and-set on the status column; `Conflict` if it is no longer `from`.
    async fn update_booking_status(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    ) -> StoreResult<Booking>;
    async fn bookings_by_booker(&self, booker: UserId) -> StoreResult<Vec<BookingView>>;
    async fn bookings_by_item_owner(&self, owner: UserId) -> StoreResult<Vec<BookingView>>;
    /// Start descending, then id ascending; at most [`ITEM_BOOKINGS_LIMIT`].
    async fn bookings_by_item(&self, item: ItemId) -> StoreResult<Vec<Booking>>;
    async fn bookings_by_item_and_booker(&self, item: ItemId, booker: UserId) -> StoreResult<Vec<Booking>>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<CommentView>;
    /// Ascending id.
    async fn comments_by_item(&self, item: ItemId) -> StoreResult<Vec<CommentView>>;
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn insert_request(&self, request: &NewItemRequest) -> StoreResult<ItemRequest>;
    async fn find_request(&self, id: RequestId) -> StoreResult<Option<ItemRequest>>;
    /// Newest first.
    async fn requests_by_requestor(&self, requestor: UserId) -> StoreResult<Vec<ItemRequest>>;
    /// Requests of everyone except `user`, id descending.
    async fn requests_of_others(&self, user: UserId, offset: usize, limit: usize) -> StoreResult<Vec<ItemRequest>>;
}

/// Everything the server needs from persistence.
pub trait Store:
    UserRepository + ItemRepository + BookingRepository + CommentRepository + RequestRepository
{
}

impl<T> Store for T where
    T: UserRepository + ItemRepository + BookingRepository + CommentRepository + RequestRepository
{
}
