//! `shareit-core`: domain model and business rules.
//!
//! This crate contains **pure domain** code (no IO, no framework types). "Now"
//! is always passed in by the caller.

pub mod booking;
pub mod comment;
pub mod entity;
pub mod error;
pub mod id;
pub mod item;
pub mod page;
pub mod request;
pub mod time;
pub mod user;

pub use booking::{Booking, BookingDraft, BookingState, BookingStatus, NewBooking};
pub use comment::{Comment, NewComment};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BookingId, CommentId, ItemId, RequestId, UserId};
pub use item::{BookingNeighbours, Item, ItemPatch, NewItem};
pub use page::PageRequest;
pub use request::{ItemRequest, NewItemRequest};
pub use time::{Clock, DateTimeFormat, ManualClock, SystemClock};
pub use user::{NewUser, User, UserPatch};

/// Header carrying the acting user's id on every item/booking/request call.
pub const SHARER_USER_HEADER: &str = "X-Sharer-User-Id";
