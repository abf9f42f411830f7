//! Comments left by people who actually booked an item.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::booking::{Booking, BookingStatus};
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{CommentId, ItemId, UserId};
use crate::user::require_non_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub item_id: ItemId,
    pub author_id: UserId,
    pub created: NaiveDateTime,
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> CommentId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: String,
    pub item_id: ItemId,
    pub author_id: UserId,
    pub created: NaiveDateTime,
}

impl NewComment {
    pub fn new(
        text: Option<String>,
        item_id: ItemId,
        author_id: UserId,
        created: NaiveDateTime,
    ) -> DomainResult<Self> {
        let text = require_non_blank(text, "comment text must be set")?;
        Ok(Self {
            text,
            item_id,
            author_id,
            created,
        })
    }

    /// The author needs a non-rejected booking of the item that has started.
    pub fn ensure_eligible(&self, author_bookings: &[Booking], now: NaiveDateTime) -> DomainResult<()> {
        let eligible = author_bookings.iter().any(|b| {
            b.item_id == self.item_id
                && b.booker_id == self.author_id
                && b.status != BookingStatus::Rejected
                && b.start <= now
        });
        if eligible {
            return Ok(());
        }
        Err(DomainError::validation(format!(
            "user {} cannot comment item {}: no started booking",
            self.author_id, self.item_id
        )))
    }
}
