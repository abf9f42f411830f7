//! Items offered for sharing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{ItemId, RequestId, UserId};
use crate::user::require_non_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
    pub request_id: Option<RequestId>,
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl Item {
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }

    /// Ownership check reported as absence.
    pub fn ensure_owner(&self, user: UserId) -> DomainResult<()> {
        if self.is_owned_by(user) {
            return Ok(());
        }
        Err(DomainError::not_found(format!(
            "item {} of user {} not found",
            self.id, user
        )))
    }

    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

/// Validated item creation data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
    pub request_id: Option<RequestId>,
}

impl NewItem {
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        available: Option<bool>,
        owner_id: UserId,
        request_id: Option<RequestId>,
    ) -> DomainResult<Self> {
        let name = require_non_blank(name, "item name must be set")?;
        let description = require_non_blank(description, "item description must be set")?;
        let available =
            available.ok_or_else(|| DomainError::validation("item availability must be set"))?;
        Ok(Self {
            name,
            description,
            available,
            owner_id,
            request_id,
        })
    }
}

/// Partial item update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl ItemPatch {
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        available: Option<bool>,
    ) -> DomainResult<Self> {
        if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::validation("item name must not be blank"));
        }
        if description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(DomainError::validation("item description must not be blank"));
        }
        Ok(Self {
            name,
            description,
            available,
        })
    }

    pub fn apply(&self, item: &Item) -> Item {
        Item {
            name: self.name.clone().unwrap_or_else(|| item.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| item.description.clone()),
            available: self.available.unwrap_or(item.available),
            ..item.clone()
        }
    }
}

/// Last/next booking pair shown to an item's owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingNeighbours {
    pub last: Option<Booking>,
    pub next: Option<Booking>,
}

impl BookingNeighbours {
    /// Single pass over `bookings`, expected latest start first.
    ///
    /// Every active booking starting after `now` replaces `next`, so the
    /// soonest upcoming one remains. The first active booking starting
    /// before `now` becomes `last` and ends the scan.
    pub fn select(bookings: &[Booking], now: NaiveDateTime) -> Self {
        let mut found = Self::default();
        for booking in bookings.iter().filter(|b| b.status.is_active()) {
            if booking.start > now {
                found.next = Some(booking.clone());
            }
            if booking.start < now {
                found.last = Some(booking.clone());
                break;
            }
        }
        found
    }
}
