//! Bookings: status lifecycle, creation rules and state-filtered listing.

use core::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{BookingId, ItemId, UserId};
use crate::item::Item;
use crate::page::PageRequest;

/// Booking status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }

    /// WAITING or APPROVED: the booking still blocks the item.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Waiting | BookingStatus::Approved)
    }
}

impl core::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            other => Err(DomainError::invalid_argument(format!("Unknown status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub status: BookingStatus,
}

impl Entity for Booking {
    type Id = BookingId;

    fn id(&self) -> BookingId {
        self.id
    }
}

impl Booking {
    /// `start <= now < end`.
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        self.start <= now && now < self.end
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.end < now
    }

    pub fn is_future(&self, now: NaiveDateTime) -> bool {
        self.start > now
    }

    /// Owner decision on a booking of `item`.
    ///
    /// Non-owners get `NotFound` so that ownership is not revealed.
    pub fn decide(&mut self, actor: UserId, item: &Item, approved: bool) -> DomainResult<()> {
        if item.owner_id != actor {
            return Err(DomainError::not_found(format!(
                "booking {} does not belong to items of user {}",
                self.id, actor
            )));
        }
        if self.status == BookingStatus::Approved {
            return Err(DomainError::validation(
                "cannot change status of an already-approved booking",
            ));
        }
        self.status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        Ok(())
    }

    /// Visible to its booker and to the owner of the booked item.
    pub fn ensure_visible_to(&self, actor: UserId, item_owner: UserId) -> DomainResult<()> {
        if self.booker_id == actor || item_owner == actor {
            return Ok(());
        }
        Err(DomainError::not_found(format!(
            "booking {} is neither made by nor for items of user {}",
            self.id, actor
        )))
    }
}

/// Booking request as submitted: every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub item_id: Option<ItemId>,
}

/// Validated booking, always created in `WAITING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub item_id: ItemId,
    pub booker_id: UserId,
}

impl NewBooking {
    pub fn status(&self) -> BookingStatus {
        BookingStatus::Waiting
    }

    /// Field and ordering checks, run after [`ensure_bookable`].
    pub fn from_draft(draft: &BookingDraft, item: &Item, booker_id: UserId) -> DomainResult<Self> {
        let start = draft
            .start
            .ok_or_else(|| DomainError::validation("booking start must be set"))?;
        let end = draft
            .end
            .ok_or_else(|| DomainError::validation("booking end must be set"))?;

        if end <= start {
            return Err(DomainError::validation(format!(
                "booking start {start} must be before end {end}"
            )));
        }

        Ok(Self {
            start,
            end,
            item_id: item.id,
            booker_id,
        })
    }
}

/// Item-level preconditions for booking: not one's own item, item available.
pub fn ensure_bookable(item: &Item, booker_id: UserId) -> DomainResult<()> {
    if item.owner_id == booker_id {
        return Err(DomainError::not_found(format!(
            "item {} cannot be booked by its owner {}",
            item.id, booker_id
        )));
    }
    if !item.available {
        return Err(DomainError::validation(format!(
            "item {} is not available for booking",
            item.id
        )));
    }
    Ok(())
}

/// State filter for booking lists.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BookingState {
    #[default]
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }

    pub fn matches(&self, booking: &Booking, now: NaiveDateTime) -> bool {
        match self {
            BookingState::All => true,
            BookingState::Current => booking.is_current(now),
            BookingState::Past => booking.is_past(now),
            BookingState::Future => booking.is_future(now),
            BookingState::Waiting => booking.status == BookingStatus::Waiting,
            BookingState::Rejected => booking.status == BookingStatus::Rejected,
        }
    }
}

impl FromStr for BookingState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            other => Err(DomainError::invalid_argument(format!("Unknown state: {other}"))),
        }
    }
}

impl core::fmt::Display for BookingState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter by `state`, sort by start descending, then cut the `page` window.
///
/// Works on any `T` that can expose its booking (plain bookings or joined views).
pub fn filter_bookings<T, F>(
    bookings: Vec<T>,
    state: BookingState,
    page: PageRequest,
    now: NaiveDateTime,
    booking_of: F,
) -> Vec<T>
where
    F: Fn(&T) -> &Booking,
{
    let mut matching: Vec<T> = bookings
        .into_iter()
        .filter(|b| state.matches(booking_of(b), now))
        .collect();
    // Stable: equal starts keep their input order.
    matching.sort_by(|a, b| booking_of(b).start.cmp(&booking_of(a).start));
    page.window(matching)
}
