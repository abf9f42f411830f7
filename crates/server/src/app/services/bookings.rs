use shareit_core::booking::{ensure_bookable, filter_bookings};
use shareit_core::{BookingId, BookingState, DomainError, NewBooking, PageRequest, UserId};
use shareit_infra::BookingView;

use super::{AppServices, ServiceResult};
use crate::app::dto::BookingBody;

impl AppServices {
    /// Rule order: item id present, item exists, bookable by this user,
    /// booker exists, then dates.
    pub async fn create_booking(&self, booker: UserId, body: BookingBody) -> ServiceResult<BookingView> {
        let draft = body.into_draft(&self.format)?;
        let item_id = draft
            .item_id
            .ok_or_else(|| DomainError::validation("booking item must be set"))?;

        let item = self.require_item(item_id).await?;
        if let Err(e) = ensure_bookable(&item, booker) {
            tracing::warn!(item_id = %item_id, booker_id = %booker, error = %e, "booking refused");
            return Err(e.into());
        }
        self.require_user(booker).await?;

        let new = NewBooking::from_draft(&draft, &item, booker)?;
        let booking = self.store.insert_booking(&new).await?;
        tracing::info!(booking_id = %booking.id, item_id = %item_id, booker_id = %booker, "booking created");

        self.require_booking(booking.id).await
    }

    pub async fn decide_booking(&self, actor: UserId, id: BookingId, approved: bool) -> ServiceResult<BookingView> {
        let view = self.require_booking(id).await?;
        let before = view.booking.status;

        let mut booking = view.booking.clone();
        booking.decide(actor, &view.item, approved)?;

        let booking = self
            .store
            .update_booking_status(id, before, booking.status)
            .await?;
        tracing::info!(booking_id = %id, status = %booking.status, "booking decided");

        Ok(BookingView { booking, ..view })
    }

    pub async fn get_booking(&self, actor: UserId, id: BookingId) -> ServiceResult<BookingView> {
        let view = self.require_booking(id).await?;
        view.booking.ensure_visible_to(actor, view.item.owner_id)?;
        Ok(view)
    }

    pub async fn bookings_of_booker(
        &self,
        booker: UserId,
        state: BookingState,
        page: PageRequest,
    ) -> ServiceResult<Vec<BookingView>> {
        self.require_user(booker).await?;
        tracing::debug!(booker_id = %booker, %state, "listing bookings");
        let views = self.store.bookings_by_booker(booker).await?;
        Ok(filter_bookings(views, state, page, self.clock.now(), |v| &v.booking))
    }

    pub async fn bookings_of_owner(
        &self,
        owner: UserId,
        state: BookingState,
        page: PageRequest,
    ) -> ServiceResult<Vec<BookingView>> {
        self.require_user(owner).await?;
        tracing::debug!(owner_id = %owner, %state, "listing bookings of owned items");
        let views = self.store.bookings_by_item_owner(owner).await?;
        Ok(filter_bookings(views, state, page, self.clock.now(), |v| &v.booking))
    }

    async fn require_booking(&self, id: BookingId) -> ServiceResult<BookingView> {
        self.store
            .find_booking(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("booking with id={id} not found")).into())
    }
}
