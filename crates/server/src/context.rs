use shareit_core::UserId;

/// Acting user for a request, taken from `X-Sharer-User-Id`.
///
/// Present on every items/bookings/requests route; the header is trusted as
/// is, existence of the user is checked by the operation that needs it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SharerContext {
    user_id: UserId,
}

impl SharerContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
