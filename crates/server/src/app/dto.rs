use std::str::FromStr;

use serde::{Deserialize, Serialize};

use shareit_core::{
    Booking, BookingDraft, BookingNeighbours, BookingState, DateTimeFormat, DomainError, DomainResult, Item,
    ItemId, ItemRequest, PageRequest, RequestId, User,
};
use shareit_infra::{BookingView, CommentView};

// -------------------------
// Request DTOs
// -------------------------

/// Signup and patch body; every field optional so rules decide what is missing.
#[derive(Debug, Default, Deserialize)]
pub struct UserBody {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<RequestId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentBody {
    pub text: Option<String>,
}

/// Dates arrive as text in the configured pattern.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    pub start: Option<String>,
    pub end: Option<String>,
    pub item_id: Option<ItemId>,
}

impl BookingBody {
    pub fn into_draft(self, format: &DateTimeFormat) -> DomainResult<BookingDraft> {
        Ok(BookingDraft {
            start: self.start.as_deref().map(|s| format.parse(s)).transpose()?,
            end: self.end.as_deref().map(|s| format.parse(s)).transpose()?,
            item_id: self.item_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,
}

// -------------------------
// Query parameters
// -------------------------

/// Kept as text so malformed numbers become our own 400 body.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub from: Option<String>,
    pub size: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> DomainResult<PageRequest> {
        PageRequest::from_query(
            parse_param("from", self.from.as_deref())?,
            parse_param("size", self.size.as_deref())?,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    pub state: Option<String>,
    pub from: Option<String>,
    pub size: Option<String>,
}

impl BookingListQuery {
    pub fn state(&self) -> DomainResult<BookingState> {
        match self.state.as_deref() {
            Some(s) => s.parse(),
            None => Ok(BookingState::All),
        }
    }

    pub fn page(&self) -> DomainResult<PageRequest> {
        PageRequest::from_query(
            parse_param("from", self.from.as_deref())?,
            parse_param("size", self.size.as_deref())?,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub from: Option<String>,
    pub size: Option<String>,
}

impl SearchQuery {
    pub fn page(&self) -> DomainResult<PageRequest> {
        PageRequest::from_query(
            parse_param("from", self.from.as_deref())?,
            parse_param("size", self.size.as_deref())?,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DecisionQuery {
    pub approved: Option<String>,
}

impl DecisionQuery {
    pub fn approved(&self) -> DomainResult<bool> {
        parse_param("approved", self.approved.as_deref())?
            .ok_or_else(|| DomainError::invalid_argument("approved must be set"))
    }
}

pub fn parse_param<T: FromStr>(name: &str, raw: Option<&str>) -> DomainResult<Option<T>> {
    raw.map(|v| {
        v.trim()
            .parse::<T>()
            .map_err(|_| DomainError::invalid_argument(format!("invalid value for {name}: {v}")))
    })
    .transpose()
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserDto {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.get(),
            email: u.email.clone(),
            name: u.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingShortDto {
    pub id: i64,
    pub start: String,
    pub end: String,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: String,
}

impl BookingShortDto {
    pub fn new(b: &Booking, format: &DateTimeFormat) -> Self {
        Self {
            id: b.id.get(),
            start: format.format(b.start),
            end: format.format(b.end),
            item_id: b.item_id.get(),
            booker_id: b.booker_id.get(),
            status: b.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentShortDto {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_name: String,
    pub created: String,
}

impl CommentShortDto {
    pub fn new(c: &CommentView, format: &DateTimeFormat) -> Self {
        Self {
            id: c.comment.id.get(),
            text: c.comment.text.clone(),
            item_id: c.comment.item_id.get(),
            author_name: c.author_name.clone(),
            created: format.format(c.comment.created),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub last_booking: Option<BookingShortDto>,
    pub next_booking: Option<BookingShortDto>,
    pub comments: Vec<CommentShortDto>,
    pub request_id: Option<i64>,
}

impl ItemDto {
    /// Bare item: no comments, no booking neighbours.
    pub fn plain(item: &Item) -> Self {
        Self {
            id: item.id.get(),
            name: item.name.clone(),
            description: item.description.clone(),
            available: item.available,
            last_booking: None,
            next_booking: None,
            comments: Vec::new(),
            request_id: item.request_id.map(|r| r.get()),
        }
    }

    pub fn enriched(
        item: &Item,
        neighbours: &BookingNeighbours,
        comments: &[CommentView],
        format: &DateTimeFormat,
    ) -> Self {
        Self {
            last_booking: neighbours.last.as_ref().map(|b| BookingShortDto::new(b, format)),
            next_booking: neighbours.next.as_ref().map(|b| BookingShortDto::new(b, format)),
            comments: comments.iter().map(|c| CommentShortDto::new(c, format)).collect(),
            ..Self::plain(item)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingDto {
    pub id: i64,
    pub start: String,
    pub end: String,
    pub item: ItemDto,
    pub booker: UserDto,
    pub status: String,
}

impl BookingDto {
    pub fn new(view: &BookingView, format: &DateTimeFormat) -> Self {
        Self {
            id: view.booking.id.get(),
            start: format.format(view.booking.start),
            end: format.format(view.booking.end),
            item: ItemDto::plain(&view.item),
            booker: UserDto::from(&view.booker),
            status: view.booking.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i64,
    pub text: String,
    pub item: ItemDto,
    pub author_name: String,
    pub created: String,
}

impl CommentDto {
    pub fn new(view: &CommentView, item: &Item, format: &DateTimeFormat) -> Self {
        Self {
            id: view.comment.id.get(),
            text: view.comment.text.clone(),
            item: ItemDto::plain(item),
            author_name: view.author_name.clone(),
            created: format.format(view.comment.created),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestDto {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: String,
    pub items: Vec<ItemDto>,
}

impl ItemRequestDto {
    pub fn new(request: &ItemRequest, items: &[Item], format: &DateTimeFormat) -> Self {
        Self {
            id: request.id.get(),
            description: request.description.clone(),
            requestor_id: request.requestor_id.get(),
            created: format.format(request.created),
            items: items
                .iter()
                .filter(|i| i.request_id == Some(request.id))
                .map(ItemDto::plain)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shareit_core::{BookingId, BookingStatus, UserId};

    fn item() -> Item {
        Item {
            id: ItemId::from_raw(3),
            name: "Drill".into(),
            description: "Cordless".into(),
            available: true,
            owner_id: UserId::from_raw(1),
            request_id: Some(RequestId::from_raw(9)),
        }
    }

    #[test]
    fn item_dto_uses_camel_case() {
        let v = serde_json::to_value(ItemDto::plain(&item())).unwrap();
        assert_eq!(v["requestId"], 9);
        assert!(v["lastBooking"].is_null());
        assert!(v["nextBooking"].is_null());
        assert_eq!(v["comments"], serde_json::json!([]));
    }

    #[test]
    fn booking_dates_use_configured_pattern() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let booking = Booking {
            id: BookingId::from_raw(1),
            start,
            end: start + chrono::Duration::hours(2),
            item_id: ItemId::from_raw(3),
            booker_id: UserId::from_raw(2),
            status: BookingStatus::Waiting,
        };
        let v = serde_json::to_value(BookingShortDto::new(&booking, &DateTimeFormat::default())).unwrap();
        assert_eq!(v["start"], "2024-06-01T09:30:00");
        assert_eq!(v["end"], "2024-06-01T11:30:00");
        assert_eq!(v["bookerId"], 2);
        assert_eq!(v["status"], "WAITING");
    }

    #[test]
    fn booking_query_defaults_and_rejects_unknown_state() {
        let q = BookingListQuery::default();
        assert_eq!(q.state().unwrap(), BookingState::All);
        assert_eq!(q.page().unwrap(), PageRequest::default());

        let q = BookingListQuery {
            state: Some("SOMETIMES".into()),
            ..Default::default()
        };
        assert_eq!(q.state().unwrap_err().to_string(), "Unknown state: SOMETIMES");
    }

    #[test]
    fn non_numeric_paging_is_invalid_argument() {
        let q = PageQuery {
            from: Some("x".into()),
            size: None,
        };
        assert!(matches!(q.page(), Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn approved_flag_is_required() {
        assert!(DecisionQuery::default().approved().is_err());
        let q = DecisionQuery {
            approved: Some("true".into()),
        };
        assert!(q.approved().unwrap());
    }
}
